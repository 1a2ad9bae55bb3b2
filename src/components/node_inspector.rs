//! Details panel for the selected node, with the traversal controls.

use leptos::prelude::*;

use crate::graph::property::{NODE_TYPE_KEY, humanize_key};
use crate::graph::{GraphAction, GraphSession, Node};

const MAX_PROPERTIES: usize = 8;

/// Display-ready snapshot of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct InspectorData {
	pub id: String,
	pub label: String,
	pub node_type: String,
	pub properties: Vec<(String, String)>,
	/// Properties left out to keep the panel short.
	pub omitted: usize,
}

impl InspectorData {
	pub fn from_node(node: &Node) -> Self {
		let shown: Vec<_> = node
			.properties
			.iter()
			.filter(|(key, _)| key.as_str() != NODE_TYPE_KEY)
			.collect();
		let omitted = shown.len().saturating_sub(MAX_PROPERTIES);
		Self {
			id: node.id.clone(),
			label: if node.label.is_empty() {
				node.id.clone()
			} else {
				node.label.clone()
			},
			node_type: node.node_type.clone(),
			properties: shown
				.into_iter()
				.take(MAX_PROPERTIES)
				.map(|(key, value)| (humanize_key(key), value.display()))
				.collect(),
			omitted,
		}
	}
}

#[component]
pub fn NodeInspector(session: RwSignal<GraphSession>, selected: RwSignal<Option<String>>) -> impl IntoView {
	let panel = move || {
		let id = selected.get()?;
		let (data, active, is_center) = session.with(|s| {
			let data = s.graph().node(&id).map(InspectorData::from_node)?;
			let traversal = s.traversal();
			Some((data, traversal.is_active(), traversal.is_center(&id)))
		})?;
		let begin_id = data.id.clone();

		let traversal_button = if active {
			let label = if is_center { "Stop Traversal" } else { "End Traversal" };
			view! {
				<button
					class="traversal-stop"
					class:destructive=is_center
					on:click=move |_| session.update(|s| s.dispatch(GraphAction::StopTraversal))
				>
					{label}
				</button>
			}
			.into_any()
		} else {
			view! {
				<button
					class="traversal-begin"
					on:click=move |_| {
						let node_id = begin_id.clone();
						session.update(|s| s.dispatch(GraphAction::BeginTraversal { node_id }))
					}
				>
					"Begin Edge Traversal"
				</button>
			}
			.into_any()
		};

		Some(view! {
			<div class="node-inspector">
				<header>
					<h2>{data.label}</h2>
					<span class="badge">{data.node_type}</span>
					<button class="close" on:click=move |_| selected.set(None)>"×"</button>
				</header>
				<p class="node-id">"ID: " <code>{data.id}</code></p>
				<dl class="node-properties">
					{data
						.properties
						.into_iter()
						.map(|(key, value)| view! { <dt>{key}</dt><dd>{value}</dd> })
						.collect_view()}
				</dl>
				{(data.omitted > 0).then(|| view! {
					<p class="more">{format!("+{} more properties...", data.omitted)}</p>
				})}
				<div class="traversal-actions">
					{traversal_button}
					{(active && is_center).then(|| view! {
						<p class="hint">"Traversal center • Showing connected nodes"</p>
					})}
				</div>
			</div>
		})
	};

	view! { {panel} }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::attributed::{AttributedGraph, NodeAttrs};
	use crate::graph::property::PropertyValue;

	#[test]
	fn caps_properties_and_hides_type_key() {
		let mut properties: crate::graph::property::PropertyMap = (0..10)
			.map(|i| (format!("field_{i}"), PropertyValue::Number(i as f64)))
			.collect();
		properties.insert(NODE_TYPE_KEY.into(), "Patient".into());

		let mut graph = AttributedGraph::new();
		graph.add_node(
			"p1",
			NodeAttrs {
				label: String::new(),
				node_type: "Patient".into(),
				properties,
				..Default::default()
			},
		);
		let data = InspectorData::from_node(graph.node("p1").unwrap());

		assert_eq!(data.label, "p1");
		assert_eq!(data.properties.len(), MAX_PROPERTIES);
		assert_eq!(data.omitted, 2);
		assert_eq!(data.properties[0], ("Field 0".to_string(), "0".to_string()));
		assert!(data.properties.iter().all(|(k, _)| k != "Node Type"));
	}
}
