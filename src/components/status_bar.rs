use leptos::prelude::*;

use crate::graph::{GraphSession, LoadStatus, palette};

/// Load status, visible counts, the traversal center and the type legend.
#[component]
pub fn StatusBar(session: RwSignal<GraphSession>) -> impl IntoView {
	let status = move || {
		session.with(|s| match s.status() {
			LoadStatus::Idle => "Idle".to_string(),
			LoadStatus::Loading => "Loading graph...".to_string(),
			LoadStatus::Ready if s.graph().is_empty() => "No results".to_string(),
			LoadStatus::Ready => "Ready".to_string(),
			LoadStatus::Failed(msg) => format!("Error: {msg}"),
		})
	};
	let failed = move || session.with(|s| matches!(s.status(), LoadStatus::Failed(_)));
	let counts = move || {
		session.with(|s| {
			format!(
				"{} / {} nodes · {} / {} edges",
				s.visible_node_count(),
				s.graph().node_count(),
				s.visible_edge_count(),
				s.graph().edge_count()
			)
		})
	};
	let traversal = move || {
		session.with(|s| {
			let center = s.traversal().center()?;
			let label = s.graph().node(center).map_or(center, |n| n.label.as_str());
			Some(format!("Traversing {} hop(s) from {label}", s.traversal().hop_count()))
		})
	};
	let legend = move || {
		session.with(|s| {
			s.graph()
				.node_types()
				.into_iter()
				.map(|node_type| {
					let color = palette::node_color(&node_type);
					view! {
						<li>
							<span class="swatch" style:background-color=color></span>
							{node_type}
						</li>
					}
				})
				.collect_view()
		})
	};

	view! {
		<footer class="status-bar">
			<span class="status" class:error=failed>{status}</span>
			<span class="counts">{counts}</span>
			{move || traversal().map(|text| view! { <span class="traversal">{text}</span> })}
			<ul class="legend">{legend}</ul>
		</footer>
	}
}
