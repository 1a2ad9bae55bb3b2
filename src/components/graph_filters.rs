//! Type pickers for both filter axes, plus the traversal depth control.

use std::collections::BTreeSet;

use leptos::prelude::*;

use crate::graph::{FilterAxis, GraphAction, GraphSession, palette};

/// Upper bound offered by the depth input; the core accepts any depth.
const MAX_UI_HOPS: u32 = 6;

#[component]
pub fn GraphFilters(session: RwSignal<GraphSession>) -> impl IntoView {
	view! {
		<aside class="graph-filters">
			<TypePicker session=session axis=FilterAxis::Nodes />
			<TypePicker session=session axis=FilterAxis::Edges />
			<HopControl session=session />
		</aside>
	}
}

#[component]
fn TypePicker(session: RwSignal<GraphSession>, axis: FilterAxis) -> impl IntoView {
	let show_all = move || session.with(|s| s.filters().axis(axis).include_all);
	let options = move || {
		session.with(|s| axis.known_types(s.graph()).into_iter().collect::<Vec<_>>())
	};
	let summary = move || {
		session.with(|s| {
			let filter = s.filters().axis(axis);
			if filter.include_all {
				return "Show all".to_string();
			}
			match filter.included.len() {
				0 => "Nothing selected".to_string(),
				1 => filter.included.iter().next().cloned().unwrap_or_default(),
				n => format!("{n} selected"),
			}
		})
	};

	view! {
		<section class="type-picker">
			<h3>"Filter by " {axis.label()}</h3>
			<p class="type-picker-summary">{summary}</p>
			<label class="type-picker-all">
				<input
					type="checkbox"
					prop:checked=show_all
					on:change=move |ev| {
						let show_all = event_target_checked(&ev);
						session.update(|s| s.dispatch(GraphAction::SetShowAll { axis, show_all }));
					}
				/>
				"Show all"
			</label>
			<div class="type-picker-actions">
				<button on:click=move |_| {
					session.update(|s| s.dispatch(GraphAction::SetShowAll { axis, show_all: true }))
				}>"Select all"</button>
				<button on:click=move |_| {
					session.update(|s| {
						s.dispatch(GraphAction::SelectTypes { axis, types: BTreeSet::new() })
					})
				}>"Clear all"</button>
			</div>
			<ul class="type-picker-options">
				<For
					each=options
					key=|type_tag| type_tag.clone()
					children=move |type_tag| view! { <TypeOption session=session axis=axis type_tag=type_tag /> }
				/>
			</ul>
		</section>
	}
}

#[component]
fn TypeOption(session: RwSignal<GraphSession>, axis: FilterAxis, type_tag: String) -> impl IntoView {
	let swatch = match axis {
		FilterAxis::Nodes => palette::node_color(&type_tag),
		FilterAxis::Edges => palette::edge_color(&type_tag),
	};
	let checked = {
		let type_tag = type_tag.clone();
		move || session.with(|s| s.filters().axis(axis).passes(&type_tag))
	};
	let toggle_tag = type_tag.clone();

	view! {
		<li>
			<label>
				<input
					type="checkbox"
					prop:checked=checked
					on:change=move |_| session.update(|s| s.toggle_type(axis, &toggle_tag))
				/>
				<span class="swatch" style:background-color=swatch></span>
				{type_tag}
			</label>
		</li>
	}
}

#[component]
fn HopControl(session: RwSignal<GraphSession>) -> impl IntoView {
	let hops = move || session.with(|s| s.traversal().hop_count().get().to_string());

	view! {
		<section class="hop-control">
			<label>
				"Traversal depth"
				<input
					type="number"
					min="1"
					max=MAX_UI_HOPS.to_string()
					prop:value=hops
					on:change=move |ev| {
						if let Ok(hops) = event_target_value(&ev).parse::<u32>() {
							let hops = hops.min(MAX_UI_HOPS);
							session.update(|s| s.dispatch(GraphAction::SetHopCount(hops)));
						}
					}
				/>
			</label>
		</section>
	}
}
