use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::graph_filters::GraphFilters;
use crate::components::node_inspector::NodeInspector;
use crate::components::status_bar::StatusBar;
use crate::config::AppConfig;
use crate::graph::GraphSession;

/// Fetch a graph and hand it to the session. `None` loads the full graph.
fn spawn_load(session: RwSignal<GraphSession>, client: ApiClient, question: Option<String>) {
	let Some(token) = session.try_update(|s| s.begin_load()) else {
		return;
	};
	spawn_local(async move {
		let result = match question.as_deref() {
			Some(question) => client.query_graph(question).await,
			None => client.full_graph().await,
		};
		// The page may be gone by the time the response lands.
		let _ = session.try_update(|s| s.finish_load(token, result));
	});
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = AppConfig::from_location();
	log::debug!("starting with {config:?}");
	let client = ApiClient::new(&config);

	let session = RwSignal::new(GraphSession::new(config.hop_count));
	let selected = RwSignal::new(None::<String>);
	let query = RwSignal::new(String::new());

	spawn_load(session, client.clone(), None);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let question = query.get_untracked();
		let question = question.trim();
		if question.is_empty() {
			return;
		}
		selected.set(None);
		spawn_load(session, client.clone(), Some(question.to_owned()));
	};

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				session=session
				on_select={move |id: Option<String>| selected.set(id)}
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Case Graph"</h1>
				<form class="search-bar" on:submit=on_submit>
					<input
						type="search"
						placeholder="Ask about patients, encounters, medications..."
						prop:value=move || query.get()
						on:input=move |ev| query.set(event_target_value(&ev))
					/>
					<button type="submit">"Search"</button>
				</form>
				<p class="subtitle">"Click a node to inspect it. Scroll to zoom. Drag background to pan."</p>
			</div>
			<GraphFilters session=session />
			<NodeInspector session=session selected=selected />
			<StatusBar session=session />
		</div>
	}
}
