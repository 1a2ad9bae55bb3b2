//! The single store that owns graph, filter and traversal state.
//!
//! Every user interaction is a [`GraphAction`] applied through
//! [`GraphSession::dispatch`]; each dispatch ends with a style pass that
//! rewrites the soft-hide attributes on the graph.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use log::{debug, info, warn};

use super::attributed::AttributedGraph;
use super::filter::{FilterAxis, FilterState};
use super::payload::GraphData;
use super::traversal::TraversalState;
use super::visibility::{self, VisibilityResolver};
use crate::error::GraphError;

/// The mutation entry points of the viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphAction {
	/// Replace the selection on one axis; leaves show-all mode.
	SelectTypes {
		axis: FilterAxis,
		types: BTreeSet<String>,
	},
	/// Turn show-all on or off for one axis.
	SetShowAll {
		axis: FilterAxis,
		show_all: bool,
	},
	/// Start a traversal centered on `node_id`, replacing any current one.
	BeginTraversal {
		node_id: String,
	},
	/// End the current traversal.
	StopTraversal,
	/// Change the hop budget; recomputes an active traversal.
	SetHopCount(u32),
}

/// Identifies one in-flight graph fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Progress of the latest graph fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// A fetch is in flight.
	Loading,
	/// The latest fetch succeeded.
	Ready,
	/// The latest fetch failed with this message.
	Failed(String),
}

/// Graph, filters and traversal for one viewer.
#[derive(Clone, Debug)]
pub struct GraphSession {
	graph: AttributedGraph,
	filters: FilterState,
	traversal: TraversalState,
	status: LoadStatus,
	latest_request: u64,
	revision: u64,
}

impl Default for GraphSession {
	fn default() -> Self {
		Self::new(NonZeroU32::MIN)
	}
}

impl GraphSession {
	/// An empty session: nothing to filter or traverse yet.
	pub fn new(hop_count: NonZeroU32) -> Self {
		Self {
			graph: AttributedGraph::new(),
			filters: FilterState::default(),
			traversal: TraversalState::new(hop_count),
			status: LoadStatus::Idle,
			latest_request: 0,
			revision: 0,
		}
	}

	/// The current graph.
	pub fn graph(&self) -> &AttributedGraph {
		&self.graph
	}

	/// The current type filters.
	pub fn filters(&self) -> &FilterState {
		&self.filters
	}

	/// The current traversal state.
	pub fn traversal(&self) -> &TraversalState {
		&self.traversal
	}

	/// Status of the latest fetch.
	pub fn status(&self) -> &LoadStatus {
		&self.status
	}

	/// Bumped every time the graph instance is replaced.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Visibility and style queries over the current state.
	pub fn resolver(&self) -> VisibilityResolver<'_> {
		VisibilityResolver::new(&self.graph, &self.filters, &self.traversal)
	}

	/// Filter and traversal visibility of a node.
	pub fn is_node_visible(&self, node_id: &str) -> bool {
		self.resolver().is_node_visible(node_id)
	}

	/// Filter and traversal visibility of an edge.
	pub fn is_edge_visible(&self, edge_id: &str) -> bool {
		self.resolver().is_edge_visible(edge_id)
	}

	/// Nodes left unhidden by the last style pass.
	pub fn visible_node_count(&self) -> usize {
		self.graph.nodes().iter().filter(|n| !n.hidden).count()
	}

	/// Edges left unhidden by the last style pass.
	pub fn visible_edge_count(&self) -> usize {
		self.graph.edges().iter().filter(|e| !e.hidden).count()
	}

	/// Issue a token for a new fetch. Any older token becomes stale.
	pub fn begin_load(&mut self) -> RequestToken {
		self.latest_request += 1;
		self.status = LoadStatus::Loading;
		RequestToken(self.latest_request)
	}

	/// Whether `token` belongs to the latest fetch.
	pub fn is_current(&self, token: RequestToken) -> bool {
		token.0 == self.latest_request
	}

	/// Complete the fetch identified by `token`.
	///
	/// Stale responses are dropped and `false` is returned. A failure leaves
	/// an empty graph behind together with the error message.
	pub fn finish_load(&mut self, token: RequestToken, result: Result<GraphData, GraphError>) -> bool {
		if !self.is_current(token) {
			warn!("discarding stale graph response {:?} (latest is {})", token, self.latest_request);
			return false;
		}
		match result {
			Ok(data) => {
				self.load(AttributedGraph::from_data(&data));
			}
			Err(err) => {
				warn!("graph load failed: {err}");
				self.load(AttributedGraph::new());
				self.status = LoadStatus::Failed(err.to_string());
			}
		}
		true
	}

	/// Replace the graph. Filters are re-seeded and any traversal is dropped.
	pub fn load(&mut self, graph: AttributedGraph) {
		info!(
			"loaded graph with {} nodes and {} edges",
			graph.node_count(),
			graph.edge_count()
		);
		self.filters = FilterState::seeded(&graph);
		self.graph = graph;
		self.traversal.stop();
		self.status = LoadStatus::Ready;
		self.revision += 1;
		self.refresh();
	}

	/// Apply one action and refresh the soft-hide flags.
	pub fn dispatch(&mut self, action: GraphAction) {
		debug!("dispatch {action:?}");
		match action {
			GraphAction::SelectTypes { axis, types } => {
				self.filters.set_included_types(axis, types);
			}
			GraphAction::SetShowAll { axis, show_all } => {
				self.filters.set_include_all(axis, show_all, &self.graph);
			}
			GraphAction::BeginTraversal { node_id } => {
				if !self.traversal.begin(&self.graph, &self.filters, &node_id) {
					warn!("cannot traverse from {node_id}: not in the graph");
				}
			}
			GraphAction::StopTraversal => self.traversal.stop(),
			GraphAction::SetHopCount(hops) => {
				let hops = NonZeroU32::new(hops).unwrap_or(NonZeroU32::MIN);
				self.traversal.set_hop_count(hops, &self.graph, &self.filters);
			}
		}
		self.refresh();
	}

	/// Flip one type in the picker for `axis`.
	pub fn toggle_type(&mut self, axis: FilterAxis, type_tag: &str) {
		let types = self.filters.toggled(axis, type_tag, &self.graph);
		self.dispatch(GraphAction::SelectTypes { axis, types });
	}

	fn refresh(&mut self) {
		visibility::apply_styles(&mut self.graph, &self.filters, &self.traversal);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::payload::{GraphLink, GraphNode};

	fn data() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode {
					id: "p".into(),
					label: Some("Patient".into()),
					..Default::default()
				},
				GraphNode {
					id: "m".into(),
					label: Some("Medication".into()),
					..Default::default()
				},
			],
			edges: vec![GraphLink {
				id: Some("pm".into()),
				source: "p".into(),
				target: "m".into(),
				kind: Some("PRESCRIBED".into()),
				..Default::default()
			}],
		}
	}

	#[test]
	fn stale_responses_are_discarded() {
		let mut session = GraphSession::default();
		let first = session.begin_load();
		let second = session.begin_load();

		assert!(!session.finish_load(first, Ok(data())));
		assert!(session.graph().is_empty());
		assert_eq!(session.status(), &LoadStatus::Loading);

		assert!(session.finish_load(second, Ok(data())));
		assert_eq!(session.graph().node_count(), 2);
		assert_eq!(session.status(), &LoadStatus::Ready);
	}

	#[test]
	fn failure_leaves_an_empty_graph() {
		let mut session = GraphSession::default();
		let token = session.begin_load();
		assert!(session.finish_load(token, Ok(data())));

		let token = session.begin_load();
		session.finish_load(token, Err(GraphError::Status(502)));
		assert!(session.graph().is_empty());
		assert!(matches!(session.status(), LoadStatus::Failed(msg) if msg.contains("502")));

		session.dispatch(GraphAction::BeginTraversal { node_id: "p".into() });
		assert!(!session.traversal().is_active());
		assert_eq!(session.visible_node_count(), 0);
	}

	#[test]
	fn reload_clears_traversal_and_reseeds_filters() {
		let mut session = GraphSession::default();
		let token = session.begin_load();
		session.finish_load(token, Ok(data()));
		let revision = session.revision();

		session.dispatch(GraphAction::SelectTypes {
			axis: FilterAxis::Nodes,
			types: BTreeSet::from(["Patient".to_string()]),
		});
		session.dispatch(GraphAction::BeginTraversal { node_id: "p".into() });
		assert!(session.traversal().is_active());

		let token = session.begin_load();
		session.finish_load(token, Ok(data()));
		assert!(!session.traversal().is_active());
		assert!(session.filters().nodes.include_all);
		assert!(session.revision() > revision);
	}

	#[test]
	fn hop_count_of_zero_is_clamped() {
		let mut session = GraphSession::default();
		session.dispatch(GraphAction::SetHopCount(0));
		assert_eq!(session.traversal().hop_count().get(), 1);
		session.dispatch(GraphAction::SetHopCount(3));
		assert_eq!(session.traversal().hop_count().get(), 3);
	}

	#[test]
	fn toggle_type_narrows_from_show_all() {
		let mut session = GraphSession::default();
		session.load(AttributedGraph::from_data(&data()));

		session.toggle_type(FilterAxis::Nodes, "Medication");
		assert!(!session.filters().nodes.include_all);
		assert!(session.is_node_visible("p"));
		assert!(!session.is_node_visible("m"));
		assert_eq!(session.visible_edge_count(), 0);
	}
}
