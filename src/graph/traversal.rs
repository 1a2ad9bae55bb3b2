//! "Reveal the N-hop neighbourhood" traversal.

use std::collections::HashSet;
use std::num::NonZeroU32;

use super::attributed::{AttributedGraph, EdgeId, NodeId};
use super::filter::FilterState;

/// Nodes and edges reachable from a center within the hop budget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reachable {
	/// Revealed node ids, including the center.
	pub nodes: HashSet<NodeId>,
	/// Revealed edge ids.
	pub edges: HashSet<EdgeId>,
}

impl Reachable {
	/// True when nothing was reached.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Bounded breadth-first search from `center`, treating edges as undirected.
///
/// Edges failing the relationship filter are not walked at all. An edge
/// that passes is recorded even when its far endpoint fails the node filter;
/// that endpoint is then neither revealed nor expanded. Nodes found on the
/// last hop are revealed but not expanded. An absent center yields nothing.
pub fn reachable_within(
	graph: &AttributedGraph,
	filters: &FilterState,
	center: &str,
	hops: NonZeroU32,
) -> Reachable {
	let mut reach = Reachable::default();
	if !graph.has_node(center) {
		return reach;
	}
	reach.nodes.insert(center.to_owned());

	let mut frontier: Vec<&str> = vec![center];
	let hops = hops.get();
	for hop in 1..=hops {
		let mut next: Vec<&str> = Vec::new();
		for &node_id in &frontier {
			for edge in graph.incident_edges(node_id) {
				if !filters.passes_edge(edge) {
					continue;
				}
				reach.edges.insert(edge.id.clone());

				let Some(other) = edge.opposite(node_id) else {
					continue;
				};
				let passes = graph.node(other).is_some_and(|n| filters.passes_node(n));
				if passes && reach.nodes.insert(other.to_owned()) && hop < hops {
					next.push(other);
				}
			}
		}
		if next.is_empty() {
			break;
		}
		frontier = next;
	}
	reach
}

/// A running traversal. The center is always among the revealed nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTraversal {
	/// Node the search started from.
	pub center: NodeId,
	/// Nodes and edges found by the search.
	pub revealed: Reachable,
}

/// Single-focus traversal state: idle, or one active traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalState {
	hop_count: NonZeroU32,
	active: Option<ActiveTraversal>,
}

impl Default for TraversalState {
	fn default() -> Self {
		Self::new(NonZeroU32::MIN)
	}
}

impl TraversalState {
	/// Idle state with the given hop budget.
	pub fn new(hop_count: NonZeroU32) -> Self {
		Self {
			hop_count,
			active: None,
		}
	}

	/// Hop budget for traversals.
	pub fn hop_count(&self) -> NonZeroU32 {
		self.hop_count
	}

	/// Whether a traversal is running.
	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	/// The running traversal, if any.
	pub fn active(&self) -> Option<&ActiveTraversal> {
		self.active.as_ref()
	}

	/// Center of the running traversal.
	pub fn center(&self) -> Option<&str> {
		self.active.as_ref().map(|a| a.center.as_str())
	}

	/// Whether `node_id` is the running traversal's center.
	pub fn is_center(&self, node_id: &str) -> bool {
		self.center() == Some(node_id)
	}

	/// Whether the running traversal revealed `node_id`.
	pub fn reveals_node(&self, node_id: &str) -> bool {
		self.active
			.as_ref()
			.is_some_and(|a| a.revealed.nodes.contains(node_id))
	}

	/// Whether the running traversal revealed `edge_id`.
	pub fn reveals_edge(&self, edge_id: &str) -> bool {
		self.active
			.as_ref()
			.is_some_and(|a| a.revealed.edges.contains(edge_id))
	}

	/// Start (or restart) a traversal at `center`, replacing any previous one.
	///
	/// Returns `false` and leaves the state idle if `center` is not in the
	/// graph.
	pub fn begin(&mut self, graph: &AttributedGraph, filters: &FilterState, center: &str) -> bool {
		let revealed = reachable_within(graph, filters, center, self.hop_count);
		if revealed.is_empty() {
			self.active = None;
			return false;
		}
		self.active = Some(ActiveTraversal {
			center: center.to_owned(),
			revealed,
		});
		true
	}

	/// Change the hop budget; an active traversal is recomputed in place.
	pub fn set_hop_count(&mut self, hop_count: NonZeroU32, graph: &AttributedGraph, filters: &FilterState) {
		self.hop_count = hop_count;
		if let Some(center) = self.active.as_ref().map(|a| a.center.clone()) {
			self.begin(graph, filters, &center);
		}
	}

	/// Return to idle.
	pub fn stop(&mut self) {
		self.active = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::attributed::{EdgeAttrs, NodeAttrs};
	use crate::graph::filter::FilterAxis;

	fn hops(n: u32) -> NonZeroU32 {
		NonZeroU32::new(n).unwrap()
	}

	fn set(items: &[&str]) -> HashSet<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	fn graph(nodes: &[(&str, &str)], edges: &[(&str, &str, &str, &str)]) -> AttributedGraph {
		let mut g = AttributedGraph::new();
		for (id, ty) in nodes {
			g.add_node(
				id,
				NodeAttrs {
					node_type: ty.to_string(),
					..Default::default()
				},
			);
		}
		for (id, s, t, ty) in edges {
			g.add_edge(
				id,
				s,
				t,
				EdgeAttrs {
					relationship_type: ty.to_string(),
					..Default::default()
				},
			);
		}
		g
	}

	fn star() -> AttributedGraph {
		graph(
			&[("C", "Patient"), ("A", "Symptom"), ("B", "Symptom"), ("D", "Disease")],
			&[("ca", "C", "A", "T1"), ("cb", "C", "B", "T1"), ("cd", "C", "D", "T2")],
		)
	}

	#[test]
	fn one_hop_respects_edge_filter() {
		let g = star();
		let mut filters = FilterState::seeded(&g);
		filters.set_included_types(FilterAxis::Edges, set(&["T1"]).into_iter().collect());

		let reach = reachable_within(&g, &filters, "C", hops(1));
		assert_eq!(reach.nodes, set(&["C", "A", "B"]));
		assert_eq!(reach.edges, set(&["ca", "cb"]));
	}

	#[test]
	fn two_hops_follow_a_chain_in_either_direction() {
		let g = graph(
			&[("C", "Patient"), ("A", "Encounter"), ("B", "Clinician"), ("Z", "Test")],
			&[("e1", "C", "A", "HAS_ENCOUNTER"), ("e2", "B", "A", "ATTENDED"), ("e3", "B", "Z", "ORDERED")],
		);
		let filters = FilterState::seeded(&g);

		let reach = reachable_within(&g, &filters, "C", hops(2));
		assert_eq!(reach.nodes, set(&["C", "A", "B"]));
		assert_eq!(reach.edges, set(&["e1", "e2"]));

		let one = reachable_within(&g, &filters, "C", hops(1));
		assert_eq!(one.nodes, set(&["C", "A"]));
	}

	#[test]
	fn filtered_endpoint_is_not_revealed_or_expanded() {
		let g = graph(
			&[("C", "Patient"), ("M", "Medication"), ("X", "Disease")],
			&[("cm", "C", "M", "PRESCRIBED"), ("mx", "M", "X", "TREATS")],
		);
		let mut filters = FilterState::seeded(&g);
		filters.set_included_types(FilterAxis::Nodes, set(&["Patient", "Disease"]).into_iter().collect());

		let reach = reachable_within(&g, &filters, "C", hops(3));
		assert_eq!(reach.nodes, set(&["C"]));
		assert_eq!(reach.edges, set(&["cm"]));
	}

	#[test]
	fn cycles_terminate() {
		let g = graph(
			&[("a", "T"), ("b", "T"), ("c", "T")],
			&[("ab", "a", "b", "R"), ("bc", "b", "c", "R"), ("ca", "c", "a", "R")],
		);
		let filters = FilterState::seeded(&g);

		let reach = reachable_within(&g, &filters, "a", hops(10));
		assert_eq!(reach.nodes, set(&["a", "b", "c"]));
		assert_eq!(reach.edges, set(&["ab", "bc", "ca"]));
	}

	#[test]
	fn absent_center_reveals_nothing() {
		let g = star();
		let filters = FilterState::seeded(&g);
		assert!(reachable_within(&g, &filters, "nope", hops(1)).is_empty());

		let mut state = TraversalState::default();
		assert!(state.begin(&g, &filters, "C"));
		assert!(!state.begin(&g, &filters, "nope"));
		assert!(!state.is_active());
	}

	#[test]
	fn restart_replaces_previous_neighbourhood() {
		let g = graph(
			&[("A", "T"), ("B", "T"), ("a1", "T"), ("b1", "T"), ("shared", "T")],
			&[
				("A-a1", "A", "a1", "R"),
				("A-shared", "A", "shared", "R"),
				("B-b1", "B", "b1", "R"),
				("B-shared", "B", "shared", "R"),
			],
		);
		let filters = FilterState::seeded(&g);
		let mut state = TraversalState::default();

		state.begin(&g, &filters, "A");
		state.begin(&g, &filters, "B");

		assert_eq!(state.center(), Some("B"));
		let active = state.active().unwrap();
		assert_eq!(active.revealed.nodes, set(&["B", "b1", "shared"]));
		assert!(!state.reveals_node("a1"));
	}

	#[test]
	fn hop_change_recomputes_active_traversal() {
		let g = graph(
			&[("C", "T"), ("A", "T"), ("B", "T")],
			&[("ca", "C", "A", "R"), ("ab", "A", "B", "R")],
		);
		let filters = FilterState::seeded(&g);
		let mut state = TraversalState::default();

		state.begin(&g, &filters, "C");
		assert!(!state.reveals_node("B"));

		state.set_hop_count(hops(2), &g, &filters);
		assert!(state.reveals_node("B"));
		assert!(state.reveals_edge("ab"));
		assert!(state.is_center("C"));

		state.stop();
		assert_eq!(state.center(), None);
		assert_eq!(state.hop_count(), hops(2));
	}
}
