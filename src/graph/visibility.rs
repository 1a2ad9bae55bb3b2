//! Per-element visibility and style decisions.
//!
//! Visibility is a two-layer AND: an element must pass the global type
//! filter, and while a traversal is active it must also be in the revealed
//! set. Everything here is recomputed from current state on every call.

use super::attributed::{AttributedGraph, Edge, Node};
use super::filter::FilterState;
use super::palette::{self, CENTER_BORDER, REVEALED_BORDER};
use super::traversal::TraversalState;

/// Size multiplier for the traversal center.
pub const CENTER_SCALE: f64 = 1.5;
/// Edge opacity when not hovered.
pub const EDGE_ALPHA: f64 = 0.55;
/// Base edge stroke width in world units.
pub const EDGE_WIDTH: f64 = 2.0;

/// What the renderer should draw for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRender {
	/// Fill color.
	pub color: &'static str,
	/// Diameter in world units.
	pub size: f64,
	/// Outline color for traversal highlighting.
	pub border: Option<&'static str>,
	/// Skip drawing.
	pub hidden: bool,
}

/// What the renderer should draw for one edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRender {
	/// Stroke color.
	pub color: String,
	/// Stroke width in world units.
	pub width: f64,
	/// Stroke opacity.
	pub alpha: f64,
	/// Skip drawing.
	pub hidden: bool,
}

/// Answers visibility and style questions for one snapshot of graph, filters and traversal.
#[derive(Clone, Copy)]
pub struct VisibilityResolver<'a> {
	graph: &'a AttributedGraph,
	filters: &'a FilterState,
	traversal: &'a TraversalState,
}

impl<'a> VisibilityResolver<'a> {
	/// Resolver over borrowed state.
	pub fn new(graph: &'a AttributedGraph, filters: &'a FilterState, traversal: &'a TraversalState) -> Self {
		Self {
			graph,
			filters,
			traversal,
		}
	}

	/// Absent nodes are never visible.
	pub fn is_node_visible(&self, node_id: &str) -> bool {
		self.graph.node(node_id).is_some_and(|n| self.node_visible(n))
	}

	/// Absent edges are never visible.
	pub fn is_edge_visible(&self, edge_id: &str) -> bool {
		self.graph.edge(edge_id).is_some_and(|e| self.edge_visible(e))
	}

	/// Two-layer visibility of a node.
	pub fn node_visible(&self, node: &Node) -> bool {
		self.filters.passes_node(node)
			&& (!self.traversal.is_active() || self.traversal.reveals_node(&node.id))
	}

	/// Two-layer visibility of an edge.
	pub fn edge_visible(&self, edge: &Edge) -> bool {
		self.filters.passes_edge(edge)
			&& (!self.traversal.is_active() || self.traversal.reveals_edge(&edge.id))
	}

	/// An edge is drawn only when it is visible and both endpoints are.
	pub fn edge_drawable(&self, edge: &Edge) -> bool {
		self.edge_visible(edge)
			&& self.is_node_visible(&edge.source)
			&& self.is_node_visible(&edge.target)
	}

	/// Color, size and border for a node.
	pub fn node_style(&self, node: &Node) -> NodeRender {
		let base = palette::node_size(&node.node_type);
		let (size, border) = if self.traversal.is_center(&node.id) {
			(base * CENTER_SCALE, Some(CENTER_BORDER))
		} else if self.traversal.reveals_node(&node.id) {
			(base, Some(REVEALED_BORDER))
		} else {
			(base, None)
		};
		NodeRender {
			color: palette::node_color(&node.node_type),
			size,
			border,
			hidden: !self.node_visible(node),
		}
	}

	/// Hovered edges are brightened, drawn twice as thick and fully opaque.
	pub fn edge_style(&self, edge: &Edge, hovered: bool) -> EdgeRender {
		let base = palette::rgb_or_default(palette::edge_color(&edge.relationship_type));
		let (color, width, alpha) = if hovered {
			(base.brighten(0.35), EDGE_WIDTH * 2.0, 1.0)
		} else {
			(base, EDGE_WIDTH, EDGE_ALPHA)
		};
		EdgeRender {
			color: color.rgba(alpha),
			width,
			alpha,
			hidden: !self.edge_drawable(edge),
		}
	}

	/// Number of visible nodes.
	pub fn visible_node_count(&self) -> usize {
		self.graph.nodes().iter().filter(|n| self.node_visible(n)).count()
	}

	/// Number of visible edges.
	pub fn visible_edge_count(&self) -> usize {
		self.graph.edges().iter().filter(|e| self.edge_drawable(e)).count()
	}
}

/// Write the resolver's decisions back onto the graph's output attributes.
///
/// Nothing is removed from the graph; hidden elements keep their slots so
/// filters and traversals stay reversible.
pub fn apply_styles(graph: &mut AttributedGraph, filters: &FilterState, traversal: &TraversalState) {
	let (nodes, edges): (Vec<NodeRender>, Vec<EdgeRender>) = {
		let resolver = VisibilityResolver::new(graph, filters, traversal);
		(
			graph.nodes().iter().map(|n| resolver.node_style(n)).collect(),
			graph.edges().iter().map(|e| resolver.edge_style(e, false)).collect(),
		)
	};
	for (node, style) in graph.nodes_mut().iter_mut().zip(nodes) {
		node.rendered_color = style.color.to_owned();
		node.rendered_size = style.size;
		node.hidden = style.hidden;
	}
	for (edge, style) in graph.edges_mut().iter_mut().zip(edges) {
		edge.rendered_color = style.color;
		edge.hidden = style.hidden;
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::graph::attributed::{EdgeAttrs, NodeAttrs};
	use crate::graph::filter::FilterAxis;

	fn sample() -> AttributedGraph {
		let mut g = AttributedGraph::new();
		for (id, ty) in [("p", "Patient"), ("s", "Symptom"), ("d", "Disease"), ("far", "Patient")] {
			g.add_node(
				id,
				NodeAttrs {
					node_type: ty.into(),
					..Default::default()
				},
			);
		}
		for (id, s, t, ty) in [
			("ps", "p", "s", "HAS_SYMPTOM"),
			("pd", "p", "d", "DIAGNOSED_WITH"),
			("d-far", "d", "far", "DIAGNOSED_WITH"),
		] {
			g.add_edge(
				id,
				s,
				t,
				EdgeAttrs {
					relationship_type: ty.into(),
					..Default::default()
				},
			);
		}
		g
	}

	fn types(list: &[&str]) -> BTreeSet<String> {
		list.iter().map(|s| s.to_string()).collect()
	}

	#[test]
	fn idle_visibility_is_the_type_filter() {
		let g = sample();
		let mut filters = FilterState::seeded(&g);
		let traversal = TraversalState::default();
		filters.set_included_types(FilterAxis::Nodes, types(&["Patient", "Symptom"]));

		let resolver = VisibilityResolver::new(&g, &filters, &traversal);
		assert!(resolver.is_node_visible("p"));
		assert!(!resolver.is_node_visible("d"));
		assert!(!resolver.is_node_visible("missing"));
		assert!(resolver.is_edge_visible("pd"), "edge type still passes");
		assert!(!resolver.edge_drawable(g.edge("pd").unwrap()), "endpoint hidden");
		assert_eq!(resolver.visible_node_count(), 3);
		assert_eq!(resolver.visible_edge_count(), 1);
	}

	#[test]
	fn traversal_intersects_with_filter() {
		let g = sample();
		let mut filters = FilterState::seeded(&g);
		let mut traversal = TraversalState::default();
		traversal.begin(&g, &filters, "p");

		{
			let resolver = VisibilityResolver::new(&g, &filters, &traversal);
			assert!(resolver.is_node_visible("d"));
			assert!(!resolver.is_node_visible("far"), "outside the neighbourhood");
			assert!(!resolver.is_edge_visible("d-far"));
		}

		filters.set_included_types(FilterAxis::Nodes, types(&["Patient", "Symptom"]));
		let resolver = VisibilityResolver::new(&g, &filters, &traversal);
		assert!(traversal.reveals_node("d"));
		assert!(!resolver.is_node_visible("d"));
	}

	#[test]
	fn traversal_styles_center_and_neighbours() {
		let g = sample();
		let filters = FilterState::seeded(&g);
		let mut traversal = TraversalState::default();
		traversal.begin(&g, &filters, "p");
		let resolver = VisibilityResolver::new(&g, &filters, &traversal);

		let center = resolver.node_style(g.node("p").unwrap());
		assert_eq!(center.size, 30.0);
		assert_eq!(center.border, Some(CENTER_BORDER));

		let neighbour = resolver.node_style(g.node("s").unwrap());
		assert_eq!(neighbour.size, 12.0);
		assert_eq!(neighbour.border, Some(REVEALED_BORDER));

		let outside = resolver.node_style(g.node("far").unwrap());
		assert!(outside.hidden);
		assert_eq!(outside.border, None);
	}

	#[test]
	fn hovered_edge_is_thicker_and_opaque() {
		let g = sample();
		let filters = FilterState::seeded(&g);
		let traversal = TraversalState::default();
		let resolver = VisibilityResolver::new(&g, &filters, &traversal);
		let edge = g.edge("ps").unwrap();

		let idle = resolver.edge_style(edge, false);
		let hovered = resolver.edge_style(edge, true);
		assert_eq!(idle.alpha, EDGE_ALPHA);
		assert_eq!(hovered.alpha, 1.0);
		assert_eq!(hovered.width, idle.width * 2.0);
		assert_ne!(hovered.color, idle.color);
	}

	#[test]
	fn apply_styles_soft_hides() {
		let mut g = sample();
		let filters = FilterState::seeded(&g);
		let mut traversal = TraversalState::default();
		traversal.begin(&g, &filters, "s");

		apply_styles(&mut g, &filters, &traversal);
		assert_eq!(g.node_count(), 4);
		assert!(!g.node("s").unwrap().hidden);
		assert!(!g.node("p").unwrap().hidden);
		assert!(g.node("d").unwrap().hidden);
		assert!(g.edge("pd").unwrap().hidden);
		assert_eq!(g.node("s").unwrap().rendered_size, 18.0);

		traversal.stop();
		apply_styles(&mut g, &filters, &traversal);
		assert!(g.nodes().iter().all(|n| !n.hidden));
		assert!(g.edges().iter().all(|e| !e.hidden));
	}
}
