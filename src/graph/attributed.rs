//! The mutable, attributed multigraph the viewer renders.
//!
//! Nodes and edges live in insertion-ordered vectors ("slots") with id
//! lookup maps beside them, so the renderer can address elements by slot
//! while the filter and traversal code addresses them by id. Edges are
//! directed by source/target but adjacency is tracked in both directions.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::f64::consts::PI;

use super::palette;
use super::payload::GraphData;
use super::property::{NODE_TYPE_KEY, PropertyMap, PropertyValue};

/// Opaque node identity, unique within one graph.
pub type NodeId = String;
/// Opaque edge identity; parallel edges differ only by this.
pub type EdgeId = String;

/// A point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// Construction-time node attributes.
#[derive(Clone, Debug, Default)]
pub struct NodeAttrs {
	/// Text drawn next to the node.
	pub label: String,
	/// Type tag, e.g. `Patient`.
	pub node_type: String,
	/// Free-form properties.
	pub properties: PropertyMap,
	/// Initial layout position.
	pub position: Position,
}

/// Construction-time edge attributes.
#[derive(Clone, Debug, Default)]
pub struct EdgeAttrs {
	/// Relationship type, e.g. `PRESCRIBED`.
	pub relationship_type: String,
	/// Free-form properties.
	pub properties: PropertyMap,
}

/// A typed node with its rendering attributes.
#[derive(Clone, Debug)]
pub struct Node {
	/// Unique id within the graph.
	pub id: NodeId,
	/// Text drawn next to the node.
	pub label: String,
	/// Type tag; the key for node filtering.
	pub node_type: String,
	/// Free-form properties, including the type under `nodeType`.
	pub properties: PropertyMap,
	/// Assigned once at construction.
	pub position: Position,
	/// Output of the last style pass; never read as input.
	pub rendered_size: f64,
	/// Palette color from the last style pass.
	pub rendered_color: String,
	/// Soft-hide flag from the last style pass.
	pub hidden: bool,
}

/// A directed, typed edge. Parallel edges are allowed.
#[derive(Clone, Debug)]
pub struct Edge {
	/// Unique id within the graph.
	pub id: EdgeId,
	/// Id of the source node.
	pub source: NodeId,
	/// Id of the target node.
	pub target: NodeId,
	/// Relationship type; the key for edge filtering.
	pub relationship_type: String,
	/// Free-form properties.
	pub properties: PropertyMap,
	/// Palette color from the last style pass.
	pub rendered_color: String,
	/// Soft-hide flag from the last style pass.
	pub hidden: bool,
}

impl Edge {
	/// The endpoint across from `node_id`, or `None` if the edge is not incident.
	pub fn opposite(&self, node_id: &str) -> Option<&str> {
		if self.source == node_id {
			Some(self.target.as_str())
		} else if self.target == node_id {
			Some(self.source.as_str())
		} else {
			None
		}
	}
}

/// Nodes and edges addressable both by id and by insertion slot.
#[derive(Clone, Debug, Default)]
pub struct AttributedGraph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	node_slots: HashMap<NodeId, usize>,
	edge_slots: HashMap<EdgeId, usize>,
	endpoints: Vec<(usize, usize)>,
	incidence: HashMap<NodeId, Vec<usize>>,
}

impl AttributedGraph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a graph from one query result.
	///
	/// Nodes get a deterministic radial position per type ring. Edges whose
	/// endpoints are missing are dropped.
	pub fn from_data(data: &GraphData) -> Self {
		let mut graph = Self::new();
		let mut type_totals: HashMap<&str, usize> = HashMap::new();
		for node in &data.nodes {
			*type_totals.entry(node.node_type()).or_default() += 1;
		}

		let mut type_seen: HashMap<&str, usize> = HashMap::new();
		for (i, node) in data.nodes.iter().enumerate() {
			let node_type = node.node_type();
			let rank = type_seen.entry(node_type).or_default();
			let total = type_totals.get(node_type).copied().unwrap_or(1).max(1);
			let position = radial_position(node_type, *rank, total, i);
			*rank += 1;

			let mut properties = node.properties.clone();
			properties.insert(NODE_TYPE_KEY.into(), PropertyValue::from(node_type));
			graph.add_node(
				&node.id,
				NodeAttrs {
					label: node.display_label().to_owned(),
					node_type: node_type.to_owned(),
					properties,
					position,
				},
			);
		}

		let mut dropped = 0usize;
		for (i, link) in data.edges.iter().enumerate() {
			let id = link
				.id
				.clone()
				.filter(|id| !id.is_empty())
				.unwrap_or_else(|| format!("{}->{}#{}", link.source, link.target, i));
			let attrs = EdgeAttrs {
				relationship_type: link.relationship_type().to_owned(),
				properties: link.properties.clone(),
			};
			if !graph.add_edge(&id, &link.source, &link.target, attrs) {
				dropped += 1;
			}
		}
		if dropped > 0 {
			log::debug!("dropped {dropped} edges with missing endpoints or duplicate ids");
		}

		graph
	}

	/// Insert a node. First write wins: returns `false` if `id` exists.
	pub fn add_node(&mut self, id: &str, attrs: NodeAttrs) -> bool {
		if self.node_slots.contains_key(id) {
			return false;
		}
		let rendered_color = palette::node_color(&attrs.node_type).to_owned();
		let rendered_size = palette::node_size(&attrs.node_type);
		self.node_slots.insert(id.to_owned(), self.nodes.len());
		self.nodes.push(Node {
			id: id.to_owned(),
			label: attrs.label,
			node_type: attrs.node_type,
			properties: attrs.properties,
			position: attrs.position,
			rendered_size,
			rendered_color,
			hidden: false,
		});
		true
	}

	/// Insert an edge. Returns `false` without touching the graph when either
	/// endpoint is absent or the id is already taken.
	pub fn add_edge(&mut self, id: &str, source: &str, target: &str, attrs: EdgeAttrs) -> bool {
		if self.edge_slots.contains_key(id) {
			return false;
		}
		let (Some(src), Some(tgt)) = (self.node_slot(source), self.node_slot(target)) else {
			return false;
		};
		let slot = self.edges.len();
		self.endpoints.push((src, tgt));
		let rendered_color = palette::edge_color(&attrs.relationship_type).to_owned();
		self.edge_slots.insert(id.to_owned(), slot);
		self.edges.push(Edge {
			id: id.to_owned(),
			source: source.to_owned(),
			target: target.to_owned(),
			relationship_type: attrs.relationship_type,
			properties: attrs.properties,
			rendered_color,
			hidden: false,
		});
		self.incidence.entry(source.to_owned()).or_default().push(slot);
		if source != target {
			self.incidence.entry(target.to_owned()).or_default().push(slot);
		}
		true
	}

	/// Whether a node with `id` exists.
	pub fn has_node(&self, id: &str) -> bool {
		self.node_slots.contains_key(id)
	}

	/// Whether an edge with `id` exists.
	pub fn has_edge(&self, id: &str) -> bool {
		self.edge_slots.contains_key(id)
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_slots.get(id).map(|&slot| &self.nodes[slot])
	}

	/// Mutable node by id.
	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.node_slots.get(id).map(|&slot| &mut self.nodes[slot])
	}

	/// Edge by id.
	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edge_slots.get(id).map(|&slot| &self.edges[slot])
	}

	/// Mutable edge by id.
	pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
		self.edge_slots.get(id).map(|&slot| &mut self.edges[slot])
	}

	/// Insertion slot of a node.
	pub fn node_slot(&self, id: &str) -> Option<usize> {
		self.node_slots.get(id).copied()
	}

	/// Insertion slot of an edge.
	pub fn edge_slot(&self, id: &str) -> Option<usize> {
		self.edge_slots.get(id).copied()
	}

	/// All nodes in slot order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All edges in slot order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Source and target node slots of every edge, indexed by edge slot.
	pub fn endpoint_slots(&self) -> &[(usize, usize)] {
		&self.endpoints
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
		&mut self.edges
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// True when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Incident edges of `node_id`, as source or target.
	pub fn incident_edges<'a>(&'a self, node_id: &str) -> impl Iterator<Item = &'a Edge> + use<'a> {
		self.incidence
			.get(node_id)
			.into_iter()
			.flatten()
			.map(|&slot| &self.edges[slot])
	}

	/// Ids of every incident edge of `node_id`, as source or target.
	pub fn edges_of(&self, node_id: &str) -> Vec<&str> {
		self.incident_edges(node_id).map(|e| e.id.as_str()).collect()
	}

	/// Distinct adjacent node ids, ignoring edge direction.
	pub fn neighbors(&self, node_id: &str) -> HashSet<&str> {
		self.incident_edges(node_id)
			.filter_map(|e| e.opposite(node_id))
			.collect()
	}

	/// Every node type present, sorted.
	pub fn node_types(&self) -> BTreeSet<String> {
		self.nodes.iter().map(|n| n.node_type.clone()).collect()
	}

	/// Every relationship type present, sorted.
	pub fn relationship_types(&self) -> BTreeSet<String> {
		self.edges
			.iter()
			.map(|e| e.relationship_type.clone())
			.collect()
	}
}

fn radial_position(node_type: &str, rank: usize, total: usize, index: usize) -> Position {
	let radius = palette::layout_radius(node_type);
	let angle = (rank as f64) * 2.0 * PI / total as f64;
	let jitter = (jitter(index) - 0.5) * 50.0;
	Position {
		x: angle.cos() * radius + jitter,
		y: angle.sin() * radius + jitter,
	}
}

/// Cheap deterministic value in [0, 1) for a seed.
fn jitter(seed: usize) -> f64 {
	const MODULUS: u64 = 233280;
	// Reduced first so the product stays in range for any seed width.
	let seed = seed as u64 % MODULUS;
	let x = ((seed + 1) * 9301 + 49297) % MODULUS;
	(x as f64) / MODULUS as f64
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::payload::{GraphLink, GraphNode};

	fn node(id: &str, label: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: Some(label.into()),
			..Default::default()
		}
	}

	fn link(id: &str, source: &str, target: &str, kind: &str) -> GraphLink {
		GraphLink {
			id: Some(id.into()),
			source: source.into(),
			target: target.into(),
			kind: Some(kind.into()),
			..Default::default()
		}
	}

	#[test]
	fn first_node_write_wins() {
		let mut graph = AttributedGraph::new();
		assert!(graph.add_node(
			"n",
			NodeAttrs {
				label: "first".into(),
				node_type: "Patient".into(),
				..Default::default()
			}
		));
		assert!(!graph.add_node(
			"n",
			NodeAttrs {
				label: "second".into(),
				..Default::default()
			}
		));
		assert_eq!(graph.node_count(), 1);
		assert_eq!(graph.node("n").unwrap().label, "first");
	}

	#[test]
	fn multi_edges_and_undirected_neighbors() {
		let data = GraphData {
			nodes: vec![node("a", "Patient"), node("b", "Clinician"), node("c", "Encounter")],
			edges: vec![
				link("e1", "a", "b", "TREATED_BY"),
				link("e2", "a", "b", "SEEN_BY"),
				link("e3", "c", "a", "HAS_ENCOUNTER"),
			],
		};
		let graph = AttributedGraph::from_data(&data);

		let mut edges = graph.edges_of("a");
		edges.sort();
		assert_eq!(edges, vec!["e1", "e2", "e3"]);
		assert_eq!(graph.neighbors("a"), HashSet::from(["b", "c"]));
		assert_eq!(graph.neighbors("c"), HashSet::from(["a"]));
		assert_eq!(graph.edges_of("b"), vec!["e1", "e2"]);
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let data = GraphData {
			nodes: vec![node("a", "Patient")],
			edges: vec![link("e1", "a", "ghost", "HAS_SYMPTOM")],
		};
		let graph = AttributedGraph::from_data(&data);

		assert_eq!(graph.edge_count(), 0);
		assert!(graph.edges_of("a").is_empty());
		assert!(!graph.has_edge("e1"));
	}

	#[test]
	fn type_tag_is_copied_into_properties() {
		let graph = AttributedGraph::from_data(&GraphData {
			nodes: vec![node("a", "Disease"), GraphNode {
				id: "b".into(),
				..Default::default()
			}],
			edges: vec![],
		});
		assert_eq!(
			graph.node("a").unwrap().properties[NODE_TYPE_KEY],
			PropertyValue::from("Disease")
		);
		assert_eq!(graph.node("b").unwrap().node_type, "Unknown");
		assert_eq!(
			graph.node_types(),
			BTreeSet::from(["Disease".to_string(), "Unknown".to_string()])
		);
	}

	#[test]
	fn layout_is_deterministic() {
		let data = GraphData {
			nodes: vec![node("a", "Patient"), node("b", "Patient"), node("c", "Test")],
			edges: vec![],
		};
		let first = AttributedGraph::from_data(&data);
		let second = AttributedGraph::from_data(&data);
		for (x, y) in first.nodes().iter().zip(second.nodes()) {
			assert_eq!(x.position, y.position);
		}
		assert_ne!(first.nodes()[0].position, first.nodes()[1].position);
	}

	#[test]
	fn self_loop_is_listed_once() {
		let mut graph = AttributedGraph::new();
		graph.add_node("a", NodeAttrs::default());
		assert!(graph.add_edge("loop", "a", "a", EdgeAttrs::default()));
		assert_eq!(graph.edges_of("a"), vec!["loop"]);
		assert_eq!(graph.neighbors("a"), HashSet::from(["a"]));
	}

	#[test]
	fn jitter_handles_huge_indices() {
		for seed in [0, 461_000, 1 << 31, usize::MAX] {
			let value = jitter(seed);
			assert!((0.0..1.0).contains(&value), "{seed} -> {value}");
		}
		assert_eq!(jitter(7), jitter(7 + 233280));
	}
}
