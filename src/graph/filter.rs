//! User-controlled type filters over the two axes of the graph.

use std::collections::BTreeSet;

use super::attributed::{AttributedGraph, Edge, Node};

/// Which element kind a filter applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterAxis {
	/// Filter on node type.
	Nodes,
	/// Filter on relationship type.
	Edges,
}

impl FilterAxis {
	/// Heading shown in the filter panel.
	pub fn label(self) -> &'static str {
		match self {
			Self::Nodes => "Node Type",
			Self::Edges => "Relationship Type",
		}
	}

	/// Types of this axis present in `graph`.
	pub fn known_types(self, graph: &AttributedGraph) -> BTreeSet<String> {
		match self {
			Self::Nodes => graph.node_types(),
			Self::Edges => graph.relationship_types(),
		}
	}
}

/// Inclusion rule for one axis.
///
/// With `include_all` set the included set is ignored; otherwise membership
/// is the only criterion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeFilter {
	/// Selected types; ignored while `include_all` is set.
	pub included: BTreeSet<String>,
	/// Let every type through.
	pub include_all: bool,
}

impl TypeFilter {
	fn show_everything(known: BTreeSet<String>) -> Self {
		Self {
			included: known,
			include_all: true,
		}
	}

	/// Whether elements tagged `type_tag` pass.
	pub fn passes(&self, type_tag: &str) -> bool {
		self.include_all || self.included.contains(type_tag)
	}
}

/// Filters for both axes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	/// Node-type filter.
	pub nodes: TypeFilter,
	/// Relationship-type filter.
	pub edges: TypeFilter,
}

impl FilterState {
	/// "Show everything", with each included set pre-filled with every type
	/// observed in `graph`.
	pub fn seeded(graph: &AttributedGraph) -> Self {
		Self {
			nodes: TypeFilter::show_everything(graph.node_types()),
			edges: TypeFilter::show_everything(graph.relationship_types()),
		}
	}

	/// Filter for one axis.
	pub fn axis(&self, axis: FilterAxis) -> &TypeFilter {
		match axis {
			FilterAxis::Nodes => &self.nodes,
			FilterAxis::Edges => &self.edges,
		}
	}

	fn axis_mut(&mut self, axis: FilterAxis) -> &mut TypeFilter {
		match axis {
			FilterAxis::Nodes => &mut self.nodes,
			FilterAxis::Edges => &mut self.edges,
		}
	}

	/// An explicit selection always leaves "show all" mode.
	pub fn set_included_types(&mut self, axis: FilterAxis, types: BTreeSet<String>) {
		let filter = self.axis_mut(axis);
		filter.included = types;
		filter.include_all = false;
	}

	/// Turning "show all" on resets the selection to every known type, so a
	/// later switch-off starts from everything rather than a stale subset.
	pub fn set_include_all(&mut self, axis: FilterAxis, include_all: bool, graph: &AttributedGraph) {
		let filter = self.axis_mut(axis);
		if include_all {
			filter.included = axis.known_types(graph);
		}
		filter.include_all = include_all;
	}

	/// The selection that results from flipping one type in the picker.
	pub fn toggled(&self, axis: FilterAxis, type_tag: &str, graph: &AttributedGraph) -> BTreeSet<String> {
		let filter = self.axis(axis);
		let mut types = if filter.include_all {
			axis.known_types(graph)
		} else {
			filter.included.clone()
		};
		if !types.remove(type_tag) {
			types.insert(type_tag.to_owned());
		}
		types
	}

	/// Whether `node` passes the node-type filter.
	pub fn passes_node(&self, node: &Node) -> bool {
		self.nodes.passes(&node.node_type)
	}

	/// Whether `edge` passes the relationship-type filter.
	pub fn passes_edge(&self, edge: &Edge) -> bool {
		self.edges.passes(&edge.relationship_type)
	}
}
