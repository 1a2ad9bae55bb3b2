//! Wire types returned by the knowledge-graph query service.

use serde::Deserialize;

use super::palette::{DEFAULT_RELATIONSHIP, UNKNOWN_NODE_TYPE};
use super::property::PropertyMap;

/// A node as the query service sends it. `label` carries the node type.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphNode {
	/// Node id.
	pub id: String,
	/// Node type.
	#[serde(default)]
	pub label: Option<String>,
	/// Free-form properties.
	#[serde(default)]
	pub properties: PropertyMap,
	/// Human readable label.
	#[serde(default)]
	pub display_name: Option<String>,
}

/// A directed relationship as the query service sends it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphLink {
	/// Edge id; synthesised when absent.
	#[serde(default)]
	pub id: Option<String>,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship type.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Free-form properties.
	#[serde(default)]
	pub properties: PropertyMap,
}

/// One query result: the node and edge lists the graph is built from.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes of the result.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Edges of the result.
	#[serde(default)]
	pub edges: Vec<GraphLink>,
}

/// Node shape emitted by the document ingestion pipeline.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentNode {
	/// Node id.
	pub id: String,
	/// Node type.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Free-form properties; may carry a display name.
	#[serde(default)]
	pub properties: PropertyMap,
}

/// Graph shape emitted by the document ingestion pipeline.
#[derive(Clone, Debug, Deserialize)]
pub struct DocumentGraphData {
	/// Nodes of the document graph.
	pub nodes: Vec<DocumentNode>,
	/// Relationships of the document graph.
	pub relationships: Vec<GraphLink>,
}

/// Either response shape; both end up as [`GraphData`].
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphPayload {
	/// `{nodes, relationships}` from document ingestion.
	Document(DocumentGraphData),
	/// `{nodes, edges}` from the query service.
	Query(GraphData),
}

impl GraphPayload {
	/// Decode either payload shape.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Normalise to [`GraphData`].
	pub fn into_graph_data(self) -> GraphData {
		match self {
			Self::Query(data) => data,
			Self::Document(doc) => doc.into(),
		}
	}
}

impl From<DocumentGraphData> for GraphData {
	fn from(doc: DocumentGraphData) -> Self {
		let nodes = doc
			.nodes
			.into_iter()
			.map(|node| {
				let display_name = ["name", "display_name", "label"]
					.iter()
					.find_map(|key| node.properties.get(*key).and_then(|v| v.as_str()))
					.map(str::to_owned);
				GraphNode {
					id: node.id,
					label: node.kind,
					properties: node.properties,
					display_name,
				}
			})
			.collect();
		Self {
			nodes,
			edges: doc.relationships,
		}
	}
}

impl GraphNode {
	/// Type tag, `Unknown` when absent or blank.
	pub fn node_type(&self) -> &str {
		non_blank(self.label.as_deref()).unwrap_or(UNKNOWN_NODE_TYPE)
	}

	/// Display label, falling back to the id.
	pub fn display_label(&self) -> &str {
		non_blank(self.display_name.as_deref()).unwrap_or(&self.id)
	}
}

impl GraphLink {
	/// Relationship type, `default` when absent or blank.
	pub fn relationship_type(&self) -> &str {
		non_blank(self.kind.as_deref()).unwrap_or(DEFAULT_RELATIONSHIP)
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|s| !s.trim().is_empty())
}
