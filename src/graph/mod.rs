//! Graph model, type filters, traversal and visibility.
//!
//! Nothing in here touches the DOM; the canvas component only reads from a
//! [`GraphSession`] and feeds [`GraphAction`]s back into it.

pub mod attributed;
pub mod filter;
pub mod palette;
pub mod payload;
pub mod property;
pub mod session;
pub mod traversal;
pub mod visibility;

pub use attributed::{AttributedGraph, Edge, EdgeId, Node, NodeId};
pub use filter::{FilterAxis, FilterState, TypeFilter};
pub use payload::{GraphData, GraphLink, GraphNode, GraphPayload};
pub use session::{GraphAction, GraphSession, LoadStatus, RequestToken};
pub use traversal::{Reachable, TraversalState, reachable_within};
pub use visibility::{EdgeRender, NodeRender, VisibilityResolver};
