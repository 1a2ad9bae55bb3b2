//! Leptos components making up the case-review graph view.

pub mod force_graph;
pub mod graph_filters;
pub mod node_inspector;
pub mod status_bar;
