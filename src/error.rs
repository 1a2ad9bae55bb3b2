//! Errors raised while fetching and decoding graph data.

use thiserror::Error;

/// Failure while loading a graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The request could not be sent.
	#[error("request failed: {0}")]
	Request(String),
	/// Non-success HTTP status.
	#[error("graph service responded with HTTP {0}")]
	Status(u16),
	/// The body was not a graph payload.
	#[error("could not decode graph payload: {0}")]
	Decode(#[from] serde_json::Error),
	/// No fetch implementation on this target.
	#[error("graph service is not reachable from this target")]
	Unavailable,
}

/// Result alias for graph loading.
pub type Result<T> = std::result::Result<T, GraphError>;
