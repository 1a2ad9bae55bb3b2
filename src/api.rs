//! Client for the knowledge-graph query service.
//!
//! Uses web-sys fetch on wasm32. Other targets have no browser to fetch
//! through and report [`GraphError::Unavailable`].

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{GraphError, Result};
use crate::graph::{GraphData, GraphPayload};

#[derive(Serialize)]
struct QueryRequest<'a> {
	query: &'a str,
	limit: u32,
	hipaa: bool,
}

/// Fetches graphs from the query service.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
	limit: u32,
	hipaa: bool,
}

impl ApiClient {
	/// Client for the configured service.
	pub fn new(config: &AppConfig) -> Self {
		Self {
			base_url: config.api_base_url.clone(),
			limit: config.query_limit,
			hipaa: config.hipaa,
		}
	}

	/// Endpoint for natural-language queries.
	pub fn query_graph_url(&self) -> String {
		format!("{}/api/search/query-graph?hipaa={}", self.base_url, self.hipaa)
	}

	/// Endpoint for the whole graph.
	pub fn full_graph_url(&self) -> String {
		format!("{}/api/graph/full", self.base_url)
	}

	fn query_body(&self, query: &str) -> Result<String> {
		Ok(serde_json::to_string(&QueryRequest {
			query,
			limit: self.limit,
			hipaa: self.hipaa,
		})?)
	}

	/// Turn a natural-language question into a subgraph.
	pub async fn query_graph(&self, query: &str) -> Result<GraphData> {
		let body = self.query_body(query)?;
		let text = self.fetch_text("POST", &self.query_graph_url(), Some(body)).await?;
		decode(&text)
	}

	/// The whole graph, shown before any search is made.
	pub async fn full_graph(&self) -> Result<GraphData> {
		let text = self.fetch_text("GET", &self.full_graph_url(), None).await?;
		decode(&text)
	}

	#[cfg(target_arch = "wasm32")]
	async fn fetch_text(&self, method: &str, url: &str, body: Option<String>) -> Result<String> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let opts = RequestInit::new();
		opts.set_method(method);
		opts.set_mode(RequestMode::Cors);
		if let Some(body) = &body {
			opts.set_body(&JsValue::from_str(body));
		}

		let request = Request::new_with_str_and_init(url, &opts)
			.map_err(|e| GraphError::Request(format!("{e:?}")))?;
		let headers = request.headers();
		headers
			.set("accept", "application/json")
			.map_err(|e| GraphError::Request(format!("{e:?}")))?;
		if body.is_some() {
			headers
				.set("Content-Type", "application/json")
				.map_err(|e| GraphError::Request(format!("{e:?}")))?;
		}

		let window = web_sys::window().ok_or(GraphError::Unavailable)?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| GraphError::Request(format!("{e:?}")))?
			.dyn_into()
			.map_err(|_| GraphError::Request("fetch did not yield a Response".into()))?;

		if !response.ok() {
			return Err(GraphError::Status(response.status()));
		}

		let text = response
			.text()
			.map_err(|e| GraphError::Request(format!("{e:?}")))?;
		JsFuture::from(text)
			.await
			.map_err(|e| GraphError::Request(format!("{e:?}")))?
			.as_string()
			.ok_or_else(|| GraphError::Request("response body is not text".into()))
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn fetch_text(&self, _method: &str, _url: &str, _body: Option<String>) -> Result<String> {
		Err(GraphError::Unavailable)
	}
}

fn decode(text: &str) -> Result<GraphData> {
	Ok(GraphPayload::from_json(text)?.into_graph_data())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn client(base: &str, hipaa: bool) -> ApiClient {
		ApiClient::new(&AppConfig {
			api_base_url: base.into(),
			hipaa,
			..AppConfig::default()
		})
	}

	#[test]
	fn builds_service_urls() {
		let c = client("https://graph.example", true);
		assert_eq!(c.query_graph_url(), "https://graph.example/api/search/query-graph?hipaa=true");
		assert_eq!(c.full_graph_url(), "https://graph.example/api/graph/full");
		assert_eq!(client("", false).full_graph_url(), "/api/graph/full");
	}

	#[test]
	fn query_body_carries_limit_and_hipaa() {
		let body = client("", true).query_body("patients with \"sepsis\"").unwrap();
		let value: serde_json::Value = serde_json::from_str(&body).unwrap();
		assert_eq!(value["query"], "patients with \"sepsis\"");
		assert_eq!(value["limit"], 50);
		assert_eq!(value["hipaa"], true);
	}

	#[test]
	fn decode_errors_surface_as_decode() {
		assert!(matches!(decode("not json"), Err(GraphError::Decode(_))));
		assert_eq!(decode(r#"{"nodes": [{"id": "a"}]}"#).unwrap().nodes.len(), 1);
	}
}
