//! Runtime configuration for the dashboard.

use std::num::NonZeroU32;

/// Where the graph service lives and how queries are issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Prefix for API paths; empty means same origin.
	pub api_base_url: String,
	/// Maximum results per query.
	pub query_limit: u32,
	/// Ask the service to mask patient identifiers.
	pub hipaa: bool,
	/// Hop budget new traversals start with.
	pub hop_count: NonZeroU32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: option_env!("CASE_GRAPH_API_URL")
				.unwrap_or_default()
				.trim_end_matches('/')
				.to_owned(),
			query_limit: 50,
			hipaa: false,
			hop_count: NonZeroU32::MIN,
		}
	}
}

impl AppConfig {
	/// Apply overrides from a URL query string such as `?hipaa=true&hops=2`.
	/// Unknown keys and malformed values are ignored.
	pub fn with_query_string(mut self, query: &str) -> Self {
		let pairs = query
			.trim_start_matches('?')
			.split('&')
			.filter_map(|pair| pair.split_once('='));
		for (key, value) in pairs {
			match key {
				"hipaa" => {
					if let Ok(flag) = value.parse() {
						self.hipaa = flag;
					}
				}
				"limit" => {
					if let Ok(limit) = value.parse() {
						self.query_limit = limit;
					}
				}
				"hops" => {
					if let Ok(hops) = value.parse() {
						self.hop_count = hops;
					}
				}
				_ => log::debug!("ignoring query parameter {key}"),
			}
		}
		self
	}

	/// Defaults plus overrides from the current page URL.
	pub fn from_location() -> Self {
		let search = web_sys::window()
			.and_then(|w| w.location().search().ok())
			.unwrap_or_default();
		Self::default().with_query_string(&search)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_string_overrides() {
		let config = AppConfig::default().with_query_string("?hipaa=true&limit=25&hops=2&theme=dark");
		assert!(config.hipaa);
		assert_eq!(config.query_limit, 25);
		assert_eq!(config.hop_count.get(), 2);
	}

	#[test]
	fn malformed_values_keep_defaults() {
		let config = AppConfig::default().with_query_string("hipaa=maybe&limit=-3&hops=0&junk");
		assert_eq!(config, AppConfig::default());
	}
}
