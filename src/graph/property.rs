//! Typed property bags carried by nodes and edges.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved property key holding a node's type tag.
pub const NODE_TYPE_KEY: &str = "nodeType";

const MAX_STRING_DISPLAY: usize = 50;

/// A single property value, mirroring the JSON value space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	/// JSON `null`.
	Null,
	/// JSON boolean.
	Bool(bool),
	/// Any JSON number.
	Number(f64),
	/// JSON string.
	String(String),
	/// JSON array.
	List(Vec<PropertyValue>),
	/// Nested JSON object.
	Map(BTreeMap<String, PropertyValue>),
}

/// String-keyed property bag.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

impl PropertyValue {
	/// Borrow the value as a string slice, if it is one.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Human-facing rendering used by the node inspector.
	pub fn display(&self) -> String {
		match self {
			Self::Null => "N/A".into(),
			Self::Bool(true) => "Yes".into(),
			Self::Bool(false) => "No".into(),
			Self::Number(n) => format_number(*n),
			Self::String(s) if s.chars().count() > MAX_STRING_DISPLAY => {
				let head: String = s.chars().take(MAX_STRING_DISPLAY).collect();
				format!("{head}...")
			}
			Self::String(s) => s.clone(),
			Self::List(_) | Self::Map(_) => {
				serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
			}
		}
	}
}

impl fmt::Display for PropertyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Number(n) => f.write_str(&format_number(*n)),
			Self::String(s) => f.write_str(s),
			Self::List(items) => write!(f, "[{} items]", items.len()),
			Self::Map(map) => write!(f, "{{{} keys}}", map.len()),
		}
	}
}

impl From<&str> for PropertyValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for PropertyValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

fn format_number(n: f64) -> String {
	if n.fract() == 0.0 && n.abs() < 1e15 {
		format!("{}", n as i64)
	} else {
		n.to_string()
	}
}

/// Turn `date_of_birth` or `care-team` into `Date Of Birth` / `Care Team`.
pub fn humanize_key(key: &str) -> String {
	key.split(['_', '-'])
		.filter(|word| !word.is_empty())
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_mixed_json_values() {
		let map: PropertyMap = serde_json::from_str(
			r#"{"age": 42, "name": "Ada", "active": true, "notes": null, "codes": ["A1"], "vitals": {"hr": 71.5}}"#,
		)
		.unwrap();

		assert_eq!(map["age"], PropertyValue::Number(42.0));
		assert_eq!(map["name"].as_str(), Some("Ada"));
		assert_eq!(map["active"], PropertyValue::Bool(true));
		assert_eq!(map["notes"], PropertyValue::Null);
		assert!(matches!(map["codes"], PropertyValue::List(ref v) if v.len() == 1));
		assert!(matches!(map["vitals"], PropertyValue::Map(_)));
	}

	#[test]
	fn display_follows_inspector_rules() {
		assert_eq!(PropertyValue::Null.display(), "N/A");
		assert_eq!(PropertyValue::Bool(false).display(), "No");
		assert_eq!(PropertyValue::Number(7.0).display(), "7");
		assert_eq!(PropertyValue::Number(7.25).display(), "7.25");

		let long = PropertyValue::from("x".repeat(60));
		assert_eq!(long.display(), format!("{}...", "x".repeat(50)));
	}

	#[test]
	fn humanizes_snake_and_kebab_keys() {
		assert_eq!(humanize_key("date_of_birth"), "Date Of Birth");
		assert_eq!(humanize_key("care-team"), "Care Team");
		assert_eq!(humanize_key("mrn"), "Mrn");
	}
}
