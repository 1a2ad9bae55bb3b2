//! Colors and base sizes keyed by node type and relationship type.

const NODE_COLORS: &[(&str, &str)] = &[
	("Patient", "#3b82f6"),
	("Clinician", "#10b981"),
	("Encounter", "#f59e0b"),
	("Symptom", "#ef4444"),
	("Disease", "#dc2626"),
	("Test", "#8b5cf6"),
	("TestResult", "#a855f7"),
	("Medication", "#06b6d4"),
	("Procedure", "#f97316"),
	("SourceDocument", "#9ca3af"),
	("Assertion", "#84cc16"),
	("Unknown", "#6b7280"),
];

const EDGE_COLORS: &[(&str, &str)] = &[
	("HAS_ENCOUNTER", "#3b82f6"),
	("HAS_SYMPTOM", "#ef4444"),
	("DIAGNOSED_WITH", "#dc2626"),
	("PRESCRIBED", "#06b6d4"),
	("PERFORMED", "#f97316"),
	("TESTED_FOR", "#8b5cf6"),
	("TREATED_BY", "#10b981"),
];

/// Fallback for node types the palette does not know.
pub const DEFAULT_NODE_COLOR: &str = "#6b7280";
/// Fallback for relationship types the palette does not know.
pub const DEFAULT_EDGE_COLOR: &str = "#64748b";

/// Border drawn around the traversal center.
pub const CENTER_BORDER: &str = "#facc15";
/// Border drawn around every other node revealed by a traversal.
pub const REVEALED_BORDER: &str = "#38bdf8";

/// Node type used when the source data carries none.
pub const UNKNOWN_NODE_TYPE: &str = "Unknown";
/// Relationship type used when the source data carries none.
pub const DEFAULT_RELATIONSHIP: &str = "default";

/// Fill color for a node type; unknown types get the default.
pub fn node_color(node_type: &str) -> &'static str {
	lookup(NODE_COLORS, node_type).unwrap_or(DEFAULT_NODE_COLOR)
}

/// Stroke color for a relationship type; unknown types get the default.
pub fn edge_color(relationship: &str) -> &'static str {
	lookup(EDGE_COLORS, relationship).unwrap_or(DEFAULT_EDGE_COLOR)
}

/// Base diameter for a node type.
pub fn node_size(node_type: &str) -> f64 {
	match node_type {
		"Patient" => 20.0,
		"Clinician" => 18.0,
		"SourceDocument" => 16.0,
		_ => 12.0,
	}
}

/// Radius of the ring a node type is laid out on.
pub fn layout_radius(node_type: &str) -> f64 {
	match node_type {
		"Patient" => 200.0,
		"Clinician" => 150.0,
		"Encounter" => 100.0,
		"Symptom" => 250.0,
		"Disease" => 300.0,
		"Test" => 180.0,
		"TestResult" => 120.0,
		"Medication" => 220.0,
		"Procedure" => 160.0,
		"SourceDocument" => 80.0,
		"Assertion" => 140.0,
		_ => 100.0,
	}
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
	table.iter().find(|(k, _)| *k == key).map(|(_, color)| *color)
}

/// An sRGB color parsed from `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	/// Parse `#rrggbb`.
	pub fn parse(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#')?;
		if hex.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
		Some(Self(channel(0)?, channel(2)?, channel(4)?))
	}

	/// Move each channel `amount` (0..=1) of the way toward white.
	pub fn brighten(self, amount: f64) -> Self {
		let amount = amount.clamp(0.0, 1.0);
		let lift = |c: u8| (c as f64 + (255.0 - c as f64) * amount).round() as u8;
		Self(lift(self.0), lift(self.1), lift(self.2))
	}

	/// CSS `rgba(...)` string with `alpha`.
	pub fn rgba(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
	}
}

/// Parse a palette color, falling back to the default edge color on junk.
pub fn rgb_or_default(hex: &str) -> Rgb {
	Rgb::parse(hex)
		.or_else(|| Rgb::parse(DEFAULT_EDGE_COLOR))
		.unwrap_or(Rgb(100, 116, 139))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_types_fall_back() {
		assert_eq!(node_color("Patient"), "#3b82f6");
		assert_eq!(node_color("Spaceship"), DEFAULT_NODE_COLOR);
		assert_eq!(edge_color("PRESCRIBED"), "#06b6d4");
		assert_eq!(edge_color("LIKES"), DEFAULT_EDGE_COLOR);
		assert_eq!(node_size("Clinician"), 18.0);
		assert_eq!(node_size("Symptom"), 12.0);
	}

	#[test]
	fn parses_and_brightens() {
		let c = Rgb::parse("#3b82f6").unwrap();
		assert_eq!(c, Rgb(0x3b, 0x82, 0xf6));
		assert_eq!(c.brighten(1.0), Rgb(255, 255, 255));
		assert_eq!(c.brighten(0.0), c);
		assert!(Rgb::parse("3b82f6").is_none());
		assert!(Rgb::parse("#3b82").is_none());
		assert_eq!(Rgb(1, 2, 3).rgba(0.5), "rgba(1, 2, 3, 0.5)");
	}
}
