use serde::{Deserialize, Serialize};

/// One participant as supplied by the connections service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
	pub id: String,
	pub display_name: String,
	#[serde(default)]
	pub is_self: bool,
	#[serde(default)]
	pub is_active: bool,
	/// Elapsed hours of the current activity.
	#[serde(default)]
	pub activity_magnitude: f64,
	#[serde(default)]
	pub is_privileged: bool,
}

impl NodeSnapshot {
	pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
			is_self: false,
			is_active: false,
			activity_magnitude: 0.0,
			is_privileged: false,
		}
	}

	pub fn me(id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			is_self: true,
			..Self::new(id, display_name)
		}
	}

	pub fn active(mut self, hours: f64) -> Self {
		self.is_active = true;
		self.activity_magnitude = hours;
		self
	}

	pub fn privileged(mut self) -> Self {
		self.is_privileged = true;
		self
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSnapshot {
	pub source_id: String,
	pub target_id: String,
}

impl EdgeSnapshot {
	pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
	pub nodes: Vec<NodeSnapshot>,
	pub edges: Vec<EdgeSnapshot>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	#[default]
	Dark,
	Light,
}

impl Theme {
	pub fn toggled(self) -> Self {
		match self {
			Theme::Dark => Theme::Light,
			Theme::Light => Theme::Dark,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_reads_host_json() {
		let json = r#"{
			"nodes": [
				{ "id": "you", "displayName": "Sam", "isSelf": true },
				{ "id": "a", "displayName": "Ana Lima", "isActive": true, "activityMagnitude": 13.5 }
			],
			"edges": [{ "sourceId": "you", "targetId": "a" }]
		}"#;
		let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
		assert_eq!(snapshot.nodes.len(), 2);
		assert!(snapshot.nodes[0].is_self);
		assert!(!snapshot.nodes[0].is_active);
		assert_eq!(snapshot.nodes[1].activity_magnitude, 13.5);
		assert!(!snapshot.nodes[1].is_privileged);
		assert_eq!(snapshot.edges[0], EdgeSnapshot::new("you", "a"));
	}

	#[test]
	fn theme_round_trips_lowercase() {
		assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
		assert_eq!(Theme::Dark.toggled(), Theme::Light);
	}
}
