use std::collections::HashMap;

use super::config::{Palette, Rgba};
use super::model::{PeerNode, resolve_edge};
use super::types::EdgeSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
	You,
	Active,
	/// Linked to the self node by an edge.
	Connected,
	Idle,
}

impl NodeStatus {
	pub fn classify(node: &PeerNode, connected: bool) -> Self {
		if node.is_self {
			NodeStatus::You
		} else if node.is_active {
			NodeStatus::Active
		} else if connected {
			NodeStatus::Connected
		} else {
			NodeStatus::Idle
		}
	}

	pub fn color(self, palette: &Palette) -> Rgba {
		match self {
			NodeStatus::You => palette.orb_self,
			NodeStatus::Active => palette.orb_active,
			NodeStatus::Connected => palette.orb_connected,
			NodeStatus::Idle => palette.orb_idle,
		}
	}
}

/// Per-node flag: does any resolvable edge join this node to a self node?
pub fn connected_to_self(
	nodes: &[PeerNode],
	edges: &[EdgeSnapshot],
	index: &HashMap<&str, usize>,
) -> Vec<bool> {
	let mut connected = vec![false; nodes.len()];
	for edge in edges {
		let Some((s, t)) = resolve_edge(index, edge) else {
			continue;
		};
		if nodes[s].is_self {
			connected[t] = true;
		}
		if nodes[t].is_self {
			connected[s] = true;
		}
	}
	connected
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphBucket {
	/// Inclusive lower bound, in hours.
	pub min: f64,
	pub symbol: &'static str,
	pub meaning: &'static str,
}

pub const GLYPH_BUCKETS: [GlyphBucket; 5] = [
	GlyphBucket {
		min: 4.0,
		symbol: "🌱",
		meaning: "Sugar dropping",
	},
	GlyphBucket {
		min: 8.0,
		symbol: "🔥",
		meaning: "Fat burning",
	},
	GlyphBucket {
		min: 12.0,
		symbol: "⚡",
		meaning: "Ketosis",
	},
	GlyphBucket {
		min: 16.0,
		symbol: "✨",
		meaning: "Autophagy",
	},
	GlyphBucket {
		min: 24.0,
		symbol: "💎",
		meaning: "Deep fast",
	},
];

/// Highest bucket whose threshold `magnitude` has reached.
pub fn glyph_for(magnitude: f64) -> Option<&'static GlyphBucket> {
	GLYPH_BUCKETS.iter().rev().find(|bucket| magnitude >= bucket.min)
}

/// Short text drawn inside the orb.
pub fn orb_text(node: &PeerNode) -> String {
	if node.is_self {
		return "You".to_owned();
	}
	let mut words = node.label.split_whitespace();
	match (words.next(), words.next()) {
		(Some(first), Some(second)) => first
			.chars()
			.take(1)
			.chain(second.chars().take(1))
			.flat_map(char::to_uppercase)
			.collect(),
		(Some(only), None) => only.chars().take(2).flat_map(char::to_uppercase).collect(),
		_ => "?".to_owned(),
	}
}

const PILL_MAX_CHARS: usize = 14;

pub fn pill_text(label: &str) -> String {
	let label = label.trim();
	if label.chars().count() <= PILL_MAX_CHARS {
		return label.to_owned();
	}
	let mut short: String = label.chars().take(PILL_MAX_CHARS - 1).collect();
	short.push('…');
	short
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::peer_graph::model::{GraphModel, index_by_id};
	use crate::components::peer_graph::model::tests::trio;
	use crate::components::peer_graph::scale::Viewport;
	use crate::components::peer_graph::types::NodeSnapshot;

	#[test]
	fn glyph_buckets_are_monotonic() {
		assert!(glyph_for(3.0).is_none());
		assert_eq!(glyph_for(5.0).unwrap().min, 4.0);
		assert_eq!(glyph_for(9.0).unwrap().min, 8.0);
		assert_eq!(glyph_for(12.0).unwrap().min, 12.0);
		assert_eq!(glyph_for(30.0).unwrap().min, 24.0);
		assert!(glyph_for(f64::NAN).is_none());
		let symbols: Vec<_> = GLYPH_BUCKETS.iter().map(|b| b.symbol).collect();
		for (i, s) in symbols.iter().enumerate() {
			assert!(!symbols[i + 1..].contains(s));
		}
	}

	#[test]
	fn orb_text_uses_initials() {
		let mut model = GraphModel::new(0);
		let mut snapshot = trio();
		snapshot.nodes.push(NodeSnapshot::new("c", "cleo"));
		snapshot.nodes.push(NodeSnapshot::new("d", "   "));
		model.ingest(&snapshot, &Viewport::new(300.0, 300.0), 0.28);
		let texts: Vec<String> = model.nodes().iter().map(orb_text).collect();
		assert_eq!(texts, ["You", "AL", "BC", "CL", "?"]);
	}

	#[test]
	fn long_names_are_truncated() {
		assert_eq!(pill_text("Ana Lima"), "Ana Lima");
		assert_eq!(pill_text("Maximilian Oberhauser"), "Maximilian Ob…");
		assert_eq!(pill_text("Maximilian Ob…").chars().count(), 14);
	}

	#[test]
	fn status_follows_activity_then_connection() {
		let mut model = GraphModel::new(0);
		let mut snapshot = trio();
		snapshot.nodes[1] = NodeSnapshot::new("a", "Ana").active(6.0);
		snapshot.nodes.push(NodeSnapshot::new("c", "Cy"));
		model.ingest(&snapshot, &Viewport::new(300.0, 300.0), 0.28);
		let index = index_by_id(model.nodes());
		let connected = connected_to_self(model.nodes(), model.edges(), &index);
		assert_eq!(connected, [false, true, true, false]);
		let statuses: Vec<_> = model
			.nodes()
			.iter()
			.zip(&connected)
			.map(|(n, &c)| NodeStatus::classify(n, c))
			.collect();
		assert_eq!(
			statuses,
			[
				NodeStatus::You,
				NodeStatus::Active,
				NodeStatus::Connected,
				NodeStatus::Idle
			]
		);
	}
}
