use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;

use super::scale::{Point, Vector, Viewport};
use super::types::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};

/// A participant plus its physics state.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerNode {
	pub id: String,
	pub label: String,
	pub is_self: bool,
	pub is_active: bool,
	pub activity_magnitude: f64,
	pub is_privileged: bool,
	pub position: Point,
	pub velocity: Vector,
	phase: f64,
}

impl PeerNode {
	fn spawn(snapshot: &NodeSnapshot, position: Point, phase: f64) -> Self {
		Self {
			id: snapshot.id.clone(),
			label: snapshot.display_name.clone(),
			is_self: snapshot.is_self,
			is_active: snapshot.is_active,
			activity_magnitude: snapshot.activity_magnitude,
			is_privileged: snapshot.is_privileged,
			position,
			velocity: Vector::zero(),
			phase,
		}
	}

	/// Fixed oscillation offset in `[0, 2π)`.
	pub fn phase(&self) -> f64 {
		self.phase
	}

	fn refresh(&mut self, snapshot: &NodeSnapshot) {
		self.label.clone_from(&snapshot.display_name);
		self.is_active = snapshot.is_active;
		self.activity_magnitude = snapshot.activity_magnitude;
		self.is_privileged = snapshot.is_privileged;
	}
}

/// Deterministic splitmix64 stream of phases.
#[derive(Clone, Debug)]
pub struct PhaseSource {
	state: u64,
}

impl PhaseSource {
	pub fn new(seed: u64) -> Self {
		Self { state: seed }
	}

	pub fn next_phase(&mut self) -> f64 {
		self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
		let mut z = self.state;
		z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
		z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
		z ^= z >> 31;
		let phase = (z >> 11) as f64 / (1u64 << 53) as f64 * TAU;
		if phase < TAU { phase } else { 0.0 }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
	/// Every node was placed afresh.
	Reinitialized,
	/// Physics state survived; only descriptive fields changed.
	CarriedOver,
}

pub struct GraphModel {
	nodes: Vec<PeerNode>,
	edges: Vec<EdgeSnapshot>,
	phases: PhaseSource,
}

impl GraphModel {
	pub fn new(phase_seed: u64) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			phases: PhaseSource::new(phase_seed),
		}
	}

	pub fn nodes(&self) -> &[PeerNode] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [PeerNode] {
		&mut self.nodes
	}

	/// Edges as ingested, unresolved ones included.
	pub fn edges(&self) -> &[EdgeSnapshot] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&PeerNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Merges a snapshot into the current state.
	///
	/// A changed id set rebuilds the layout: the self node goes to the
	/// center and the rest are spaced evenly on a ring. An unchanged id set
	/// keeps position, velocity and phase by id.
	pub fn ingest(
		&mut self,
		snapshot: &GraphSnapshot,
		viewport: &Viewport,
		layout_radius_fraction: f64,
	) -> Reconciliation {
		self.edges.clone_from(&snapshot.edges);

		if self.same_ids(&snapshot.nodes) {
			let mut previous: HashMap<&str, &PeerNode> = HashMap::with_capacity(self.nodes.len());
			for node in &self.nodes {
				previous.entry(node.id.as_str()).or_insert(node);
			}
			let nodes = snapshot
				.nodes
				.iter()
				.filter_map(|incoming| {
					previous.get(incoming.id.as_str()).map(|&existing| {
						let mut node = existing.clone();
						node.refresh(incoming);
						node
					})
				})
				.collect();
			self.nodes = nodes;
			debug!("graph snapshot carried over ({} nodes)", self.nodes.len());
			return Reconciliation::CarriedOver;
		}

		let center = viewport.center();
		let radius = viewport.min_dimension() * layout_radius_fraction;
		let ring = snapshot.nodes.iter().filter(|n| !n.is_self).count().max(1) as f64;
		let mut slot = 0usize;
		let mut nodes = Vec::with_capacity(snapshot.nodes.len());
		for incoming in &snapshot.nodes {
			let position = if incoming.is_self {
				center
			} else {
				let angle = TAU * slot as f64 / ring - FRAC_PI_2;
				slot += 1;
				center + Vector::new(angle.cos(), angle.sin()) * radius
			};
			nodes.push(PeerNode::spawn(incoming, position, self.phases.next_phase()));
		}
		self.nodes = nodes;
		debug!("graph layout reinitialized ({} nodes)", self.nodes.len());
		Reconciliation::Reinitialized
	}

	fn same_ids(&self, incoming: &[NodeSnapshot]) -> bool {
		if incoming.len() != self.nodes.len() {
			return false;
		}
		let current: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		incoming.iter().all(|n| current.contains(n.id.as_str()))
	}
}

/// First index per id; later duplicates are shadowed.
pub fn index_by_id(nodes: &[PeerNode]) -> HashMap<&str, usize> {
	let mut index = HashMap::with_capacity(nodes.len());
	for (i, node) in nodes.iter().enumerate() {
		index.entry(node.id.as_str()).or_insert(i);
	}
	index
}

/// Resolves an edge to node indices, or `None` when either end is unknown.
pub fn resolve_edge(index: &HashMap<&str, usize>, edge: &EdgeSnapshot) -> Option<(usize, usize)> {
	Some((
		*index.get(edge.source_id.as_str())?,
		*index.get(edge.target_id.as_str())?,
	))
}
