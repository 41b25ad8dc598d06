//! Pointer sessions: tap to activate a peer, drag to reposition it.

use log::trace;

use super::config::{GraphConfig, Interactions};
use super::model::PeerNode;
use super::scale::{Point, Vector};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerSession {
	#[default]
	Idle,
	/// Held on a node, still under the drag threshold.
	Pressed { node_id: String, start: Point },
	/// Holding a node at the latest pointer position.
	Dragging { node_id: String, pointer: Point },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
	Ignored,
	Pressed(String),
	DragStarted(String),
	Dragged,
	/// A drag ended; the node is back under physics.
	Released(String),
	/// A confirmed tap on a peer.
	Activated(String),
	Cancelled,
}

/// First node, in iteration order, whose center lies within `radius` of `at`.
pub fn hit_test(nodes: &[PeerNode], at: Point, radius: f64) -> Option<usize> {
	nodes
		.iter()
		.position(|node| (node.position - at).length() < radius)
}

pub struct InteractionController {
	session: PointerSession,
	hit_radius: f64,
	drag_threshold: f64,
	interactions: Interactions,
}

impl InteractionController {
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			session: PointerSession::Idle,
			hit_radius: config.hit_radius,
			drag_threshold: config.drag_threshold,
			interactions: config.interactions,
		}
	}

	pub fn session(&self) -> &PointerSession {
		&self.session
	}

	pub fn dragged_id(&self) -> Option<&str> {
		match &self.session {
			PointerSession::Dragging { node_id, .. } => Some(node_id.as_str()),
			_ => None,
		}
	}

	pub fn pointer_down(&mut self, nodes: &[PeerNode], at: Point) -> PointerOutcome {
		if self.session != PointerSession::Idle {
			return PointerOutcome::Ignored;
		}
		if !self.interactions.tap && !self.interactions.drag {
			return PointerOutcome::Ignored;
		}
		let Some(idx) = hit_test(nodes, at, self.hit_radius) else {
			return PointerOutcome::Ignored;
		};
		let node_id = nodes[idx].id.clone();
		self.session = PointerSession::Pressed {
			node_id: node_id.clone(),
			start: at,
		};
		PointerOutcome::Pressed(node_id)
	}

	pub fn pointer_move(&mut self, nodes: &mut [PeerNode], at: Point) -> PointerOutcome {
		match &mut self.session {
			PointerSession::Idle => PointerOutcome::Ignored,
			PointerSession::Pressed { node_id, start } => {
				let moved = at - *start;
				if moved.x.abs() < self.drag_threshold && moved.y.abs() < self.drag_threshold {
					return PointerOutcome::Ignored;
				}
				let node_id = std::mem::take(node_id);
				if !self.interactions.drag {
					trace!("press on {node_id} cancelled by movement");
					self.session = PointerSession::Idle;
					return PointerOutcome::Cancelled;
				}
				trace!("drag started on {node_id}");
				pin(nodes, &node_id, at);
				self.session = PointerSession::Dragging {
					node_id: node_id.clone(),
					pointer: at,
				};
				PointerOutcome::DragStarted(node_id)
			}
			PointerSession::Dragging { node_id, pointer } => {
				*pointer = at;
				pin(nodes, node_id, at);
				PointerOutcome::Dragged
			}
		}
	}

	pub fn pointer_up(&mut self, nodes: &[PeerNode]) -> PointerOutcome {
		match std::mem::take(&mut self.session) {
			PointerSession::Idle => PointerOutcome::Ignored,
			PointerSession::Dragging { node_id, .. } => {
				trace!("drag released on {node_id}");
				PointerOutcome::Released(node_id)
			}
			PointerSession::Pressed { node_id, .. } => {
				let is_peer = nodes.iter().any(|n| n.id == node_id && !n.is_self);
				if self.interactions.tap && is_peer {
					PointerOutcome::Activated(node_id)
				} else {
					PointerOutcome::Ignored
				}
			}
		}
	}

	/// Ends the session without activating anything.
	pub fn pointer_cancel(&mut self) -> PointerOutcome {
		match std::mem::take(&mut self.session) {
			PointerSession::Idle => PointerOutcome::Ignored,
			PointerSession::Dragging { node_id, .. } => PointerOutcome::Released(node_id),
			PointerSession::Pressed { .. } => PointerOutcome::Cancelled,
		}
	}

	/// Re-applies the held pointer position to the dragged node.
	pub fn pin_dragged(&self, nodes: &mut [PeerNode]) {
		if let PointerSession::Dragging { node_id, pointer } = &self.session {
			pin(nodes, node_id, *pointer);
		}
	}
}

fn pin(nodes: &mut [PeerNode], node_id: &str, at: Point) {
	if let Some(node) = nodes.iter_mut().find(|n| n.id == node_id) {
		node.position = at;
		node.velocity = Vector::zero();
	}
}
