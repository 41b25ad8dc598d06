//! One integration step of the force layout.
//!
//! Pairwise repulsion is O(n²); the graphs drawn here are a few dozen nodes
//! at most.

use super::config::ForceParams;
use super::model::{PeerNode, index_by_id, resolve_edge};
use super::scale::{Vector, Viewport};
use super::types::EdgeSnapshot;

/// Repulsion magnitude `strength / d²`, with `d` floored at `min_distance`.
pub fn repulsion(strength: f64, distance: f64, min_distance: f64) -> f64 {
	let d = distance.max(min_distance);
	strength / (d * d)
}

/// Cosmetic velocity nudge; a pure function of the clock and the node's phase.
pub fn drift(forces: &ForceParams, time: f64, phase: f64) -> Vector {
	Vector::new(
		forces.drift * (time * forces.drift_frequency_x + phase).sin(),
		forces.drift * (time * forces.drift_frequency_y + phase).sin(),
	)
}

fn is_finite(node: &PeerNode) -> bool {
	node.position.x.is_finite()
		&& node.position.y.is_finite()
		&& node.velocity.x.is_finite()
		&& node.velocity.y.is_finite()
}

/// Advances every node except `dragged_id` by one frame.
pub fn step(
	nodes: &mut [PeerNode],
	edges: &[EdgeSnapshot],
	time: f64,
	dragged_id: Option<&str>,
	viewport: &Viewport,
	forces: &ForceParams,
) {
	let center = viewport.center();
	for node in nodes.iter_mut() {
		if !is_finite(node) {
			node.position = center;
			node.velocity = Vector::zero();
		}
	}

	let mut acc = vec![Vector::zero(); nodes.len()];
	let dragged = {
		let index = index_by_id(nodes);

		for i in 0..nodes.len() {
			for j in (i + 1)..nodes.len() {
				let delta = nodes[i].position - nodes[j].position;
				let distance = delta.length();
				let direction = if distance > f64::EPSILON {
					delta / distance
				} else {
					// Coincident: split along an axis derived from the two phases.
					let angle = nodes[i].phase() - nodes[j].phase();
					Vector::new(angle.cos(), angle.sin())
				};
				let push = direction * repulsion(forces.repulsion, distance, forces.min_distance);
				acc[i] = acc[i] + push;
				acc[j] = acc[j] - push;
			}
		}

		for edge in edges {
			let Some((s, t)) = resolve_edge(&index, edge) else {
				continue;
			};
			if s == t {
				continue;
			}
			let pull = (nodes[t].position - nodes[s].position) * forces.attraction;
			acc[s] = acc[s] + pull;
			acc[t] = acc[t] - pull;
		}

		dragged_id.and_then(|id| index.get(id).copied())
	};

	for (i, node) in nodes.iter_mut().enumerate() {
		if Some(i) == dragged {
			continue;
		}
		let gravity = (center - node.position) * forces.gravity;
		let force = acc[i] + gravity + drift(forces, time, node.phase());
		node.velocity = (node.velocity + force) * forces.damping;
		node.position = viewport.contain(node.position + node.velocity, forces.margin);
		if !is_finite(node) {
			node.position = center;
			node.velocity = Vector::zero();
		}
	}
}
