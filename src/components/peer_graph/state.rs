use log::{debug, info};

use super::config::GraphConfig;
use super::interaction::{InteractionController, PointerOutcome, PointerSession, hit_test};
use super::model::{GraphModel, PeerNode, Reconciliation};
use super::render::{self, DrawCommand, Scene};
use super::scale::{Point, Viewport};
use super::simulation;
use super::types::{GraphSnapshot, Theme};

/// Everything one mounted visualizer owns: the model, the pointer session,
/// the viewport, the theme and the animation clock.
pub struct PeerGraphState {
	config: GraphConfig,
	model: GraphModel,
	interaction: InteractionController,
	viewport: Viewport,
	theme: Theme,
	time: f64,
	hovered: Option<String>,
}

impl PeerGraphState {
	pub fn new(config: GraphConfig, snapshot: &GraphSnapshot, viewport: Viewport, theme: Theme) -> Self {
		let mut model = GraphModel::new(config.phase_seed);
		model.ingest(snapshot, &viewport, config.layout_radius_fraction);
		Self {
			interaction: InteractionController::new(&config),
			config,
			model,
			viewport,
			theme,
			time: 0.0,
			hovered: None,
		}
	}

	pub fn ingest(&mut self, snapshot: &GraphSnapshot) -> Reconciliation {
		let outcome = self
			.model
			.ingest(snapshot, &self.viewport, self.config.layout_radius_fraction);
		if let Some(id) = &self.hovered {
			if self.model.node(id).is_none() {
				self.hovered = None;
			}
		}
		outcome
	}

	pub fn set_theme(&mut self, theme: Theme) {
		self.theme = theme;
	}

	/// New bounds take effect on the next step.
	pub fn resize(&mut self, viewport: Viewport) {
		if viewport != self.viewport {
			debug!("graph viewport resized to {}x{}", viewport.width, viewport.height);
		}
		self.viewport = viewport;
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn nodes(&self) -> &[PeerNode] {
		self.model.nodes()
	}

	pub fn node(&self, id: &str) -> Option<&PeerNode> {
		self.model.node(id)
	}

	pub fn session(&self) -> &PointerSession {
		self.interaction.session()
	}

	pub fn hovered_id(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// Advances the clock by one configured time step and runs the simulation.
	pub fn tick(&mut self) {
		self.advance(self.config.time_step);
	}

	pub fn advance(&mut self, dt: f64) {
		self.time += dt;
		self.interaction.pin_dragged(self.model.nodes_mut());
		let edges = self.model.edges().to_vec();
		simulation::step(
			self.model.nodes_mut(),
			&edges,
			self.time,
			self.interaction.dragged_id(),
			&self.viewport,
			&self.config.forces,
		);
	}

	pub fn frame(&self) -> Vec<DrawCommand> {
		render::render(&Scene {
			nodes: self.model.nodes(),
			edges: self.model.edges(),
			time: self.time,
			theme: self.theme,
			viewport: self.viewport,
			config: &self.config,
			dragged_id: self.interaction.dragged_id(),
			hovered_id: self.hovered_id(),
		})
	}

	pub fn pointer_down(&mut self, at: Point) -> PointerOutcome {
		self.interaction.pointer_down(self.model.nodes(), at)
	}

	pub fn pointer_move(&mut self, at: Point) -> PointerOutcome {
		let outcome = self.interaction.pointer_move(self.model.nodes_mut(), at);
		if self.config.interactions.hover && *self.interaction.session() == PointerSession::Idle {
			let nodes = self.model.nodes();
			self.hovered = hit_test(nodes, at, self.config.hit_radius).map(|i| nodes[i].id.clone());
		}
		outcome
	}

	/// Ends the pointer session; returns the id of a tapped peer.
	pub fn pointer_up(&mut self) -> Option<String> {
		match self.interaction.pointer_up(self.model.nodes()) {
			PointerOutcome::Activated(id) => {
				info!("peer {id} activated");
				Some(id)
			}
			_ => None,
		}
	}

	/// Pointer left the canvas or the touch was cancelled.
	pub fn pointer_leave(&mut self) {
		self.interaction.pointer_cancel();
		self.hovered = None;
	}

	pub fn cursor(&self) -> &'static str {
		match self.interaction.session() {
			PointerSession::Dragging { .. } => "grabbing",
			_ if self.hovered.is_some() => "pointer",
			_ => "default",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::peer_graph::model::tests::trio;
	use crate::components::peer_graph::scale::Vector;
	use crate::components::peer_graph::types::NodeSnapshot;

	fn state(config: GraphConfig) -> PeerGraphState {
		PeerGraphState::new(config, &trio(), Viewport::new(600.0, 600.0), Theme::Dark)
	}

	fn distance(state: &PeerGraphState, a: &str, b: &str) -> f64 {
		(state.node(a).unwrap().position - state.node(b).unwrap().position).length()
	}

	#[test]
	fn symmetric_trio_settles_symmetrically_inside_bounds() {
		let mut state = state(GraphConfig::widget());
		for _ in 0..500 {
			state.tick();
		}
		let (da, db) = (distance(&state, "you", "a"), distance(&state, "you", "b"));
		assert!(da > 0.0 && db > 0.0);
		assert!((da - db).abs() <= 0.15 * da.max(db), "you-a {da} vs you-b {db}");

		let margin = GraphConfig::widget().forces.margin;
		for node in state.nodes() {
			assert!(node.position.x >= margin && node.position.x <= 600.0 - margin);
			assert!(node.position.y >= margin && node.position.y <= 600.0 - margin);
		}
	}

	#[test]
	fn drag_holds_node_exactly_under_pointer_every_frame() {
		let mut state = state(GraphConfig::admin());
		let a = state.node("a").unwrap().position;
		state.pointer_down(a);
		let mut pointer = a;
		let mut latest = None;
		for frame in 0..60 {
			pointer = pointer + Vector::new(1.5, 2.0);
			if frame % 3 == 0 {
				state.pointer_move(pointer);
				if state.session() != &PointerSession::Idle && frame >= 3 {
					latest = Some(pointer);
				}
			}
			state.tick();
			if let Some(latest) = latest {
				let node = state.node("a").unwrap();
				assert_eq!(node.position, latest);
				assert_eq!(node.velocity, Vector::zero());
			}
		}
		assert!(latest.is_some());
		assert_eq!(state.cursor(), "grabbing");
		assert_eq!(state.pointer_up(), None);
		assert_eq!(state.cursor(), "default");
	}

	#[test]
	fn tap_reports_peer_once() {
		let mut state = state(GraphConfig::widget());
		let b = state.node("b").unwrap().position;
		state.pointer_down(b);
		state.pointer_move(b + Vector::new(3.0, 3.0));
		assert_eq!(state.pointer_up(), Some("b".to_owned()));
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn drag_survives_snapshot_refresh() {
		let mut state = state(GraphConfig::admin());
		let a = state.node("a").unwrap().position;
		state.pointer_down(a);
		let held = Point::new(90.0, 90.0);
		state.pointer_move(held);

		let mut grown = trio();
		grown.nodes.push(NodeSnapshot::new("c", "Cy"));
		assert_eq!(state.ingest(&grown), Reconciliation::Reinitialized);
		state.tick();
		assert_eq!(state.node("a").unwrap().position, held);
	}

	#[test]
	fn hover_tracks_idle_pointer_and_clears_on_leave() {
		let mut state = state(GraphConfig::widget());
		let a = state.node("a").unwrap().position;
		state.pointer_move(a + Vector::new(5.0, 0.0));
		assert_eq!(state.hovered_id(), Some("a"));
		assert_eq!(state.cursor(), "pointer");
		state.pointer_move(Point::new(1.0, 1.0));
		assert_eq!(state.hovered_id(), None);

		state.pointer_move(a);
		state.pointer_leave();
		assert_eq!(state.hovered_id(), None);
		assert_eq!(state.cursor(), "default");
	}

	#[test]
	fn hover_disabled_never_tracks() {
		let mut state = state(GraphConfig::widget().with_hover(false));
		let a = state.node("a").unwrap().position;
		state.pointer_move(a);
		assert_eq!(state.hovered_id(), None);
	}

	#[test]
	fn resize_pulls_nodes_into_new_bounds() {
		let mut state = state(GraphConfig::widget());
		state.resize(Viewport::new(200.0, 150.0));
		state.tick();
		let margin = GraphConfig::widget().forces.margin;
		for node in state.nodes() {
			assert!(node.position.x <= 200.0 - margin);
			assert!(node.position.y <= 150.0 - margin);
		}
	}

	#[test]
	fn theme_switch_changes_frame_not_physics() {
		let mut state = state(GraphConfig::widget());
		state.tick();
		let before: Vec<_> = state.nodes().to_vec();
		let dark = state.frame();
		state.set_theme(Theme::Light);
		assert_ne!(dark, state.frame());
		assert_eq!(state.nodes(), &before[..]);
		state.set_theme(Theme::Dark);
		assert_eq!(dark, state.frame());
	}

	#[test]
	fn refresh_with_same_ids_keeps_motion_continuous() {
		let mut state = state(GraphConfig::widget());
		for _ in 0..20 {
			state.tick();
		}
		let before: Vec<_> = state.nodes().to_vec();
		let mut refreshed = trio();
		refreshed.nodes[1] = NodeSnapshot::new("a", "Ana Lima").active(13.0);
		assert_eq!(state.ingest(&refreshed), Reconciliation::CarriedOver);
		for old in &before {
			let new = state.node(&old.id).unwrap();
			assert_eq!((new.position, new.velocity, new.phase()), (old.position, old.velocity, old.phase()));
		}
		assert!(state.node("a").unwrap().is_active);
	}
}
