//! Visualizer configuration.
//!
//! The dashboard widget and the admin console run the same engine; everything
//! that differs between them (force constants, palette, enabled interactions,
//! decorations) lives in [`GraphConfig`].

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::types::Theme;

/// Straight-alpha sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self {
			a: a.clamp(0.0, 1.0),
			..self
		}
	}

	/// Mixes toward white by `amount` in `[0, 1]`.
	pub fn lighten(self, amount: f64) -> Self {
		let t = amount.clamp(0.0, 1.0);
		let mix = |c: u8| (c as f64 + (255.0 - c as f64) * t).round() as u8;
		Self {
			r: mix(self.r),
			g: mix(self.g),
			b: mix(self.b),
			a: self.a,
		}
	}

	pub fn css(&self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceParams {
	/// `k_r` in `k_r / d²`.
	pub repulsion: f64,
	/// `k_a` in `d * k_a`.
	pub attraction: f64,
	pub gravity: f64,
	pub damping: f64,
	/// Peak velocity nudge of the ambient drift.
	pub drift: f64,
	pub drift_frequency_x: f64,
	pub drift_frequency_y: f64,
	pub margin: f64,
	pub min_distance: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			repulsion: 3000.0,
			attraction: 0.004,
			gravity: 0.002,
			damping: 0.92,
			drift: 0.012,
			drift_frequency_x: 0.7,
			drift_frequency_y: 0.45,
			margin: 36.0,
			min_distance: 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
	Radial,
	Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactions {
	pub drag: bool,
	pub tap: bool,
	pub hover: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
	pub background_inner: Rgba,
	pub background_outer: Rgba,
	pub ambient_dot: Rgba,
	pub edge_active: Rgba,
	pub edge_idle: Rgba,
	pub particle: Rgba,
	pub orb_self: Rgba,
	pub orb_active: Rgba,
	pub orb_connected: Rgba,
	pub orb_idle: Rgba,
	pub aura: Rgba,
	pub border: Rgba,
	pub border_privileged: Rgba,
	pub highlight: Rgba,
	pub hover_ring: Rgba,
	pub label_text: Rgba,
	pub pill_background: Rgba,
	pub pill_text: Rgba,
	pub legend_background: Rgba,
	pub legend_text: Rgba,
}

impl Palette {
	pub fn widget_dark() -> Self {
		Self {
			background_inner: Rgba::rgb(30, 27, 75),
			background_outer: Rgba::rgb(10, 10, 26),
			ambient_dot: Rgba::rgba(199, 210, 254, 0.35),
			edge_active: Rgba::rgb(52, 211, 153),
			edge_idle: Rgba::rgba(148, 163, 184, 0.55),
			particle: Rgba::rgb(167, 243, 208),
			orb_self: Rgba::rgb(139, 92, 246),
			orb_active: Rgba::rgb(16, 185, 129),
			orb_connected: Rgba::rgb(59, 130, 246),
			orb_idle: Rgba::rgb(100, 116, 139),
			aura: Rgba::rgb(52, 211, 153),
			border: Rgba::rgba(255, 255, 255, 0.35),
			border_privileged: Rgba::rgb(251, 191, 36),
			highlight: Rgba::rgba(255, 255, 255, 0.55),
			hover_ring: Rgba::rgba(255, 255, 255, 0.8),
			label_text: Rgba::rgb(255, 255, 255),
			pill_background: Rgba::rgba(15, 23, 42, 0.75),
			pill_text: Rgba::rgb(226, 232, 240),
			legend_background: Rgba::rgba(15, 23, 42, 0.6),
			legend_text: Rgba::rgb(203, 213, 225),
		}
	}

	pub fn widget_light() -> Self {
		Self {
			background_inner: Rgba::rgb(255, 255, 255),
			background_outer: Rgba::rgb(224, 231, 255),
			ambient_dot: Rgba::rgba(99, 102, 241, 0.25),
			edge_active: Rgba::rgb(5, 150, 105),
			edge_idle: Rgba::rgba(100, 116, 139, 0.5),
			particle: Rgba::rgb(16, 185, 129),
			orb_self: Rgba::rgb(124, 58, 237),
			orb_active: Rgba::rgb(5, 150, 105),
			orb_connected: Rgba::rgb(37, 99, 235),
			orb_idle: Rgba::rgb(148, 163, 184),
			aura: Rgba::rgb(16, 185, 129),
			border: Rgba::rgba(15, 23, 42, 0.2),
			border_privileged: Rgba::rgb(217, 119, 6),
			highlight: Rgba::rgba(255, 255, 255, 0.7),
			hover_ring: Rgba::rgba(15, 23, 42, 0.6),
			label_text: Rgba::rgb(255, 255, 255),
			pill_background: Rgba::rgba(255, 255, 255, 0.85),
			pill_text: Rgba::rgb(30, 41, 59),
			legend_background: Rgba::rgba(255, 255, 255, 0.8),
			legend_text: Rgba::rgb(51, 65, 85),
		}
	}

	pub fn admin_dark() -> Self {
		Self {
			background_inner: Rgba::rgb(17, 24, 39),
			background_outer: Rgba::rgb(3, 7, 18),
			edge_active: Rgba::rgb(34, 197, 94),
			orb_active: Rgba::rgb(34, 197, 94),
			aura: Rgba::rgb(74, 222, 128),
			particle: Rgba::rgb(187, 247, 208),
			..Self::widget_dark()
		}
	}

	pub fn admin_light() -> Self {
		Self {
			background_inner: Rgba::rgb(248, 250, 252),
			background_outer: Rgba::rgb(226, 232, 240),
			edge_active: Rgba::rgb(22, 163, 74),
			orb_active: Rgba::rgb(22, 163, 74),
			aura: Rgba::rgb(34, 197, 94),
			particle: Rgba::rgb(22, 163, 74),
			..Self::widget_light()
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub forces: ForceParams,
	pub node_radius: f64,
	pub self_radius: f64,
	pub hit_radius: f64,
	/// Per-axis pointer displacement that turns a press into a drag.
	pub drag_threshold: f64,
	/// Ring radius on (re)initialisation, as a fraction of `min(width, height)`.
	pub layout_radius_fraction: f64,
	pub background: BackgroundStyle,
	pub ambient_dots: usize,
	pub particles_per_edge: u8,
	pub show_glyphs: bool,
	pub show_legend: bool,
	pub interactions: Interactions,
	pub dark: Palette,
	pub light: Palette,
	pub phase_seed: u64,
	/// Seconds added to the clock every frame.
	pub time_step: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self::widget()
	}
}

impl GraphConfig {
	/// Compact dashboard preset: tap to open a peer, no repositioning.
	pub fn widget() -> Self {
		Self {
			forces: ForceParams::default(),
			node_radius: 18.0,
			self_radius: 24.0,
			hit_radius: 22.0,
			drag_threshold: 8.0,
			layout_radius_fraction: 0.28,
			background: BackgroundStyle::Radial,
			ambient_dots: 28,
			particles_per_edge: 1,
			show_glyphs: true,
			show_legend: true,
			interactions: Interactions {
				drag: false,
				tap: true,
				hover: true,
			},
			dark: Palette::widget_dark(),
			light: Palette::widget_light(),
			phase_seed: 0x5eed,
			time_step: 1.0 / 60.0,
		}
	}

	/// Admin console preset: draggable nodes and a fuller legend.
	pub fn admin() -> Self {
		Self {
			node_radius: 20.0,
			self_radius: 26.0,
			background: BackgroundStyle::Linear,
			ambient_dots: 0,
			particles_per_edge: 2,
			interactions: Interactions {
				drag: true,
				tap: true,
				hover: true,
			},
			dark: Palette::admin_dark(),
			light: Palette::admin_light(),
			..Self::widget()
		}
	}

	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
		let f = &self.forces;
		if !(f.damping > 0.0 && f.damping < 1.0) {
			return invalid("forces.damping", "must be in (0, 1)");
		}
		if !(f.margin >= 0.0) {
			return invalid("forces.margin", "must be non-negative");
		}
		if !(f.min_distance > 0.0) {
			return invalid("forces.min_distance", "must be positive");
		}
		if ![f.repulsion, f.attraction, f.gravity, f.drift].iter().all(|v| v.is_finite()) {
			return invalid("forces", "constants must be finite");
		}
		if !(1..=2).contains(&self.particles_per_edge) {
			return invalid("particles_per_edge", "must be 1 or 2");
		}
		if !(self.hit_radius > 0.0) {
			return invalid("hit_radius", "must be positive");
		}
		if !(self.drag_threshold > 0.0) {
			return invalid("drag_threshold", "must be positive");
		}
		if !(self.time_step > 0.0) {
			return invalid("time_step", "must be positive");
		}
		if !(self.layout_radius_fraction > 0.0 && self.layout_radius_fraction <= 0.5) {
			return invalid("layout_radius_fraction", "must be in (0, 0.5]");
		}
		Ok(())
	}

	pub fn palette(&self, theme: Theme) -> &Palette {
		match theme {
			Theme::Dark => &self.dark,
			Theme::Light => &self.light,
		}
	}

	pub fn with_forces(mut self, forces: ForceParams) -> Self {
		self.forces = forces;
		self
	}

	pub fn with_drag(mut self, enabled: bool) -> Self {
		self.interactions.drag = enabled;
		self
	}

	pub fn with_tap(mut self, enabled: bool) -> Self {
		self.interactions.tap = enabled;
		self
	}

	pub fn with_hover(mut self, enabled: bool) -> Self {
		self.interactions.hover = enabled;
		self
	}

	pub fn with_particles_per_edge(mut self, count: u8) -> Self {
		self.particles_per_edge = count.clamp(1, 2);
		self
	}

	pub fn with_phase_seed(mut self, seed: u64) -> Self {
		self.phase_seed = seed;
		self
	}

	pub fn with_legend(mut self, show: bool) -> Self {
		self.show_legend = show;
		self
	}

	pub fn with_glyphs(mut self, show: bool) -> Self {
		self.show_glyphs = show;
		self
	}
}
