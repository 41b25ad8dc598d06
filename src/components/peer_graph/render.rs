//! Frame derivation: current state in, draw commands out.
//!
//! Nothing here touches the browser. [`super::canvas::paint`] executes the
//! resulting list on a 2d context.

use std::f64::consts::PI;

use super::config::{BackgroundStyle, GraphConfig, Palette, Rgba};
use super::model::{PeerNode, index_by_id, resolve_edge};
use super::scale::{Point, Size, Vector, Viewport};
use super::status::{GLYPH_BUCKETS, NodeStatus, connected_to_self, glyph_for, orb_text, pill_text};
use super::types::{EdgeSnapshot, Theme};

const PARTICLE_SPEED: f64 = 0.35;
const PARTICLE_RADIUS: f64 = 2.2;
const GLOW_WIDTH: f64 = 6.0;
const GLOW_BLUR: f64 = 8.0;
const PILL_HEIGHT: f64 = 16.0;
const PILL_GAP: f64 = 6.0;
const PILL_FONT: f64 = 11.0;
const LEGEND_ROW: f64 = 16.0;
const LEGEND_PADDING: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
	Solid(Rgba),
	Linear {
		from: Point,
		to: Point,
		stops: Vec<(f64, Rgba)>,
	},
	Radial {
		inner: Point,
		inner_radius: f64,
		outer: Point,
		outer_radius: f64,
		stops: Vec<(f64, Rgba)>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
	Left,
	Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	FillRect {
		origin: Point,
		size: Size,
		paint: Paint,
	},
	FillRoundedRect {
		origin: Point,
		size: Size,
		radius: f64,
		color: Rgba,
	},
	FillCircle {
		center: Point,
		radius: f64,
		paint: Paint,
	},
	StrokeCircle {
		center: Point,
		radius: f64,
		color: Rgba,
		width: f64,
	},
	Line {
		from: Point,
		to: Point,
		color: Rgba,
		width: f64,
		/// Shadow blur radius; zero for a crisp stroke.
		blur: f64,
	},
	/// Vertically centered on `at`.
	Text {
		text: String,
		at: Point,
		size: f64,
		weight: u16,
		color: Rgba,
		align: TextAlign,
	},
}

/// Everything one frame depends on.
pub struct Scene<'a> {
	pub nodes: &'a [PeerNode],
	pub edges: &'a [EdgeSnapshot],
	pub time: f64,
	pub theme: Theme,
	pub viewport: Viewport,
	pub config: &'a GraphConfig,
	pub dragged_id: Option<&'a str>,
	pub hovered_id: Option<&'a str>,
}

pub fn render(scene: &Scene) -> Vec<DrawCommand> {
	let palette = scene.config.palette(scene.theme);
	let mut out = Vec::with_capacity(16 + scene.nodes.len() * 10 + scene.edges.len() * 4);
	draw_background(scene, palette, &mut out);
	if scene.nodes.is_empty() {
		return out;
	}

	let index = index_by_id(scene.nodes);
	draw_edges(scene, palette, &index, &mut out);

	let connected = connected_to_self(scene.nodes, scene.edges, &index);
	let dragged = scene
		.dragged_id
		.and_then(|id| index.get(id).copied());
	let order = (0..scene.nodes.len())
		.filter(|&i| Some(i) != dragged)
		.chain(dragged);
	for i in order {
		let node = &scene.nodes[i];
		let status = NodeStatus::classify(node, connected[i]);
		draw_node(scene, palette, node, status, Some(i) == dragged, &mut out);
	}

	if scene.config.show_legend {
		draw_legend(scene, palette, &mut out);
	}
	out
}

fn draw_background(scene: &Scene, palette: &Palette, out: &mut Vec<DrawCommand>) {
	let viewport = &scene.viewport;
	let stops = vec![
		(0.0, palette.background_inner),
		(1.0, palette.background_outer),
	];
	let paint = match scene.config.background {
		BackgroundStyle::Radial => Paint::Radial {
			inner: viewport.center(),
			inner_radius: 0.0,
			outer: viewport.center(),
			outer_radius: viewport.width.max(viewport.height) * 0.75,
			stops,
		},
		BackgroundStyle::Linear => Paint::Linear {
			from: Point::origin(),
			to: Point::new(0.0, viewport.height),
			stops,
		},
	};
	out.push(DrawCommand::FillRect {
		origin: Point::origin(),
		size: viewport.size(),
		paint,
	});

	for i in 0..scene.config.ambient_dots {
		let at = Point::new(
			scatter(i * 3) * viewport.width,
			scatter(i * 3 + 1) * viewport.height,
		);
		let twinkle = 0.5 + 0.5 * (scene.time * 0.8 + i as f64).sin();
		let dot = palette.ambient_dot;
		out.push(DrawCommand::FillCircle {
			center: at,
			radius: 0.6 + scatter(i * 3 + 2) * 1.2,
			paint: Paint::Solid(dot.with_alpha(dot.a * twinkle)),
		});
	}
}

/// Deterministic `[0, 1)` sequence for decorative placement.
fn scatter(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn draw_edges(
	scene: &Scene,
	palette: &Palette,
	index: &std::collections::HashMap<&str, usize>,
	out: &mut Vec<DrawCommand>,
) {
	let particles = scene.config.particles_per_edge.clamp(1, 2) as usize;
	for edge in scene.edges {
		let Some((s, t)) = resolve_edge(index, edge) else {
			continue;
		};
		if s == t {
			continue;
		}
		let (source, target) = (&scene.nodes[s], &scene.nodes[t]);
		let (from, to) = (source.position, target.position);
		let color = if source.is_active && target.is_active {
			palette.edge_active
		} else {
			palette.edge_idle
		};

		out.push(DrawCommand::Line {
			from,
			to,
			color: color.with_alpha(color.a * 0.25),
			width: GLOW_WIDTH,
			blur: GLOW_BLUR,
		});
		out.push(DrawCommand::Line {
			from,
			to,
			color,
			width: 1.0,
			blur: 0.0,
		});

		let span = to - from;
		for k in 0..particles {
			let t = particle_progress(scene.time, k, particles);
			out.push(DrawCommand::FillCircle {
				center: from + span * t,
				radius: PARTICLE_RADIUS,
				paint: Paint::Solid(palette.particle.with_alpha((PI * t).sin())),
			});
		}
	}
}

/// Position of particle `k` along its edge, in `[0, 1)`.
pub fn particle_progress(time: f64, k: usize, count: usize) -> f64 {
	(time * PARTICLE_SPEED + k as f64 / count.max(1) as f64).rem_euclid(1.0)
}

/// Aura breathing: `(extra radius, alpha)` from `sin(time + phase)`.
pub fn aura(time: f64, phase: f64) -> (f64, f64) {
	let pulse = (time + phase).sin();
	(7.0 + 3.0 * pulse, 0.3 + 0.15 * pulse)
}

fn draw_node(
	scene: &Scene,
	palette: &Palette,
	node: &PeerNode,
	status: NodeStatus,
	dragged: bool,
	out: &mut Vec<DrawCommand>,
) {
	let config = scene.config;
	let center = node.position;
	let mut radius = if node.is_self {
		config.self_radius
	} else {
		config.node_radius
	};
	if dragged {
		radius *= 1.08;
	}
	let base = status.color(palette);

	if node.is_active {
		let (extra, alpha) = aura(scene.time, node.phase());
		out.push(DrawCommand::FillCircle {
			center,
			radius: radius + extra,
			paint: Paint::Solid(palette.aura.with_alpha(alpha * 0.35)),
		});
		out.push(DrawCommand::StrokeCircle {
			center,
			radius: radius + extra,
			color: palette.aura.with_alpha(alpha),
			width: 2.0,
		});
	}

	out.push(DrawCommand::FillCircle {
		center,
		radius,
		paint: Paint::Radial {
			inner: center + Vector::new(-0.3, -0.3) * radius,
			inner_radius: radius * 0.1,
			outer: center,
			outer_radius: radius,
			stops: vec![(0.0, base.lighten(0.45)), (1.0, base)],
		},
	});
	out.push(DrawCommand::FillCircle {
		center: center + Vector::new(-0.35, -0.4) * radius,
		radius: radius * 0.28,
		paint: Paint::Solid(palette.highlight),
	});

	let (border, border_width) = if node.is_privileged {
		(palette.border_privileged, 3.0)
	} else {
		(palette.border, 1.5)
	};
	out.push(DrawCommand::StrokeCircle {
		center,
		radius,
		color: border,
		width: border_width,
	});

	if scene.hovered_id == Some(node.id.as_str()) {
		out.push(DrawCommand::StrokeCircle {
			center,
			radius: radius + 4.0,
			color: palette.hover_ring,
			width: 2.0,
		});
	}

	out.push(DrawCommand::Text {
		text: orb_text(node),
		at: center,
		size: (radius * 0.62).round(),
		weight: 700,
		color: palette.label_text,
		align: TextAlign::Center,
	});

	let name = pill_text(&node.label);
	let pill_width = name.chars().count() as f64 * PILL_FONT * 0.6 + 14.0;
	let pill_top = center.y + radius + PILL_GAP;
	out.push(DrawCommand::FillRoundedRect {
		origin: Point::new(center.x - pill_width / 2.0, pill_top),
		size: Size::new(pill_width, PILL_HEIGHT),
		radius: PILL_HEIGHT / 2.0,
		color: palette.pill_background,
	});
	out.push(DrawCommand::Text {
		text: name,
		at: Point::new(center.x, pill_top + PILL_HEIGHT / 2.0),
		size: PILL_FONT,
		weight: 500,
		color: palette.pill_text,
		align: TextAlign::Center,
	});

	if config.show_glyphs {
		if let Some(bucket) = glyph_for(node.activity_magnitude) {
			out.push(DrawCommand::Text {
				text: bucket.symbol.to_owned(),
				at: Point::new(center.x, pill_top + PILL_HEIGHT + 9.0),
				size: 12.0,
				weight: 400,
				color: palette.pill_text,
				align: TextAlign::Center,
			});
		}
	}
}

enum LegendMark {
	Dot(Rgba),
	Ring(Rgba),
	Glyph(&'static str),
}

fn legend_rows(config: &GraphConfig, palette: &Palette) -> Vec<(LegendMark, String)> {
	let mut rows = vec![
		(LegendMark::Dot(palette.orb_self), "You".to_owned()),
		(LegendMark::Dot(palette.orb_active), "Fasting now".to_owned()),
		(LegendMark::Dot(palette.orb_connected), "Connected".to_owned()),
		(LegendMark::Dot(palette.orb_idle), "Idle".to_owned()),
		(LegendMark::Ring(palette.border_privileged), "Premium".to_owned()),
	];
	if config.show_glyphs {
		rows.extend(GLYPH_BUCKETS.iter().map(|bucket| {
			(
				LegendMark::Glyph(bucket.symbol),
				format!("{}h+ {}", bucket.min, bucket.meaning),
			)
		}));
	}
	rows
}

fn draw_legend(scene: &Scene, palette: &Palette, out: &mut Vec<DrawCommand>) {
	let rows = legend_rows(scene.config, palette);
	let size = Size::new(132.0, rows.len() as f64 * LEGEND_ROW + LEGEND_PADDING * 2.0);
	let origin = Point::new(12.0, scene.viewport.height - 12.0 - size.height);
	out.push(DrawCommand::FillRoundedRect {
		origin,
		size,
		radius: 8.0,
		color: palette.legend_background,
	});

	for (row, (mark, label)) in rows.into_iter().enumerate() {
		let y = origin.y + LEGEND_PADDING + LEGEND_ROW * (row as f64 + 0.5);
		let mark_at = Point::new(origin.x + LEGEND_PADDING + 5.0, y);
		out.push(match mark {
			LegendMark::Dot(color) => DrawCommand::FillCircle {
				center: mark_at,
				radius: 5.0,
				paint: Paint::Solid(color),
			},
			LegendMark::Ring(color) => DrawCommand::StrokeCircle {
				center: mark_at,
				radius: 4.5,
				color,
				width: 2.0,
			},
			LegendMark::Glyph(symbol) => DrawCommand::Text {
				text: symbol.to_owned(),
				at: mark_at,
				size: 10.0,
				weight: 400,
				color: palette.legend_text,
				align: TextAlign::Center,
			},
		});
		out.push(DrawCommand::Text {
			text: label,
			at: Point::new(mark_at.x + 12.0, y),
			size: 10.0,
			weight: 400,
			color: palette.legend_text,
			align: TextAlign::Left,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::peer_graph::model::GraphModel;
	use crate::components::peer_graph::model::tests::trio;
	use crate::components::peer_graph::types::{GraphSnapshot, NodeSnapshot};

	fn frame(
		model: &GraphModel,
		config: &GraphConfig,
		theme: Theme,
		time: f64,
		dragged_id: Option<&str>,
		hovered_id: Option<&str>,
	) -> Vec<DrawCommand> {
		render(&Scene {
			nodes: model.nodes(),
			edges: model.edges(),
			time,
			theme,
			viewport: Viewport::new(400.0, 300.0),
			config,
			dragged_id,
			hovered_id,
		})
	}

	fn model(snapshot: &GraphSnapshot) -> GraphModel {
		let mut model = GraphModel::new(11);
		model.ingest(snapshot, &Viewport::new(400.0, 300.0), 0.28);
		model
	}

	fn lines(commands: &[DrawCommand]) -> Vec<(&Point, &Point, &Rgba, f64, f64)> {
		commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::Line {
					from,
					to,
					color,
					width,
					blur,
				} => Some((from, to, color, *width, *blur)),
				_ => None,
			})
			.collect()
	}

	fn texts(commands: &[DrawCommand]) -> Vec<&str> {
		commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::Text { text, .. } => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}

	#[test]
	fn empty_graph_draws_background_only() {
		let config = GraphConfig::admin();
		let commands = frame(&model(&GraphSnapshot::default()), &config, Theme::Dark, 0.0, None, None);
		assert_eq!(commands.len(), 1);
		match &commands[0] {
			DrawCommand::FillRect { paint, size, .. } => {
				assert!(matches!(paint, Paint::Linear { .. }));
				assert_eq!(*size, Size::new(400.0, 300.0));
			}
			other => panic!("expected background, got {other:?}"),
		}

		let widget = GraphConfig::widget();
		let commands = frame(&model(&GraphSnapshot::default()), &widget, Theme::Dark, 0.0, None, None);
		assert!(matches!(
			&commands[0],
			DrawCommand::FillRect {
				paint: Paint::Radial { .. },
				..
			}
		));
		assert_eq!(commands.len(), 1 + widget.ambient_dots);
	}

	#[test]
	fn rendering_is_a_pure_function_of_state() {
		let config = GraphConfig::widget();
		let model = model(&trio());
		assert_eq!(
			frame(&model, &config, Theme::Light, 2.5, None, Some("a")),
			frame(&model, &config, Theme::Light, 2.5, None, Some("a"))
		);
		assert_ne!(
			frame(&model, &config, Theme::Light, 2.5, None, None),
			frame(&model, &config, Theme::Dark, 2.5, None, None)
		);
	}

	#[test]
	fn edges_draw_glow_then_crisp_pass_colored_by_joint_status() {
		let config = GraphConfig::admin().with_legend(false);
		let mut snapshot = trio();
		snapshot.nodes[0] = NodeSnapshot::me("you", "Sam").active(2.0);
		snapshot.nodes[1] = NodeSnapshot::new("a", "Ana").active(1.0);
		let model = model(&snapshot);
		let commands = frame(&model, &config, Theme::Dark, 0.0, None, None);
		let lines = lines(&commands);
		assert_eq!(lines.len(), 4);
		let palette = config.palette(Theme::Dark);
		assert_eq!(lines[0].4, GLOW_BLUR);
		assert_eq!(lines[1].3, 1.0);
		assert_eq!(*lines[1].2, palette.edge_active);
		assert_eq!(*lines[3].2, palette.edge_idle);
	}

	#[test]
	fn dangling_edges_draw_nothing() {
		let config = GraphConfig::admin();
		let mut snapshot = trio();
		snapshot.edges = vec![EdgeSnapshot::new("a", "ghost")];
		let commands = frame(&model(&snapshot), &config, Theme::Dark, 0.0, None, None);
		assert!(lines(&commands).is_empty());
	}

	#[test]
	fn particles_fade_in_and_out_along_the_edge() {
		assert_eq!(particle_progress(0.0, 0, 2), 0.0);
		assert_eq!(particle_progress(0.0, 1, 2), 0.5);
		let later = particle_progress(10.0, 0, 1);
		assert!((0.0..1.0).contains(&later));

		let config = GraphConfig::admin();
		let model = model(&trio());
		let commands = frame(&model, &config, Theme::Dark, 0.0, None, None);
		let particle_alphas: Vec<f64> = commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::FillCircle {
					radius,
					paint: Paint::Solid(color),
					..
				} if *radius == PARTICLE_RADIUS => Some(color.a),
				_ => None,
			})
			.collect();
		assert_eq!(particle_alphas.len(), 4);
		assert!(particle_alphas[0].abs() < 1e-12);
		assert!((particle_alphas[1] - 1.0).abs() < 1e-12);
	}

	#[test]
	fn active_nodes_breathe() {
		let (r0, a0) = aura(0.0, 0.0);
		let (r1, a1) = aura(PI / 2.0, 0.0);
		assert!(r1 > r0 && a1 > a0);
		assert_eq!(aura(1.0, 0.5), aura(0.5, 1.0));

		let config = GraphConfig::admin();
		let mut snapshot = trio();
		snapshot.nodes[1] = NodeSnapshot::new("a", "Ana").active(5.0);
		let commands = frame(&model(&snapshot), &config, Theme::Dark, 0.0, None, None);
		let aura_color = config.palette(Theme::Dark).aura;
		let rings = commands
			.iter()
			.filter(|c| {
				matches!(c, DrawCommand::StrokeCircle { color, .. }
					if (color.r, color.g, color.b) == (aura_color.r, aura_color.g, aura_color.b))
			})
			.count();
		assert_eq!(rings, 1);
	}

	#[test]
	fn labels_pills_and_glyphs() {
		let config = GraphConfig::widget().with_legend(false);
		let mut snapshot = trio();
		snapshot.nodes[1] = NodeSnapshot::new("a", "Ana Lima").active(9.0);
		snapshot.nodes[2] = NodeSnapshot::new("b", "Bo Chen").active(3.0);
		let commands = frame(&model(&snapshot), &config, Theme::Dark, 0.0, None, None);
		assert_eq!(
			texts(&commands),
			["You", "Sam Reyes", "AL", "Ana Lima", "🔥", "BC", "Bo Chen"]
		);

		let no_glyphs = config.clone().with_glyphs(false);
		let commands = frame(&model(&snapshot), &no_glyphs, Theme::Dark, 0.0, None, None);
		assert!(!texts(&commands).contains(&"🔥"));
	}

	#[test]
	fn privileged_nodes_get_a_thick_border() {
		let config = GraphConfig::admin().with_legend(false);
		let mut snapshot = trio();
		snapshot.nodes[2] = NodeSnapshot::new("b", "Bo").privileged();
		let commands = frame(&model(&snapshot), &config, Theme::Light, 0.0, None, None);
		let gold = config.palette(Theme::Light).border_privileged;
		let borders: Vec<f64> = commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::StrokeCircle { color, width, .. } if *color == gold => Some(*width),
				_ => None,
			})
			.collect();
		assert_eq!(borders, [3.0]);
	}

	#[test]
	fn dragged_node_is_drawn_last_and_hover_ring_shows() {
		let config = GraphConfig::admin().with_legend(false);
		let model = model(&trio());
		let commands = frame(&model, &config, Theme::Dark, 0.0, Some("a"), Some("b"));
		assert_eq!(texts(&commands).last(), Some(&"Ana Lima"));
		let hover = config.palette(Theme::Dark).hover_ring;
		let ring_center = commands.iter().find_map(|c| match c {
			DrawCommand::StrokeCircle { center, color, .. } if *color == hover => Some(*center),
			_ => None,
		});
		assert_eq!(ring_center, Some(model.node("b").unwrap().position));
	}

	#[test]
	fn legend_is_independent_of_graph_data() {
		let config = GraphConfig::widget();
		let legend = |snapshot: &GraphSnapshot| {
			let commands = frame(&model(snapshot), &config, Theme::Dark, 1.0, None, None);
			let start = commands
				.iter()
				.rposition(|c| matches!(c, DrawCommand::FillRoundedRect { radius, .. } if *radius == 8.0))
				.unwrap();
			commands[start..].to_vec()
		};
		let mut bigger = trio();
		bigger.nodes.push(NodeSnapshot::new("c", "Cy").active(30.0));
		let small = legend(&trio());
		assert_eq!(small, legend(&bigger));
		assert!(texts(&small).contains(&"Fasting now"));
		assert!(texts(&small).contains(&"24h+ Deep fast"));
	}
}
