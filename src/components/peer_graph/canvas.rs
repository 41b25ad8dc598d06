use std::f64::consts::PI;

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::config::Rgba;
use super::error::CanvasError;
use super::render::{DrawCommand, Paint, TextAlign};
use super::scale::Viewport;

/// Executes one frame's commands, scaled for the viewport's pixel ratio.
pub fn paint(
	ctx: &CanvasRenderingContext2d,
	commands: &[DrawCommand],
	viewport: &Viewport,
) -> Result<(), CanvasError> {
	let dpr = viewport.device_pixel_ratio;
	ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
	ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
	ctx.set_text_baseline("middle");

	for command in commands {
		match command {
			DrawCommand::FillRect { origin, size, paint } => {
				set_fill(ctx, paint)?;
				ctx.fill_rect(origin.x, origin.y, size.width, size.height);
			}
			DrawCommand::FillRoundedRect {
				origin,
				size,
				radius,
				color,
			} => {
				rounded_rect(ctx, origin.x, origin.y, size.width, size.height, *radius)?;
				ctx.set_fill_style_str(&color.css());
				ctx.fill();
			}
			DrawCommand::FillCircle {
				center,
				radius,
				paint,
			} => {
				ctx.begin_path();
				ctx.arc(center.x, center.y, radius.max(0.0), 0.0, 2.0 * PI)?;
				set_fill(ctx, paint)?;
				ctx.fill();
			}
			DrawCommand::StrokeCircle {
				center,
				radius,
				color,
				width,
			} => {
				ctx.begin_path();
				ctx.arc(center.x, center.y, radius.max(0.0), 0.0, 2.0 * PI)?;
				ctx.set_stroke_style_str(&color.css());
				ctx.set_line_width(*width);
				ctx.stroke();
			}
			DrawCommand::Line {
				from,
				to,
				color,
				width,
				blur,
			} => {
				if *blur > 0.0 {
					ctx.set_shadow_blur(*blur);
					ctx.set_shadow_color(&color.css());
				}
				ctx.begin_path();
				ctx.move_to(from.x, from.y);
				ctx.line_to(to.x, to.y);
				ctx.set_stroke_style_str(&color.css());
				ctx.set_line_width(*width);
				ctx.stroke();
				if *blur > 0.0 {
					ctx.set_shadow_blur(0.0);
					ctx.set_shadow_color("transparent");
				}
			}
			DrawCommand::Text {
				text,
				at,
				size,
				weight,
				color,
				align,
			} => {
				ctx.set_font(&format!("{weight} {size}px system-ui, sans-serif"));
				ctx.set_text_align(match align {
					TextAlign::Left => "left",
					TextAlign::Center => "center",
				});
				ctx.set_fill_style_str(&color.css());
				ctx.fill_text(text, at.x, at.y)?;
			}
		}
	}
	Ok(())
}

fn set_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Result<(), CanvasError> {
	let gradient = match paint {
		Paint::Solid(color) => {
			ctx.set_fill_style_str(&color.css());
			return Ok(());
		}
		Paint::Linear { from, to, stops } => {
			let gradient = ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
			add_stops(&gradient, stops)?;
			gradient
		}
		Paint::Radial {
			inner,
			inner_radius,
			outer,
			outer_radius,
			stops,
		} => {
			let gradient = ctx.create_radial_gradient(
				inner.x,
				inner.y,
				inner_radius.max(0.0),
				outer.x,
				outer.y,
				outer_radius.max(0.0),
			)?;
			add_stops(&gradient, stops)?;
			gradient
		}
	};
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	Ok(())
}

fn add_stops(
	gradient: &CanvasGradient,
	stops: &[(f64, Rgba)],
) -> Result<(), CanvasError> {
	for (offset, color) in stops {
		gradient.add_color_stop(offset.clamp(0.0, 1.0) as f32, &color.css())?;
	}
	Ok(())
}

fn rounded_rect(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	w: f64,
	h: f64,
	radius: f64,
) -> Result<(), CanvasError> {
	let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.arc_to(x + w, y, x + w, y + h, r)?;
	ctx.arc_to(x + w, y + h, x, y + h, r)?;
	ctx.arc_to(x, y + h, x, y, r)?;
	ctx.arc_to(x, y, x + w, y, r)?;
	ctx.close_path();
	Ok(())
}
