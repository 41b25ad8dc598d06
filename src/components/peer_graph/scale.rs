//! Logical canvas size, device pixel ratio and pointer coordinate mapping.

use euclid::default::{Point2D, Size2D, Vector2D};

pub type Point = Point2D<f64>;
pub type Vector = Vector2D<f64>;
pub type Size = Size2D<f64>;

/// Canvas dimensions in CSS pixels plus the display's pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub device_pixel_ratio: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: sanitize(width),
			height: sanitize(height),
			device_pixel_ratio: 1.0,
		}
	}

	pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
		self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
			ratio
		} else {
			1.0
		};
		self
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn size(&self) -> Size {
		Size::new(self.width, self.height)
	}

	pub fn min_dimension(&self) -> f64 {
		self.width.min(self.height)
	}

	/// Pixel buffer size of the canvas element.
	pub fn backing_size(&self) -> (u32, u32) {
		let scale = |v: f64| (v * self.device_pixel_ratio).round().max(1.0) as u32;
		(scale(self.width), scale(self.height))
	}

	/// Maps a client-space pointer position into canvas coordinates.
	///
	/// `bounds_origin` and `bounds_size` come from the canvas's bounding
	/// client rect; a canvas stretched by CSS is rescaled back to logical
	/// pixels.
	pub fn client_to_canvas(&self, client: Point, bounds_origin: Point, bounds_size: Size) -> Point {
		let local = client - bounds_origin;
		let sx = if bounds_size.width > 0.0 {
			self.width / bounds_size.width
		} else {
			1.0
		};
		let sy = if bounds_size.height > 0.0 {
			self.height / bounds_size.height
		} else {
			1.0
		};
		Point::new(local.x * sx, local.y * sy)
	}

	/// Clamps one coordinate into `[margin, extent - margin]`. Falls back to
	/// the midpoint when the canvas is narrower than two margins.
	pub fn clamp_axis(value: f64, margin: f64, extent: f64) -> f64 {
		let hi = extent - margin;
		if hi < margin {
			extent / 2.0
		} else {
			value.clamp(margin, hi)
		}
	}

	pub fn contain(&self, point: Point, margin: f64) -> Point {
		Point::new(
			Self::clamp_axis(point.x, margin, self.width),
			Self::clamp_axis(point.y, margin, self.height),
		)
	}
}

fn sanitize(extent: f64) -> f64 {
	if extent.is_finite() { extent.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backing_store_scales_with_pixel_ratio() {
		let viewport = Viewport::new(400.0, 300.0).with_device_pixel_ratio(2.0);
		assert_eq!(viewport.backing_size(), (800, 600));
		assert_eq!(Viewport::new(0.0, 0.0).backing_size(), (1, 1));
		assert_eq!(
			Viewport::new(10.0, 10.0)
				.with_device_pixel_ratio(f64::NAN)
				.device_pixel_ratio,
			1.0
		);
	}

	#[test]
	fn client_points_are_canvas_relative() {
		let viewport = Viewport::new(400.0, 300.0);
		let at = viewport.client_to_canvas(
			Point::new(150.0, 120.0),
			Point::new(50.0, 20.0),
			Size::new(400.0, 300.0),
		);
		assert_eq!(at, Point::new(100.0, 100.0));

		let stretched = viewport.client_to_canvas(
			Point::new(200.0, 150.0),
			Point::new(0.0, 0.0),
			Size::new(800.0, 600.0),
		);
		assert_eq!(stretched, Point::new(100.0, 75.0));
	}

	#[test]
	fn clamp_handles_tiny_canvases() {
		assert_eq!(Viewport::clamp_axis(-5.0, 10.0, 100.0), 10.0);
		assert_eq!(Viewport::clamp_axis(500.0, 10.0, 100.0), 90.0);
		assert_eq!(Viewport::clamp_axis(3.0, 10.0, 12.0), 6.0);
	}
}
