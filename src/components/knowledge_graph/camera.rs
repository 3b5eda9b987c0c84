pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 3.0;

/// CSS-pixel size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Pan offset in screen pixels plus a zoom factor. The world origin sits at
/// the viewport centre when the offset is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			zoom: 1.0,
		}
	}
}

impl Camera {
	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn screen_to_world(&self, viewport: Viewport, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - viewport.width / 2.0 - self.x) / self.zoom,
			(sy - viewport.height / 2.0 - self.y) / self.zoom,
		)
	}

	pub fn world_to_screen(&self, viewport: Viewport, wx: f64, wy: f64) -> (f64, f64) {
		(
			wx * self.zoom + viewport.width / 2.0 + self.x,
			wy * self.zoom + viewport.height / 2.0 + self.y,
		)
	}

	/// Moves the view by a screen-space delta, independent of zoom.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	pub fn set_offset(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}

	/// Multiplies the zoom factor, clamping the result to the allowed range.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const VIEW: Viewport = Viewport {
		width: 800.0,
		height: 500.0,
	};

	#[test]
	fn centre_of_screen_is_world_origin() {
		let camera = Camera::default();
		assert_eq!(camera.screen_to_world(VIEW, 400.0, 250.0), (0.0, 0.0));
		assert_eq!(camera.world_to_screen(VIEW, 0.0, 0.0), (400.0, 250.0));
	}

	#[test]
	fn transforms_are_inverse() {
		let mut camera = Camera::default();
		camera.pan(37.0, -12.5);
		camera.zoom_by(1.7);
		let (wx, wy) = camera.screen_to_world(VIEW, 123.0, 456.0);
		let (sx, sy) = camera.world_to_screen(VIEW, wx, wy);
		assert!((sx - 123.0).abs() < 1e-9);
		assert!((sy - 456.0).abs() < 1e-9);
	}

	#[test]
	fn pan_ignores_zoom() {
		let mut camera = Camera::default();
		camera.zoom_by(2.5);
		camera.pan(10.0, 20.0);
		assert_eq!((camera.x, camera.y), (10.0, 20.0));
	}

	#[test]
	fn zoom_out_converges_on_the_floor() {
		let mut camera = Camera::default();
		for _ in 0..10 {
			camera.zoom_by(0.92);
		}
		assert!((camera.zoom() - 0.92_f64.powi(10)).abs() < 1e-12);
		for _ in 0..50 {
			camera.zoom_by(0.92);
			assert!(camera.zoom() >= MIN_ZOOM);
		}
		assert_eq!(camera.zoom(), MIN_ZOOM);
	}

	#[test]
	fn zoom_in_stops_at_the_ceiling() {
		let mut camera = Camera::default();
		camera.zoom_by(100.0);
		assert_eq!(camera.zoom(), MAX_ZOOM);
		camera.zoom_by(0.0);
		assert_eq!(camera.zoom(), MIN_ZOOM);
	}

	#[test]
	fn reset_restores_identity() {
		let mut camera = Camera::default();
		camera.pan(-40.0, 8.0);
		camera.zoom_by(0.5);
		camera.reset();
		assert_eq!(camera, Camera::default());
		assert_eq!(camera.zoom(), 1.0);
	}
}
