/// Tuning knobs for the layout simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
	/// Pairwise repulsion constant, divided by squared distance.
	pub repulsion: f64,
	/// Rest length of every edge spring.
	pub spring_length: f64,
	pub spring_strength: f64,
	/// Pull toward the origin, proportional to displacement.
	pub center_strength: f64,
	/// Velocity multiplier applied each tick before integration.
	pub damping: f64,
	/// Inset from the viewport edge where the soft boundary starts pushing back.
	pub boundary_padding: f64,
	pub boundary_strength: f64,
	/// Per-tick alpha multiplier.
	pub alpha_decay: f64,
	/// Below this alpha the layout counts as settled and ticking stops.
	pub alpha_min: f64,
	pub alpha_rebuild: f64,
	pub alpha_drag: f64,
	pub alpha_camera_reset: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			repulsion: 800.0,
			spring_length: 120.0,
			spring_strength: 0.005,
			center_strength: 0.002,
			damping: 0.85,
			boundary_padding: 40.0,
			boundary_strength: 0.1,
			alpha_decay: 0.995,
			alpha_min: 0.001,
			alpha_rebuild: 0.5,
			alpha_drag: 0.3,
			alpha_camera_reset: 0.1,
		}
	}
}
