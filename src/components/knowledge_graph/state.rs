use super::camera::{Camera, Viewport};
use super::interaction::Interaction;
use super::model::{self, Arena};
use super::params::SimulationParams;
use super::simulation;
use super::types::KnowledgeNode;

/// Everything one graph view owns: the arena, the camera, the pointer mode
/// and the simulation temperature.
pub struct GraphViewState {
	pub arena: Arena,
	pub camera: Camera,
	pub interaction: Interaction,
	pub alpha: f64,
	pub viewport: Viewport,
	/// Device pixel ratio of the backing buffer.
	pub dpr: f64,
	pub params: SimulationParams,
}

impl GraphViewState {
	pub fn new(
		nodes: &[KnowledgeNode],
		viewport: Viewport,
		dpr: f64,
		params: SimulationParams,
		jitter: impl FnMut() -> f64,
	) -> Self {
		Self {
			arena: model::build(nodes, None, jitter),
			camera: Camera::default(),
			interaction: Interaction::Idle,
			alpha: params.alpha_rebuild,
			viewport,
			dpr,
			params,
		}
	}

	/// Swaps in a fresh arena for `nodes`, carrying over the layout of nodes
	/// that survive. The pointer mode is dropped if its node went away.
	pub fn rebuild(&mut self, nodes: &[KnowledgeNode], jitter: impl FnMut() -> f64) {
		let mut arena = model::build(nodes, Some(&self.arena), jitter);
		if let Some(id) = self.interaction.node_id() {
			match arena.node_mut(id) {
				Some(node) => node.pinned = matches!(self.interaction, Interaction::Dragging(_)),
				None => self.interaction = Interaction::Idle,
			}
		}
		self.arena = arena;
		self.alpha = self.params.alpha_rebuild;
		log::debug!(
			"graph rebuilt: {} nodes, {} edges",
			self.arena.nodes.len(),
			self.arena.edges.len()
		);
	}

	/// One simulation step, skipped once the layout has settled.
	pub fn frame(&mut self) {
		self.alpha = simulation::step(
			&mut self.arena,
			self.viewport.width,
			self.viewport.height,
			self.alpha,
			&self.params,
		);
	}

	pub fn resize(&mut self, viewport: Viewport, dpr: f64) {
		self.viewport = viewport;
		self.dpr = dpr;
	}

	pub fn reset_camera(&mut self) {
		self.camera.reset();
		self.alpha = self.params.alpha_camera_reset;
	}

	/// Raises alpha to at least `floor` without ever lowering it.
	pub fn reheat(&mut self, floor: f64) {
		self.alpha = self.alpha.max(floor);
	}

	/// Node under the pointer: hovered, or held by a drag.
	pub fn hovered_id(&self) -> Option<&str> {
		match &self.interaction {
			Interaction::Hovering(id) | Interaction::Dragging(id) => Some(id),
			_ => None,
		}
	}
}
