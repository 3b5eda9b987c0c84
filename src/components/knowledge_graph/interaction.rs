use super::state::GraphViewState;

/// Extra slack around a node's radius that still counts as a hit.
pub const HIT_SLOP: f64 = 4.0;
pub const WHEEL_ZOOM_IN: f64 = 1.08;
pub const WHEEL_ZOOM_OUT: f64 = 0.92;

/// Where a background drag started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanAnchor {
	pub start_x: f64,
	pub start_y: f64,
	pub camera_x: f64,
	pub camera_y: f64,
}

/// What the pointer is currently doing. Exactly one mode holds at a time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	Hovering(String),
	Dragging(String),
	Panning(PanAnchor),
}

impl Interaction {
	pub fn node_id(&self) -> Option<&str> {
		match self {
			Interaction::Hovering(id) | Interaction::Dragging(id) => Some(id),
			_ => None,
		}
	}

	/// CSS cursor matching the mode.
	pub fn cursor(&self) -> &'static str {
		match self {
			Interaction::Idle => "grab",
			Interaction::Hovering(_) => "pointer",
			Interaction::Dragging(_) | Interaction::Panning(_) => "grabbing",
		}
	}
}

impl GraphViewState {
	/// Index of the topmost node under a screen point.
	pub fn hit_test(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.camera.screen_to_world(self.viewport, sx, sy);
		self.arena.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - wx, node.y - wy);
			let reach = node.radius + HIT_SLOP;
			dx * dx + dy * dy <= reach * reach
		})
	}

	fn hit_id(&self, sx: f64, sy: f64) -> Option<String> {
		self.hit_test(sx, sy)
			.map(|idx| self.arena.nodes[idx].id.clone())
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.release_drag();
		match self.hit_id(sx, sy) {
			Some(id) => {
				if let Some(node) = self.arena.node_mut(&id) {
					node.pinned = true;
				}
				self.reheat(self.params.alpha_drag);
				self.interaction = Interaction::Dragging(id);
			}
			None => {
				self.interaction = Interaction::Panning(PanAnchor {
					start_x: sx,
					start_y: sy,
					camera_x: self.camera.x,
					camera_y: self.camera.y,
				});
			}
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match &self.interaction {
			Interaction::Dragging(id) => {
				let (wx, wy) = self.camera.screen_to_world(self.viewport, sx, sy);
				let id = id.clone();
				if let Some(node) = self.arena.node_mut(&id) {
					node.x = wx;
					node.y = wy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				self.reheat(self.params.alpha_drag);
			}
			Interaction::Panning(anchor) => {
				let anchor = *anchor;
				self.camera.set_offset(anchor.camera_x, anchor.camera_y);
				self.camera.pan(sx - anchor.start_x, sy - anchor.start_y);
			}
			Interaction::Idle | Interaction::Hovering(_) => {
				self.interaction = self.hover_at(sx, sy);
			}
		}
	}

	/// Ends a drag or pan. Returns the id of the clicked node when a drag is
	/// released over the same node it started on.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<String> {
		let clicked = match &self.interaction {
			Interaction::Dragging(id) => {
				let released_on = self.hit_id(sx, sy);
				(released_on.as_deref() == Some(id.as_str())).then(|| id.clone())
			}
			Interaction::Panning(_) => {
				self.interaction = Interaction::Idle;
				return None;
			}
			Interaction::Idle | Interaction::Hovering(_) => return None,
		};
		self.release_drag();
		self.interaction = self.hover_at(sx, sy);
		clicked
	}

	pub fn pointer_leave(&mut self) {
		self.release_drag();
		self.interaction = Interaction::Idle;
	}

	/// Zooms about the viewport centre. Positive delta zooms out.
	pub fn wheel(&mut self, delta_y: f64) {
		if delta_y > 0.0 {
			self.camera.zoom_by(WHEEL_ZOOM_OUT);
		} else if delta_y < 0.0 {
			self.camera.zoom_by(WHEEL_ZOOM_IN);
		}
	}

	fn hover_at(&self, sx: f64, sy: f64) -> Interaction {
		match self.hit_id(sx, sy) {
			Some(id) => Interaction::Hovering(id),
			None => Interaction::Idle,
		}
	}

	fn release_drag(&mut self) {
		if let Interaction::Dragging(id) = &self.interaction {
			let id = id.clone();
			if let Some(node) = self.arena.node_mut(&id) {
				node.pinned = false;
			}
		}
	}
}
