use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, ResizeObserver};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A `requestAnimationFrame` loop that runs until cancelled.
///
/// The loop owns the JS closure it re-schedules itself with. Cancelling
/// revokes the pending frame before releasing the closure, so the browser
/// never calls into a dropped callback.
pub struct FrameLoop {
	callback: FrameCallback,
	pending: Rc<Cell<Option<i32>>>,
	cancelled: Rc<Cell<bool>>,
}

impl FrameLoop {
	/// Starts calling `on_frame` once per display refresh. Returns `None`
	/// when there is no window to schedule frames on.
	pub fn start(mut on_frame: impl FnMut() + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let frame_loop = Self {
			callback: Rc::new(RefCell::new(None)),
			pending: Rc::new(Cell::new(None)),
			cancelled: Rc::new(Cell::new(false)),
		};

		let (callback, pending, cancelled) = (
			Rc::downgrade(&frame_loop.callback),
			frame_loop.pending.clone(),
			frame_loop.cancelled.clone(),
		);
		*frame_loop.callback.borrow_mut() = Some(Closure::new(move || {
			pending.set(None);
			if cancelled.get() {
				return;
			}
			on_frame();
			let Some(callback) = callback.upgrade() else {
				return;
			};
			let next = match (callback.borrow().as_ref(), web_sys::window()) {
				(Some(cb), Some(window)) => window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok(),
				_ => None,
			};
			pending.set(next);
		}));

		if let Some(ref cb) = *frame_loop.callback.borrow() {
			frame_loop
				.pending
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		Some(frame_loop)
	}

	/// Stops the loop. Safe to call any number of times.
	pub fn cancel(&self) {
		if self.cancelled.replace(true) {
			return;
		}
		if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		if let Ok(mut callback) = self.callback.try_borrow_mut() {
			callback.take();
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Size-change subscription that runs a callback whenever the surface may
/// have been resized.
///
/// With a container element this is a `ResizeObserver` on that element, so
/// layout-only changes are seen too; without one it falls back to the
/// window's `resize` event.
pub struct ResizeWatch {
	listener: Option<Closure<dyn FnMut()>>,
	observer: Option<ResizeObserver>,
}

impl ResizeWatch {
	pub fn observe(container: Option<&Element>, on_resize: impl FnMut() + 'static) -> Option<Self> {
		let listener = Closure::<dyn FnMut()>::new(on_resize);
		let observer = match container {
			Some(element) => {
				let observer = ResizeObserver::new(listener.as_ref().unchecked_ref()).ok()?;
				observer.observe(element);
				Some(observer)
			}
			None => {
				web_sys::window()?
					.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
					.ok()?;
				None
			}
		};
		Some(Self {
			listener: Some(listener),
			observer,
		})
	}

	/// Stops watching. Safe to call any number of times.
	pub fn disconnect(&mut self) {
		let Some(listener) = self.listener.take() else {
			return;
		};
		match self.observer.take() {
			Some(observer) => observer.disconnect(),
			None => {
				if let Some(window) = web_sys::window() {
					let _ = window.remove_event_listener_with_callback(
						"resize",
						listener.as_ref().unchecked_ref(),
					);
				}
			}
		}
	}
}

impl Drop for ResizeWatch {
	fn drop(&mut self) {
		self.disconnect();
	}
}
