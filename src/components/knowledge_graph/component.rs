use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent, WheelEvent,
	Window,
};

use super::camera::Viewport;
use super::params::SimulationParams;
use super::render;
use super::scheduler::{FrameLoop, ResizeWatch};
use super::state::GraphViewState;
use super::types::KnowledgeNode;

type SharedState = Rc<RefCell<Option<GraphViewState>>>;

/// Browser resources bound to the mounted canvas.
#[derive(Default)]
struct Lifecycle {
	frame_loop: Option<FrameLoop>,
	resize: Option<ResizeWatch>,
}

impl Lifecycle {
	fn teardown(&mut self) {
		if let Some(frame_loop) = self.frame_loop.take() {
			frame_loop.cancel();
		}
		if let Some(mut resize) = self.resize.take() {
			resize.disconnect();
		}
	}
}

fn surface_size(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> Viewport {
	let window_dim = |dim: Result<JsValue, JsValue>, fallback: f64| {
		dim.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	if fullscreen {
		return Viewport::new(
			window_dim(window.inner_width(), 800.0),
			window_dim(window.inner_height(), 600.0),
		);
	}
	let parent = canvas.parent_element();
	Viewport::new(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.filter(|w| *w > 0.0)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(600.0)
		}),
	)
}

/// Backing buffer at device resolution, CSS box at the logical size.
fn apply_size(canvas: &HtmlCanvasElement, viewport: Viewport, dpr: f64) {
	canvas.set_width((viewport.width * dpr).round() as u32);
	canvas.set_height((viewport.height * dpr).round() as u32);
	// `leptos::prelude` brings its own `style` extension method; call the DOM one.
	let style = HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get_untracked() {
		let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Interactive force-directed view of a set of knowledge nodes.
///
/// The layout keeps running while `nodes` changes: nodes that survive an
/// update stay where they were. Clicking a node (press and release on the
/// same node) reports its id through `on_node_click`.
#[component]
pub fn KnowledgeGraphCanvas(
	#[prop(into)] nodes: Signal<Vec<KnowledgeNode>>,
	#[prop(into, optional)] selected: MaybeProp<String>,
	#[prop(optional)] on_node_click: Option<Callback<String>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] params: SimulationParams,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let lifecycle = Rc::new(RefCell::new(Lifecycle::default()));
	let (state_init, lifecycle_init) = (state.clone(), lifecycle.clone());

	Effect::new(move |_| {
		let nodes = nodes.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};

		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.rebuild(&nodes, js_sys::Math::random);
			return;
		}

		let Some(window) = web_sys::window() else {
			warn!("no window available; knowledge graph disabled");
			return;
		};
		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("2d canvas context unavailable; knowledge graph will not render");
			return;
		};

		let viewport = surface_size(&canvas, &window, fullscreen, width, height);
		let dpr = window.device_pixel_ratio();
		apply_size(&canvas, viewport, dpr);
		*state_init.borrow_mut() = Some(GraphViewState::new(
			&nodes,
			viewport,
			dpr,
			params,
			js_sys::Math::random,
		));
		info!(
			"knowledge graph mounted: {} nodes at {}x{} (dpr {})",
			nodes.len(),
			viewport.width,
			viewport.height,
			dpr
		);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		// Fullscreen follows the window; otherwise watch the box the canvas fills.
		let container = if fullscreen {
			None
		} else {
			canvas.parent_element()
		};
		let resize = ResizeWatch::observe(container.as_ref(), move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let viewport = surface_size(&canvas_resize, &win, fullscreen, width, height);
			let dpr = win.device_pixel_ratio();
			apply_size(&canvas_resize, viewport, dpr);
			if let Ok(mut state) = state_resize.try_borrow_mut() {
				if let Some(ref mut s) = *state {
					s.resize(viewport, dpr);
				}
			}
		});

		let state_anim = state_init.clone();
		let frame_loop = FrameLoop::start(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.frame();
				let selected = selected.try_get_untracked().flatten();
				render::render(&ctx, s, selected.as_deref());
			}
		});
		if frame_loop.is_none() {
			warn!("animation frames unavailable; knowledge graph will not animate");
		}

		let mut lifecycle = lifecycle_init.borrow_mut();
		lifecycle.teardown();
		lifecycle.frame_loop = frame_loop;
		lifecycle.resize = resize;
	});

	let teardown = SendWrapper::new((lifecycle, state.clone()));
	on_cleanup(move || {
		let (lifecycle, state) = teardown.take();
		if let Ok(mut lifecycle) = lifecycle.try_borrow_mut() {
			lifecycle.teardown();
		}
		if let Ok(mut state) = state.try_borrow_mut() {
			state.take();
		}
		info!("knowledge graph unmounted");
	});

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_pd.borrow_mut() {
			s.pointer_down(x, y);
			set_cursor(canvas_ref, s.interaction.cursor());
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_pm.borrow_mut() {
			s.pointer_move(x, y);
			set_cursor(canvas_ref, s.interaction.cursor());
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let clicked = match *state_pu.borrow_mut() {
			Some(ref mut s) => {
				let clicked = s.pointer_up(x, y);
				set_cursor(canvas_ref, s.interaction.cursor());
				clicked
			}
			None => None,
		};
		// Run the callback with the state released; it may well update `nodes`.
		if let Some(id) = clicked {
			debug!("node clicked: {id}");
			if let Some(cb) = on_node_click {
				cb.run(id);
			}
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut s) = *state_pl.borrow_mut() {
			s.pointer_leave();
			set_cursor(canvas_ref, s.interaction.cursor());
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	let state_rs = state;
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_rs.borrow_mut() {
			s.reset_camera();
		}
	};

	view! {
		<div class="knowledge-graph">
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointerleave=on_pointerleave
				on:wheel=on_wheel
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<button class="knowledge-graph-reset" on:click=on_reset>
				"Reset view"
			</button>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn apply_size_scales_buffer_but_not_css_box() {
		let canvas: HtmlCanvasElement = web_sys::window()
			.and_then(|w| w.document())
			.expect("document")
			.create_element("canvas")
			.expect("canvas")
			.dyn_into()
			.expect("canvas element");

		apply_size(&canvas, Viewport::new(320.0, 180.5), 2.0);
		assert_eq!((canvas.width(), canvas.height()), (640, 361));
		let style = HtmlElement::style(&canvas);
		assert_eq!(style.get_property_value("width").expect("width"), "320px");
		assert_eq!(style.get_property_value("height").expect("height"), "180.5px");
	}
}
