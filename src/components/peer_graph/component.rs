use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::canvas;
use super::config::GraphConfig;
use super::error::CanvasError;
use super::interaction::PointerSession;
use super::scale::{Point, Size, Viewport};
use super::state::PeerGraphState;
use super::types::{GraphSnapshot, Theme};

type SharedState = Rc<RefCell<Option<PeerGraphState>>>;

/// Frame schedule and window listeners of one mounted canvas.
#[derive(Default)]
struct AnimationLoop {
	running: Cell<bool>,
	frame: Cell<Option<i32>>,
	animate: RefCell<Option<Closure<dyn FnMut()>>>,
	resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl AnimationLoop {
	fn schedule(&self) -> Result<(), CanvasError> {
		if !self.running.get() {
			return Ok(());
		}
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		if let Some(cb) = self.animate.borrow().as_ref() {
			let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.frame.set(Some(id));
		}
		Ok(())
	}

	/// Stops scheduling and detaches the window listener. Idempotent.
	fn stop(&self) {
		self.running.set(false);
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
	}
}

#[derive(Clone, Copy)]
struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

impl Sizing {
	fn measure(&self, window: &Window, canvas: &HtmlCanvasElement) -> Result<Viewport, CanvasError> {
		let (w, h) = if self.fullscreen {
			(
				window.inner_width()?.as_f64().unwrap_or(800.0),
				window.inner_height()?.as_f64().unwrap_or(600.0),
			)
		} else {
			let parent = canvas.parent_element();
			(
				self.width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				self.height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		Ok(Viewport::new(w, h).with_device_pixel_ratio(window.device_pixel_ratio()))
	}
}

fn apply_size(canvas: &HtmlCanvasElement, viewport: &Viewport) -> Result<(), CanvasError> {
	let (bw, bh) = viewport.backing_size();
	canvas.set_width(bw);
	canvas.set_height(bh);
	let style = web_sys::HtmlElement::style(canvas);
	style.set_property("width", &format!("{}px", viewport.width))?;
	style.set_property("height", &format!("{}px", viewport.height))?;
	Ok(())
}

fn mount(
	canvas: &HtmlCanvasElement,
	state: &SharedState,
	animation: &Rc<AnimationLoop>,
	config: GraphConfig,
	snapshot: &GraphSnapshot,
	theme: Theme,
	sizing: Sizing,
) -> Result<(), CanvasError> {
	let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let viewport = sizing.measure(&window, canvas)?;
	apply_size(canvas, &viewport)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(CanvasError::NoContext)?
		.dyn_into()
		.map_err(|_| CanvasError::NoContext)?;

	let config = match config.validate() {
		Ok(()) => config,
		Err(err) => {
			warn!("{err}; falling back to the widget preset");
			GraphConfig::widget()
		}
	}
	.with_phase_seed(js_sys::Date::now() as u64);
	*state.borrow_mut() = Some(PeerGraphState::new(config, snapshot, viewport, theme));
	info!("peer graph mounted with {} nodes", snapshot.nodes.len());

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	*animation.resize.borrow_mut() = Some(Closure::new(move || {
		let Some(window) = web_sys::window() else {
			return;
		};
		let resized = sizing
			.measure(&window, &canvas_resize)
			.and_then(|v| apply_size(&canvas_resize, &v).map(|_| v));
		match resized {
			Ok(viewport) => {
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(viewport);
				}
			}
			Err(err) => warn!("peer graph resize failed: {err}"),
		}
	}));
	if let Some(cb) = animation.resize.borrow().as_ref() {
		window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
	}

	let (state_anim, animation_anim) = (state.clone(), animation.clone());
	*animation.animate.borrow_mut() = Some(Closure::new(move || {
		if !animation_anim.running.get() {
			return;
		}
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			s.tick();
			if let Err(err) = canvas::paint(&ctx, &s.frame(), s.viewport()) {
				warn!("peer graph frame skipped: {err}");
			}
		}
		if let Err(err) = animation_anim.schedule() {
			warn!("peer graph could not schedule a frame: {err}");
		}
	}));
	animation.running.set(true);
	animation.schedule()
}

fn canvas_point(canvas: &HtmlCanvasElement, viewport: &Viewport, client_x: f64, client_y: f64) -> Point {
	let rect = canvas.get_bounding_client_rect();
	viewport.client_to_canvas(
		Point::new(client_x, client_y),
		Point::new(rect.left(), rect.top()),
		Size::new(rect.width(), rect.height()),
	)
}

fn touch_client(ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.changed_touches().get(0)?;
	Some((touch.client_x() as f64, touch.client_y() as f64))
}

/// Returns whether the press landed on a node.
fn press(state: &SharedState, canvas: &HtmlCanvasElement, (x, y): (f64, f64)) -> bool {
	let mut guard = state.borrow_mut();
	let Some(s) = guard.as_mut() else {
		return false;
	};
	let at = canvas_point(canvas, s.viewport(), x, y);
	s.pointer_down(at);
	*s.session() != PointerSession::Idle
}

/// Returns whether a pointer session is in progress.
fn motion(state: &SharedState, canvas: &HtmlCanvasElement, (x, y): (f64, f64)) -> bool {
	let mut guard = state.borrow_mut();
	let Some(s) = guard.as_mut() else {
		return false;
	};
	let at = canvas_point(canvas, s.viewport(), x, y);
	s.pointer_move(at);
	let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", s.cursor());
	*s.session() != PointerSession::Idle
}

fn release(state: &SharedState, on_node_activated: Option<Callback<String>>) {
	let activated = state
		.borrow_mut()
		.as_mut()
		.and_then(PeerGraphState::pointer_up);
	if let (Some(id), Some(cb)) = (activated, on_node_activated) {
		cb.run(id);
	}
}

fn leave(state: &SharedState, canvas: &HtmlCanvasElement) {
	if let Some(ref mut s) = *state.borrow_mut() {
		s.pointer_leave();
		let _ = web_sys::HtmlElement::style(canvas).set_property("cursor", s.cursor());
	}
}

/// Force-directed view of the user and their peers.
///
/// Snapshot and theme changes are merged into the running simulation; the
/// frame loop and window listeners are torn down when the component unmounts.
#[component]
pub fn PeerGraphCanvas(
	#[prop(into)] data: Signal<GraphSnapshot>,
	#[prop(into, default = Signal::stored(Theme::Dark))] theme: Signal<Theme>,
	#[prop(default = GraphConfig::widget())] config: GraphConfig,
	#[prop(optional, into)] on_node_activated: Option<Callback<String>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animation = Rc::new(AnimationLoop::default());
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};

	let (state_init, animation_init) = (state.clone(), animation.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		if let Err(err) = mount(
			&canvas,
			&state_init,
			&animation_init,
			config.clone(),
			&data.get_untracked(),
			theme.get_untracked(),
			sizing,
		) {
			warn!("peer graph failed to start: {err}");
		}
	});

	let state_sync = state.clone();
	Effect::new(move |_| {
		let (snapshot, current_theme) = (data.get(), theme.get());
		if let Some(ref mut s) = *state_sync.borrow_mut() {
			s.ingest(&snapshot);
			s.set_theme(current_theme);
		}
	});

	let teardown = SendWrapper::new((animation.clone(), state.clone()));
	on_cleanup(move || {
		let (animation, state) = &*teardown;
		animation.stop();
		if state.borrow_mut().take().is_some() {
			info!("peer graph torn down");
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			press(&state_md, &canvas, (ev.client_x() as f64, ev.client_y() as f64));
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			motion(&state_mm, &canvas, (ev.client_x() as f64, ev.client_y() as f64));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| release(&state_mu, on_node_activated);

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			leave(&state_ml, &canvas);
		}
	};

	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let (Some(canvas), Some(client)) = (canvas_ref.get(), touch_client(&ev)) else {
			return;
		};
		// Claim the gesture only when it starts on a node; elsewhere the page scrolls.
		if press(&state_ts, &canvas, client) {
			ev.prevent_default();
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let (Some(canvas), Some(client)) = (canvas_ref.get(), touch_client(&ev)) else {
			return;
		};
		if motion(&state_tm, &canvas, client) {
			ev.prevent_default();
		}
	};

	let state_te = state.clone();
	let on_touchend = move |ev: TouchEvent| {
		let active = state_te
			.borrow()
			.as_ref()
			.is_some_and(|s| *s.session() != PointerSession::Idle);
		if active {
			ev.prevent_default();
		}
		release(&state_te, on_node_activated);
	};

	let state_tc = state.clone();
	let on_touchcancel = move |_: TouchEvent| {
		if let Some(canvas) = canvas_ref.get() {
			leave(&state_tc, &canvas);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="peer-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block;"
		/>
	}
}
