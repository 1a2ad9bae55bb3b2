use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use crate::graph::GraphSession;

/// Pointer travel, in pixels, below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas view of a [`GraphSession`].
///
/// Every frame reads the session and asks its visibility resolver how each
/// node and edge should look, so filter and traversal changes show up on the
/// next frame without any re-registration. A click on a node reports its id
/// through `on_select`; a click on the background reports `None`.
#[component]
pub fn ForceGraphCanvas(
	session: RwSignal<GraphSession>,
	#[prop(into)] on_select: Callback<Option<String>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				log::error!("canvas 2d context unavailable");
				return;
			}
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let alive = session
				.try_with_untracked(|sess| {
					let mut guard = state_anim.borrow_mut();
					let stale = guard.as_ref().is_none_or(|s| s.revision != sess.revision());
					if stale {
						let (w, h) = guard
							.as_ref()
							.map(|s| (s.width, s.height))
							.unwrap_or((w, h));
						log::debug!("rebuilding canvas for graph revision {}", sess.revision());
						*guard = Some(ForceGraphState::new(sess.graph(), sess.revision(), w, h));
					}
					if let Some(ref mut s) = *guard {
						if s.animation_running {
							s.tick(0.016);
						}
						render::render(s, sess, &ctx);
					}
				})
				.is_some();
			if !alive {
				return;
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let hit = session.with_untracked(|sess| {
			state_md
				.borrow()
				.as_ref()
				.and_then(|s| s.node_at_position(x, y, sess.graph()))
		});

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(slot) = hit {
				s.drag = Default::default();
				s.drag.active = true;
				s.drag.node = Some(slot);
				s.drag.start_x = x;
				s.drag.start_y = y;
				if let Some(idx) = s.node_index(slot) {
					let (mut nx, mut ny) = (0.0, 0.0);
					s.graph.visit_nodes(|node| {
						if node.index() == idx {
							(nx, ny) = (node.x(), node.y());
						}
					});
					s.drag.node_start_x = nx;
					s.drag.node_start_y = ny;
				}
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};

		// Update hover state when not dragging
		if !s.drag.active {
			let (node, edge) = session.with_untracked(|sess| {
				let node = s.node_at_position(x, y, sess.graph());
				let edge = match node {
					Some(_) => None,
					None => s.edge_at_position(x, y, sess.graph()),
				};
				(node, edge)
			});
			s.set_hover(node);
			s.set_hovered_edge(edge);
		}

		if s.drag.active {
			if (x - s.drag.start_x).hypot(y - s.drag.start_y) > CLICK_SLOP {
				s.drag.moved = true;
			}
			if let (Some(slot), true) = (s.drag.node, s.drag.moved) {
				let (dx, dy) = (
					(x - s.drag.start_x) / s.transform.k,
					(y - s.drag.start_y) / s.transform.k,
				);
				let (nx, ny) = (
					s.drag.node_start_x + dx as f32,
					s.drag.node_start_y + dy as f32,
				);
				if let Some(idx) = s.node_index(slot) {
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			}
		} else if s.pan.active {
			if (x - s.pan.start_x).hypot(y - s.pan.start_y) > CLICK_SLOP {
				s.pan.moved = true;
			}
			s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
			s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.drag.active && !s.drag.moved {
				Some(s.drag.node)
			} else if s.pan.active && !s.pan.moved {
				Some(None)
			} else {
				None
			};
			s.drag = Default::default();
			s.pan.active = false;
			clicked
		};

		if let Some(slot) = clicked {
			let id = slot.and_then(|slot| {
				session.with_untracked(|sess| sess.graph().nodes().get(slot).map(|n| n.id.clone()))
			});
			on_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag = Default::default();
			s.pan.active = false;
			s.set_hover(None);
			s.set_hovered_edge(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
