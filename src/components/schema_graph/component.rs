use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::panels::{DetailPanel, Legend, StatusStrip, Toolbar};
use super::render;
use super::style::{NODE_HEIGHT, NODE_WIDTH};
use crate::config::GraphConfig;
use crate::graph::{GraphEvent, InteractionState, LoadMode, Position, derive_view};
use crate::schema::{SchemaSource, fetch_snapshot};

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Interactive schema graph: toolbar, canvas, status strip, legend and
/// entity detail panel over a [`SchemaSource`].
#[component]
pub fn SchemaGraph<S>(
	/// Where the schema comes from.
	source: S,
	/// Layout, zoom and namespace settings.
	#[prop(optional)]
	config: Option<GraphConfig>,
	/// Size the canvas to the window and follow resizes.
	#[prop(default = false)]
	fullscreen: bool,
) -> impl IntoView
where
	S: SchemaSource + Clone + 'static,
{
	let initial = match InteractionState::new(config.unwrap_or_default()) {
		Ok(state) => state,
		Err(err) => {
			warn!("{err}, falling back to the default graph config");
			InteractionState::default()
		}
	};
	let system_namespaces = initial.config().system_namespaces.clone();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = RwSignal::new(initial);
	let graph_view = Memo::new(move |_| state.with(derive_view));
	let size = RwSignal::new((800.0, 600.0));
	// bumped by the refresh button
	let fetches = RwSignal::new(0u64);
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let load = move |mode: LoadMode| {
		let Some(ticket) = state.try_update(InteractionState::begin_fetch) else {
			return;
		};
		let (source, system_namespaces) = (source.clone(), system_namespaces.clone());
		spawn_local(async move {
			let result = fetch_snapshot(&source, &system_namespaces).await;
			state.update(|s| {
				s.finish_fetch(ticket, mode, result);
			});
		});
	};
	Effect::new(move |prev: Option<u64>| {
		let n = fetches.get();
		load(if prev.is_none() {
			LoadMode::Initial
		} else {
			LoadMode::Refresh
		});
		n
	});

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
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(w, h)| w > 0.0 && h > 0.0)
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		size.set((w, h));

		if fullscreen && resize_cb.borrow().is_none() {
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas.set_width(nw as u32);
				canvas.set_height(nh as u32);
				size.set((nw, nh));
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	Effect::new(move |_| {
		let view = graph_view.get();
		let (w, h) = size.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ctx) = context_2d(&canvas) {
			render::render(&view, w, h, &ctx);
		}
	});

	let local_pointer = move |ev: &MouseEvent| -> Option<Position> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some(Position::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let on_mousedown = move |ev: MouseEvent| {
		let Some(pointer) = local_pointer(&ev) else {
			return;
		};
		let at = state.with_untracked(|s| s.transform().screen_to_graph(pointer));
		let hit = graph_view.with_untracked(|v| {
			v.node_at(at, NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0)
				.map(|n| n.id.clone())
		});
		state.update(|s| match hit {
			Some(id) => {
				s.handle(GraphEvent::ClickEntity(id.clone()));
				s.handle(GraphEvent::NodePointerDown { id, pointer });
			}
			None => s.handle(GraphEvent::BackgroundPointerDown { pointer }),
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		if !state.with_untracked(|s| s.is_dragging_node() || s.is_panning_canvas()) {
			return;
		}
		if let Some(pointer) = local_pointer(&ev) {
			state.update(|s| s.handle(GraphEvent::PointerMove { pointer }));
		}
	};

	let on_mouseup = move |_: MouseEvent| state.update(|s| s.handle(GraphEvent::PointerUp));
	let on_mouseleave = move |_: MouseEvent| state.update(|s| s.handle(GraphEvent::PointerLeave));

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta_y = ev.delta_y();
		state.update(|s| s.handle(GraphEvent::Wheel { delta_y }));
	};

	let cursor = move || {
		if state.with(|s| s.is_dragging_node() || s.is_panning_canvas()) {
			"display: block; cursor: grabbing;"
		} else {
			"display: block; cursor: grab;"
		}
	};

	view! {
		<div class="schema-graph">
			<Toolbar state=state graph_view=graph_view fetches=fetches />
			<div class="schema-graph-body">
				<div class="schema-graph-canvas-wrap">
					<canvas
						node_ref=canvas_ref
						class="schema-graph-canvas"
						on:mousedown=on_mousedown
						on:mousemove=on_mousemove
						on:mouseup=on_mouseup
						on:mouseleave=on_mouseleave
						on:wheel=on_wheel
						style=cursor
					/>
					<Legend graph_view=graph_view />
				</div>
				<DetailPanel state=state />
			</div>
			<StatusStrip graph_view=graph_view />
		</div>
	}
}
