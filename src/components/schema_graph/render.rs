use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::style::{NODE_HEIGHT, NODE_WIDTH, edge_style, namespace_color};
use crate::graph::{EdgeView, GraphView, NodeView};

const ARROW_SIZE: f64 = 9.0;

pub fn render(view: &GraphView, width: f64, height: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.save();
	let t = view.transform;
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	for edge in view.edges.iter().filter(|e| !e.highlighted) {
		draw_edge(edge, ctx);
	}
	// highlighted edges on top
	for edge in view.edges.iter().filter(|e| e.highlighted) {
		draw_edge(edge, ctx);
	}
	for node in &view.nodes {
		draw_node(node, t.k, ctx);
	}
	ctx.restore();
}

/// Where the segment from the card centre towards `(ux, uy)` leaves the card.
fn card_exit(ux: f64, uy: f64) -> f64 {
	let (hw, hh) = (NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0);
	let tx = if ux.abs() > f64::EPSILON { hw / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > f64::EPSILON { hh / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

fn draw_edge(edge: &EdgeView, ctx: &CanvasRenderingContext2d) {
	let (x1, y1, x2, y2) = (edge.from.x, edge.from.y, edge.to.x, edge.to.y);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let exit = card_exit(ux, uy);
	if dist < 2.0 * exit + ARROW_SIZE {
		return;
	}

	let style = edge_style(edge.kind, edge.cross_namespace, edge.highlighted);
	ctx.set_stroke_style_str(style.color);
	ctx.set_line_width(style.width);
	let dashes = match style.dash {
		Some((dash, gap)) => js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&dashes);

	let (tip_x, tip_y) = (x2 - ux * exit, y2 - uy * exit);
	ctx.begin_path();
	ctx.move_to(x1 + ux * exit, y1 + uy * exit);
	ctx.line_to(tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	ctx.stroke();

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_fill_style_str(style.color);
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_node(node: &NodeView, k: f64, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.position.x - NODE_WIDTH / 2.0, node.position.y - NODE_HEIGHT / 2.0);

	ctx.set_fill_style_str("#24243e");
	ctx.fill_rect(x, y, NODE_WIDTH, NODE_HEIGHT);
	ctx.set_fill_style_str(namespace_color(node.namespace_index));
	ctx.fill_rect(x, y, NODE_WIDTH, 6.0);

	ctx.set_stroke_style_str(if node.selected {
		"white"
	} else {
		"rgba(255, 255, 255, 0.25)"
	});
	ctx.set_line_width(if node.selected { 2.5 / k.min(1.0) } else { 1.0 });
	ctx.stroke_rect(x, y, NODE_WIDTH, NODE_HEIGHT);

	ctx.set_fill_style_str("white");
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text_with_max_width(&node.name, x + 8.0, y + 23.0, NODE_WIDTH - 16.0);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_font("10px sans-serif");
	let _ = ctx.fill_text_with_max_width(&node.namespace, x + 8.0, y + 37.0, NODE_WIDTH - 16.0);
}
