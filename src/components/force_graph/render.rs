use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, lane_segment};
use crate::graph::{GraphSession, NodeRender, VisibilityResolver};

/// Labels are only drawn once zoomed in this far, unless highlighted.
const LABEL_ZOOM: f64 = 0.8;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, session: &GraphSession, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = state.positions();
	let resolver = session.resolver();
	draw_edges(state, session, &resolver, &positions, ctx);
	draw_nodes(state, session, &resolver, &positions, ctx);
	ctx.restore();
}

fn radius(style: &NodeRender) -> f64 {
	style.size / 2.0
}

fn draw_edges(
	state: &ForceGraphState,
	session: &GraphSession,
	resolver: &VisibilityResolver<'_>,
	positions: &[(f64, f64)],
	ctx: &CanvasRenderingContext2d,
) {
	let graph = session.graph();
	let traversal = session.traversal();
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for (slot, (edge, lane)) in graph.edges().iter().zip(state.lanes()).enumerate() {
		let hovered = state.hover.edge == Some(slot);
		let style = resolver.edge_style(edge, hovered);
		if style.hidden {
			continue;
		}
		let ((x1, y1), (x2, y2)) = lane_segment(lane, positions);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let source_radius = radius(&resolver.node_style(&graph.nodes()[lane.source]));
		let target_radius = radius(&resolver.node_style(&graph.nodes()[lane.target]));

		// While a node is hovered its edges brighten and the rest fade.
		let fade = if !has_highlight || hovered {
			1.0
		} else if state.is_highlighted(lane.source) && state.is_highlighted(lane.target) {
			1.0 + 0.3 * t
		} else {
			1.0 - 0.75 * t
		};
		ctx.set_global_alpha(fade.min(1.0));
		ctx.set_stroke_style_str(&style.color);
		ctx.set_line_width(style.width / k.max(0.5));

		if traversal.reveals_edge(&edge.id) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * source_radius, y1 + uy * source_radius);
		ctx.line_to(
			x2 - ux * (target_radius + arrow_size),
			y2 - uy * (target_radius + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&style.color);
		let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if hovered {
			ctx.set_fill_style_str("rgba(226, 232, 240, 0.9)");
			ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
			let _ = ctx.fill_text(&edge.relationship_type, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 4.0 / k);
		}
	}
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(
	state: &ForceGraphState,
	session: &GraphSession,
	resolver: &VisibilityResolver<'_>,
	positions: &[(f64, f64)],
	ctx: &CanvasRenderingContext2d,
) {
	let graph = session.graph();
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	// Dimmed pass first so highlighted nodes land on top.
	for (slot, node) in graph.nodes().iter().enumerate() {
		if has_highlight && state.is_highlighted(slot) {
			continue;
		}
		let style = resolver.node_style(node);
		if style.hidden {
			continue;
		}
		let (x, y) = positions[slot];
		let (alpha, r) = if has_highlight {
			(1.0 - 0.7 * t, radius(&style) * (1.0 - 0.15 * t))
		} else {
			(1.0, radius(&style))
		};

		ctx.set_global_alpha(alpha);
		fill_node(ctx, x, y, r, &style, k);
		ctx.set_global_alpha(1.0);

		if k >= LABEL_ZOOM || style.border.is_some() {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(&node.label, x + r + 3.0, y + 3.0);
		}
	}

	if !has_highlight {
		return;
	}

	for (slot, node) in graph.nodes().iter().enumerate() {
		if !state.is_highlighted(slot) {
			continue;
		}
		let style = resolver.node_style(node);
		if style.hidden {
			continue;
		}
		let (x, y) = positions[slot];
		let is_hovered = state.is_hovered(slot);
		let is_neighbor =
			state.hover.neighbors.contains(&slot) || state.hover.prev_neighbors.contains(&slot);
		let base = radius(&style);

		let (r, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
		} else {
			(base, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, r * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		fill_node(ctx, x, y, r, &style, k);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, r + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.label, x + r + 3.0, y + 3.0);
	}
}

fn fill_node(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, style: &NodeRender, k: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(style.color);
	ctx.fill();
	if let Some(border) = style.border {
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(2.5 / k.max(0.5));
		ctx.stroke();
	}
}
