use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::AttributedGraph;

pub const HIT_RADIUS: f64 = 12.0;
pub const EDGE_HIT_RADIUS: f64 = 4.0;
/// Spacing between parallel edges drawn for the same node pair.
pub const LANE_SPACING: f64 = 6.0;

/// Links a simulation node back to its slot in the attributed graph.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub slot: usize,
}

/// One attributed edge as the canvas draws it.
#[derive(Clone, Copy, Debug)]
pub struct EdgeLane {
	pub source: usize,
	pub target: usize,
	/// Signed offset index among parallel edges of the same pair.
	pub lane: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub edge: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// Everything the canvas needs between frames. Node and edge references are
/// slots into the session's [`AttributedGraph`].
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	/// Session revision this simulation was built from.
	pub revision: u64,
	indices: Vec<DefaultNodeIdx>,
	lanes: Vec<EdgeLane>,
}

impl ForceGraphState {
	pub fn new(source: &AttributedGraph, revision: u64, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let indices: Vec<DefaultNodeIdx> = source
			.nodes()
			.iter()
			.enumerate()
			.map(|(slot, node)| {
				graph.add_node(NodeData {
					x: node.position.x as f32,
					y: node.position.y as f32,
					mass: 10.0,
					is_anchor: false,
					user_data: NodeInfo { slot },
				})
			})
			.collect();

		let mut pair_counts: HashMap<(usize, usize), usize> = HashMap::new();
		let mut lanes = Vec::with_capacity(source.edge_count());
		for &(src, tgt) in source.endpoint_slots() {
			let key = (src.min(tgt), src.max(tgt));
			let seen = pair_counts.entry(key).or_default();
			if *seen == 0 {
				graph.add_edge(indices[src], indices[tgt], EdgeData::default());
			}
			// 0, 1, -1, 2, -2, ... measured in the lower-slot-first frame
			let half = (*seen / 2) as f64;
			let lane = if *seen % 2 == 0 { -half } else { half + 1.0 };
			let lane = if src <= tgt { lane } else { -lane };
			*seen += 1;
			lanes.push(EdgeLane {
				source: src,
				target: tgt,
				lane,
			});
		}

		Self {
			graph,
			indices,
			lanes,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			revision,
		}
	}

	pub fn lanes(&self) -> &[EdgeLane] {
		&self.lanes
	}

	/// Current simulated position of every node, by slot.
	pub fn positions(&self) -> Vec<(f64, f64)> {
		let mut out = vec![(0.0, 0.0); self.indices.len()];
		self.graph.visit_nodes(|node| {
			if let Some(pos) = out.get_mut(node.data.user_data.slot) {
				*pos = (node.x() as f64, node.y() as f64);
			}
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost visible node under the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64, source: &AttributedGraph) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let slot = node.data.user_data.slot;
			if source.nodes().get(slot).is_none_or(|n| n.hidden) {
				return;
			}
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(slot);
			}
		});
		found
	}

	/// Closest visible edge within [`EDGE_HIT_RADIUS`] of the pointer.
	pub fn edge_at_position(&self, sx: f64, sy: f64, source: &AttributedGraph) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let mut best: Option<(usize, f64)> = None;
		for (slot, lane) in self.lanes.iter().enumerate() {
			if source.edges().get(slot).is_none_or(|e| e.hidden) {
				continue;
			}
			let ((x1, y1), (x2, y2)) = lane_segment(lane, &positions);
			let dist = distance_to_segment(gx, gy, x1, y1, x2, y2);
			if dist < EDGE_HIT_RADIUS && best.is_none_or(|(_, d)| dist < d) {
				best = Some((slot, dist));
			}
		}
		best.map(|(slot, _)| slot)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(slot) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for lane in &self.lanes {
				if lane.source == slot {
					self.hover.neighbors.insert(lane.target);
				} else if lane.target == slot {
					self.hover.neighbors.insert(lane.source);
				}
			}
		}
	}

	pub fn set_hovered_edge(&mut self, edge: Option<usize>) {
		self.hover.edge = edge;
	}

	pub fn is_highlighted(&self, slot: usize) -> bool {
		self.hover.node == Some(slot)
			|| self.hover.neighbors.contains(&slot)
			|| self.hover.prev_node == Some(slot)
			|| self.hover.prev_neighbors.contains(&slot)
	}

	pub fn is_hovered(&self, slot: usize) -> bool {
		self.hover.node == Some(slot) || self.hover.prev_node == Some(slot)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn node_index(&self, slot: usize) -> Option<DefaultNodeIdx> {
		self.indices.get(slot).copied()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Segment endpoints for an edge, shifted sideways by its lane.
pub fn lane_segment(lane: &EdgeLane, positions: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
	let (x1, y1) = positions.get(lane.source).copied().unwrap_or_default();
	let (x2, y2) = positions.get(lane.target).copied().unwrap_or_default();
	if lane.lane == 0.0 {
		return ((x1, y1), (x2, y2));
	}
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt().max(0.001);
	let (ox, oy) = (-dy / dist * LANE_SPACING * lane.lane, dx / dist * LANE_SPACING * lane.lane);
	((x1 + ox, y1 + oy), (x2 + ox, y2 + oy))
}

fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < 1e-9 {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment(5.0, 3.0, 0.0, 0.0, 10.0, 0.0), 3.0);
		assert_eq!(distance_to_segment(-4.0, 3.0, 0.0, 0.0, 10.0, 0.0), 5.0);
		assert_eq!(distance_to_segment(1.0, 1.0, 1.0, 1.0, 1.0, 1.0), 0.0);
	}

	#[test]
	fn parallel_lanes_fan_out() {
		let positions = [(0.0, 0.0), (10.0, 0.0)];
		let straight = EdgeLane {
			source: 0,
			target: 1,
			lane: 0.0,
		};
		let shifted = EdgeLane { lane: 1.0, ..straight };
		assert_eq!(lane_segment(&straight, &positions), ((0.0, 0.0), (10.0, 0.0)));
		assert_eq!(
			lane_segment(&shifted, &positions),
			((0.0, LANE_SPACING), (10.0, LANE_SPACING))
		);
	}
}
