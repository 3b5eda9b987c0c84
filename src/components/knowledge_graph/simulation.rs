use super::model::Arena;
use super::params::SimulationParams;

/// Advances the layout by one step.
///
/// Forces are accumulated into velocities, scaled by `alpha`, then damped and
/// integrated. Pinned nodes contribute forces but stay where the pointer put
/// them.
pub fn tick(arena: &mut Arena, width: f64, height: f64, alpha: f64, params: &SimulationParams) {
	let (nodes, links) = arena.nodes_and_links_mut();
	let count = nodes.len();
	if count == 0 {
		return;
	}

	for i in 0..count {
		for j in (i + 1)..count {
			let (head, tail) = nodes.split_at_mut(j);
			let (a, b) = (&mut head[i], &mut tail[0]);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let mut dist_sq = dx * dx + dy * dy;
			let (ux, uy) = if dist_sq > 0.0 {
				let dist = dist_sq.sqrt();
				(dx / dist, dy / dist)
			} else {
				dist_sq = 1.0;
				(1.0, 0.0)
			};
			let force = params.repulsion * alpha / dist_sq;
			a.vx -= ux * force;
			a.vy -= uy * force;
			b.vx += ux * force;
			b.vy += uy * force;
		}
	}

	for &(src, tgt) in links {
		let (sx, sy) = (nodes[src].x, nodes[src].y);
		let (tx, ty) = (nodes[tgt].x, nodes[tgt].y);
		let (dx, dy) = (tx - sx, ty - sy);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < f64::EPSILON {
			continue;
		}
		let force = (dist - params.spring_length) * params.spring_strength * alpha;
		let (fx, fy) = (dx / dist * force, dy / dist * force);
		nodes[src].vx += fx;
		nodes[src].vy += fy;
		nodes[tgt].vx -= fx;
		nodes[tgt].vy -= fy;
	}

	let bound_x = (width / 2.0 - params.boundary_padding).max(0.0);
	let bound_y = (height / 2.0 - params.boundary_padding).max(0.0);

	for node in nodes.iter_mut() {
		node.vx -= node.x * params.center_strength * alpha;
		node.vy -= node.y * params.center_strength * alpha;

		if node.pinned {
			node.vx = 0.0;
			node.vy = 0.0;
			continue;
		}

		node.vx *= params.damping;
		node.vy *= params.damping;
		node.x += node.vx;
		node.y += node.vy;

		node.vx -= overshoot(node.x, bound_x) * params.boundary_strength;
		node.vy -= overshoot(node.y, bound_y) * params.boundary_strength;
	}
}

/// Signed distance past `[-bound, bound]`, zero inside.
fn overshoot(value: f64, bound: f64) -> f64 {
	if value > bound {
		value - bound
	} else if value < -bound {
		value + bound
	} else {
		0.0
	}
}

/// Whether the layout still has energy left to spend.
pub fn is_active(alpha: f64, params: &SimulationParams) -> bool {
	alpha >= params.alpha_min
}

/// Alpha after one performed tick.
pub fn decay(alpha: f64, params: &SimulationParams) -> f64 {
	alpha * params.alpha_decay
}

/// Runs a tick if the layout is not settled and returns the next alpha.
pub fn step(
	arena: &mut Arena,
	width: f64,
	height: f64,
	alpha: f64,
	params: &SimulationParams,
) -> f64 {
	if !is_active(alpha, params) {
		return alpha;
	}
	tick(arena, width, height, alpha, params);
	decay(alpha, params)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::model::build;
	use crate::components::knowledge_graph::types::KnowledgeNode;

	fn node(id: &str, links: &[&str]) -> KnowledgeNode {
		KnowledgeNode {
			id: id.into(),
			title: id.into(),
			linked_node_ids: links.iter().map(|l| l.to_string()).collect(),
			..Default::default()
		}
	}

	fn place(arena: &mut Arena, id: &str, x: f64, y: f64) {
		let n = arena.node_mut(id).unwrap();
		n.x = x;
		n.y = y;
		n.vx = 0.0;
		n.vy = 0.0;
	}

	#[test]
	fn alpha_decays_geometrically() {
		let params = SimulationParams::default();
		let mut alpha = 0.5;
		for _ in 0..100 {
			alpha = decay(alpha, &params);
		}
		assert!((alpha - 0.5 * 0.995_f64.powi(100)).abs() < 1e-12);
		assert!((alpha - 0.303).abs() < 1e-3);
	}

	#[test]
	fn ticking_stops_once_settled() {
		let params = SimulationParams::default();
		let mut arena = build(&[node("a", &[]), node("b", &[])], None, || 0.5);

		for (start, expected) in [(1.0, 1379), (0.5, 1240)] {
			let mut alpha = start;
			let mut ticks = 0;
			while is_active(alpha, &params) {
				alpha = step(&mut arena, 800.0, 500.0, alpha, &params);
				ticks += 1;
			}
			assert_eq!(ticks, expected);
			assert!(alpha < params.alpha_min);
			assert!(alpha > 0.0);

			let frozen: Vec<_> = arena.nodes.iter().map(|n| (n.x, n.y)).collect();
			assert_eq!(step(&mut arena, 800.0, 500.0, alpha, &params), alpha);
			let after: Vec<_> = arena.nodes.iter().map(|n| (n.x, n.y)).collect();
			assert_eq!(frozen, after);
		}
	}

	#[test]
	fn close_nodes_push_apart() {
		let params = SimulationParams::default();
		let mut arena = build(&[node("a", &[]), node("b", &[])], None, || 0.5);
		place(&mut arena, "a", -5.0, 0.0);
		place(&mut arena, "b", 5.0, 0.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		assert!(arena.node("a").unwrap().x < -5.0);
		assert!(arena.node("b").unwrap().x > 5.0);
	}

	#[test]
	fn coincident_nodes_still_separate() {
		let params = SimulationParams::default();
		let mut arena = build(&[node("a", &[]), node("b", &[])], None, || 0.5);
		place(&mut arena, "a", 0.0, 0.0);
		place(&mut arena, "b", 0.0, 0.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		let (a, b) = (arena.node("a").unwrap(), arena.node("b").unwrap());
		assert!(a.x.is_finite() && b.x.is_finite());
		assert!(b.x > a.x);
	}

	#[test]
	fn stretched_edge_pulls_endpoints_together() {
		let params = SimulationParams {
			repulsion: 0.0,
			center_strength: 0.0,
			..Default::default()
		};
		let mut arena = build(&[node("a", &["b"]), node("b", &[])], None, || 0.5);
		place(&mut arena, "a", -150.0, 0.0);
		place(&mut arena, "b", 150.0, 0.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		let gap = arena.node("b").unwrap().x - arena.node("a").unwrap().x;
		assert!(gap < 300.0);
		assert!(gap > params.spring_length);
	}

	#[test]
	fn lone_node_drifts_back_toward_origin() {
		let params = SimulationParams::default();
		let mut arena = build(&[node("a", &[])], None, || 0.5);
		place(&mut arena, "a", 100.0, -80.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		let a = arena.node("a").unwrap();
		assert!(a.x < 100.0);
		assert!(a.y > -80.0);
	}

	#[test]
	fn boundary_is_soft() {
		let params = SimulationParams {
			repulsion: 0.0,
			center_strength: 0.0,
			..Default::default()
		};
		let mut arena = build(&[node("a", &[])], None, || 0.5);
		place(&mut arena, "a", 500.0, 0.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		let a = arena.node("a").unwrap();
		// Still outside after the step, but being steered back in.
		assert_eq!(a.x, 500.0);
		assert!(a.vx < 0.0);
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		assert!(arena.node("a").unwrap().x < 500.0);
	}

	#[test]
	fn pinned_nodes_hold_position_but_still_repel() {
		let params = SimulationParams::default();
		let mut arena = build(&[node("a", &[]), node("b", &[])], None, || 0.5);
		place(&mut arena, "a", 0.0, 0.0);
		place(&mut arena, "b", 10.0, 0.0);
		arena.node_mut("a").unwrap().pinned = true;
		tick(&mut arena, 800.0, 500.0, 1.0, &params);
		let a = arena.node("a").unwrap();
		assert_eq!((a.x, a.y, a.vx, a.vy), (0.0, 0.0, 0.0, 0.0));
		assert!(arena.node("b").unwrap().x > 10.0);
	}
}
