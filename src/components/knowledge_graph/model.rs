use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use super::types::{KnowledgeNode, NodeType};

pub const BASE_RADIUS: f64 = 6.0;
const MOC_RADIUS_BONUS: f64 = 4.0;
const LINK_RADIUS_STEP: f64 = 0.6;
const LINK_RADIUS_CAP: f64 = 6.0;

const SPREAD_PER_NODE: f64 = 12.0;
const MAX_SPREAD: f64 = 300.0;
/// Full width of the random offset added to each axis of a fresh node.
const JITTER: f64 = 20.0;

/// A node in the simulation arena.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	pub node_type: NodeType,
	pub tags: Vec<String>,
	pub linked_node_ids: Vec<String>,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	/// Held under the pointer; still pushes others around but does not move itself.
	pub pinned: bool,
}

/// Undirected edge between two nodes that are both in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// Owned node/edge storage shared by simulation, input and rendering.
#[derive(Clone, Debug, Default)]
pub struct Arena {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
	/// Edges as index pairs, kept alongside `edges` for the simulation's inner loop.
	links: Vec<(usize, usize)>,
}

impl Arena {
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
		self.index_of(id).map(|idx| &mut self.nodes[idx])
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	/// Mutable nodes together with the index-pair edge list.
	pub fn nodes_and_links_mut(&mut self) -> (&mut [GraphNode], &[(usize, usize)]) {
		(&mut self.nodes, &self.links)
	}
}

/// Radius grows for hub notes and, up to a cap, with the number of links.
pub fn node_radius(node_type: NodeType, link_count: usize) -> f64 {
	let moc = if node_type == NodeType::MapOfContent {
		MOC_RADIUS_BONUS
	} else {
		0.0
	};
	BASE_RADIUS + moc + (link_count as f64 * LINK_RADIUS_STEP).min(LINK_RADIUS_CAP)
}

/// Radius of the circle fresh nodes are laid out on.
pub fn initial_spread(node_count: usize) -> f64 {
	(node_count as f64 * SPREAD_PER_NODE).min(MAX_SPREAD)
}

/// Builds a simulation arena from `nodes`.
///
/// Nodes that also exist in `previous` keep their position and velocity;
/// everything else about them is refreshed from the input. New nodes are
/// placed on a circle with a little noise drawn from `jitter`, which must
/// yield values in `[0, 1)`.
pub fn build(
	nodes: &[KnowledgeNode],
	previous: Option<&Arena>,
	mut jitter: impl FnMut() -> f64,
) -> Arena {
	let count = nodes.len();
	let spread = initial_spread(count);

	let mut index = HashMap::with_capacity(count);
	let mut graph_nodes = Vec::with_capacity(count);
	for (i, node) in nodes.iter().enumerate() {
		let carried = previous.and_then(|prev| prev.node(&node.id));
		let (x, y, vx, vy) = match carried {
			Some(prev) => (prev.x, prev.y, prev.vx, prev.vy),
			None => {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				(
					spread * angle.cos() + (jitter() - 0.5) * JITTER,
					spread * angle.sin() + (jitter() - 0.5) * JITTER,
					0.0,
					0.0,
				)
			}
		};

		index.insert(node.id.clone(), i);
		graph_nodes.push(GraphNode {
			id: node.id.clone(),
			title: node.title.clone(),
			node_type: node.node_type,
			tags: node.tags.clone(),
			linked_node_ids: node.linked_node_ids.clone(),
			x,
			y,
			vx,
			vy,
			radius: node_radius(node.node_type, node.linked_node_ids.len()),
			pinned: false,
		});
	}

	let mut seen = HashSet::new();
	let mut edges = Vec::new();
	let mut links = Vec::new();
	for (src, node) in nodes.iter().enumerate() {
		for target in &node.linked_node_ids {
			let Some(&tgt) = index.get(target) else {
				continue;
			};
			if tgt == src {
				continue;
			}
			let key = if node.id <= *target {
				(node.id.as_str(), target.as_str())
			} else {
				(target.as_str(), node.id.as_str())
			};
			if seen.insert(key) {
				edges.push(GraphEdge {
					source: node.id.clone(),
					target: target.clone(),
				});
				links.push((src, tgt));
			}
		}
	}

	Arena {
		nodes: graph_nodes,
		edges,
		index,
		links,
	}
}
