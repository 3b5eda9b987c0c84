use std::borrow::Cow;
use std::collections::HashSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::model::{Arena, GraphNode};
use super::state::GraphViewState;

const BACKGROUND: &str = "#12131c";
const GLOW_EXTRA: f64 = 6.0;
const LABEL_MAX_CHARS: usize = 28;
const LABEL_KEEP_CHARS: usize = 26;
const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_LINE_HEIGHT: f64 = 14.0;
const TOOLTIP_MAX_TAGS: usize = 3;

/// How strongly a node is drawn, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	Selected,
	Hovered,
	/// One hop from the hovered or selected node.
	Linked,
	Plain,
	/// Something else is active and this node is unrelated to it.
	Dimmed,
}

struct NodeStyle {
	stroke: &'static str,
	stroke_width: f64,
	alpha: f64,
	glow: Option<&'static str>,
}

impl Emphasis {
	fn style(self) -> NodeStyle {
		match self {
			Emphasis::Selected => NodeStyle {
				stroke: "#ffffff",
				stroke_width: 2.5,
				alpha: 1.0,
				glow: Some("rgba(255, 255, 255, 0.35)"),
			},
			Emphasis::Hovered => NodeStyle {
				stroke: "#dfe6ff",
				stroke_width: 2.0,
				alpha: 1.0,
				glow: Some("rgba(200, 220, 255, 0.3)"),
			},
			Emphasis::Linked => NodeStyle {
				stroke: "rgba(255, 255, 255, 0.6)",
				stroke_width: 1.5,
				alpha: 1.0,
				glow: None,
			},
			Emphasis::Plain => NodeStyle {
				stroke: "rgba(0, 0, 0, 0.45)",
				stroke_width: 1.0,
				alpha: 0.9,
				glow: None,
			},
			Emphasis::Dimmed => NodeStyle {
				stroke: "rgba(0, 0, 0, 0.45)",
				stroke_width: 1.0,
				alpha: 0.25,
				glow: None,
			},
		}
	}
}

/// Indices of the active node and its one-hop neighbours, whichever side of
/// the link the active node is on.
pub fn highlight_set(arena: &Arena, active: Option<&str>) -> HashSet<usize> {
	let mut set = HashSet::new();
	let Some((id, idx)) = active.and_then(|id| Some((id, arena.index_of(id)?))) else {
		return set;
	};
	set.insert(idx);
	set.extend(
		arena.nodes[idx]
			.linked_node_ids
			.iter()
			.filter_map(|linked| arena.index_of(linked)),
	);
	set.extend(
		arena
			.edges
			.iter()
			.filter(|edge| edge.target == id)
			.filter_map(|edge| arena.index_of(&edge.source)),
	);
	set
}

pub fn node_emphasis(
	node: &GraphNode,
	idx: usize,
	hovered: Option<&str>,
	selected: Option<&str>,
	highlight: &HashSet<usize>,
) -> Emphasis {
	if selected == Some(node.id.as_str()) {
		Emphasis::Selected
	} else if hovered == Some(node.id.as_str()) {
		Emphasis::Hovered
	} else if highlight.contains(&idx) {
		Emphasis::Linked
	} else if highlight.is_empty() {
		Emphasis::Plain
	} else {
		Emphasis::Dimmed
	}
}

/// Labels of unrelated nodes are hidden while something is active.
pub fn label_visible(emphasis: Emphasis) -> bool {
	emphasis != Emphasis::Dimmed
}

pub fn truncate_label(title: &str) -> Cow<'_, str> {
	if title.chars().count() > LABEL_MAX_CHARS {
		let kept: String = title.chars().take(LABEL_KEEP_CHARS).collect();
		Cow::Owned(format!("{kept}…"))
	} else {
		Cow::Borrowed(title)
	}
}

/// Uppercased type on the first line, then at most three tags.
pub fn tooltip_lines(node: &GraphNode) -> Vec<String> {
	let mut lines = vec![node.node_type.label().to_uppercase()];
	if !node.tags.is_empty() {
		lines.push(
			node.tags
				.iter()
				.take(TOOLTIP_MAX_TAGS)
				.map(|tag| format!("#{tag}"))
				.collect::<Vec<_>>()
				.join(" "),
		);
	}
	lines
}

/// Draws one frame: background, edges, nodes, labels and the hover tooltip.
pub fn render(ctx: &CanvasRenderingContext2d, state: &GraphViewState, selected: Option<&str>) {
	let (width, height, zoom) = (
		state.viewport.width,
		state.viewport.height,
		state.camera.zoom(),
	);

	// Everything below is in CSS pixels; the dpr scale maps onto the backing buffer.
	let _ = ctx.set_transform(state.dpr, 0.0, 0.0, state.dpr, 0.0, 0.0);
	ctx.clear_rect(0.0, 0.0, width, height);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);

	let hovered = state.hovered_id();
	let highlight = highlight_set(&state.arena, hovered.or(selected));

	ctx.save();
	let _ = ctx.translate(width / 2.0 + state.camera.x, height / 2.0 + state.camera.y);
	let _ = ctx.scale(zoom, zoom);
	draw_edges(ctx, &state.arena, &highlight, zoom);
	draw_nodes(ctx, &state.arena, &highlight, hovered, selected, zoom);
	ctx.restore();

	if let Some(node) = hovered.and_then(|id| state.arena.node(id)) {
		draw_tooltip(ctx, state, node);
	}
}

fn draw_edges(
	ctx: &CanvasRenderingContext2d,
	arena: &Arena,
	highlight: &HashSet<usize>,
	zoom: f64,
) {
	let has_highlight = !highlight.is_empty();
	for &(src, tgt) in arena.links() {
		let (a, b) = (&arena.nodes[src], &arena.nodes[tgt]);
		let emphasized = highlight.contains(&src) && highlight.contains(&tgt);
		let (color, width) = if emphasized {
			("rgba(170, 200, 255, 0.9)", 2.0)
		} else if has_highlight {
			("rgba(120, 130, 170, 0.12)", 1.0)
		} else {
			("rgba(120, 130, 170, 0.45)", 1.0)
		};
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width / zoom);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(
	ctx: &CanvasRenderingContext2d,
	arena: &Arena,
	highlight: &HashSet<usize>,
	hovered: Option<&str>,
	selected: Option<&str>,
	zoom: f64,
) {
	let font_size = 11.0 / zoom.max(0.5);
	ctx.set_font(&format!("{font_size}px sans-serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");

	for (idx, node) in arena.nodes.iter().enumerate() {
		let emphasis = node_emphasis(node, idx, hovered, selected, highlight);
		let style = emphasis.style();
		ctx.set_global_alpha(style.alpha);

		if let Some(glow) = style.glow {
			let halo = node.radius + GLOW_EXTRA;
			if let Ok(gradient) =
				ctx.create_radial_gradient(node.x, node.y, node.radius * 0.5, node.x, node.y, halo)
			{
				let _ = gradient.add_color_stop(0.0, glow);
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(node.x, node.y, halo, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.node_type.color());
		ctx.fill();
		ctx.set_stroke_style_str(style.stroke);
		ctx.set_line_width(style.stroke_width / zoom);
		ctx.stroke();

		if label_visible(emphasis) {
			let label = truncate_label(&node.title);
			let label_y = node.y + node.radius + 4.0 / zoom;
			ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
			let _ = ctx.fill_text(&label, node.x + 1.0 / zoom, label_y + 1.0 / zoom);
			ctx.set_fill_style_str("rgba(230, 233, 245, 0.95)");
			let _ = ctx.fill_text(&label, node.x, label_y);
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, state: &GraphViewState, node: &GraphNode) {
	let lines = tooltip_lines(node);
	ctx.set_font("11px sans-serif");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");

	let text_width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|metrics| metrics.width())
		.fold(0.0, f64::max);
	let box_width = text_width + TOOLTIP_PADDING * 2.0;
	let box_height = lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING * 2.0;

	let (sx, sy) = state
		.camera
		.world_to_screen(state.viewport, node.x, node.y);
	let left = sx - box_width / 2.0;
	let top = sy - node.radius * state.camera.zoom() - 8.0 - box_height;

	ctx.set_fill_style_str("rgba(22, 24, 38, 0.92)");
	ctx.fill_rect(left, top, box_width, box_height);
	ctx.set_stroke_style_str("rgba(170, 200, 255, 0.5)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(left, top, box_width, box_height);

	for (i, line) in lines.iter().enumerate() {
		let color = if i == 0 {
			node.node_type.color()
		} else {
			"rgba(230, 233, 245, 0.9)"
		};
		ctx.set_fill_style_str(color);
		let _ = ctx.fill_text(
			line,
			left + TOOLTIP_PADDING,
			top + TOOLTIP_PADDING + i as f64 * TOOLTIP_LINE_HEIGHT,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::model::build;
	use crate::components::knowledge_graph::types::{KnowledgeNode, NodeType};

	fn node(id: &str, links: &[&str]) -> KnowledgeNode {
		KnowledgeNode {
			id: id.into(),
			title: id.into(),
			linked_node_ids: links.iter().map(|l| l.to_string()).collect(),
			..Default::default()
		}
	}

	fn arena() -> Arena {
		build(
			&[
				node("hub", &["a", "b", "missing"]),
				node("a", &[]),
				node("b", &["c"]),
				node("c", &[]),
			],
			None,
			|| 0.5,
		)
	}

	#[test]
	fn highlight_covers_active_and_its_links() {
		let arena = arena();
		let set = highlight_set(&arena, Some("hub"));
		assert_eq!(set, HashSet::from([0, 1, 2]));
		assert!(highlight_set(&arena, None).is_empty());
		assert!(highlight_set(&arena, Some("nope")).is_empty());
	}

	#[test]
	fn emphasis_ranks_selected_over_hovered() {
		let arena = arena();
		let highlight = highlight_set(&arena, Some("hub"));
		let rank = |idx: usize| {
			node_emphasis(
				&arena.nodes[idx],
				idx,
				Some("hub"),
				Some("hub"),
				&highlight,
			)
		};
		assert_eq!(rank(0), Emphasis::Selected);
		assert_eq!(rank(1), Emphasis::Linked);
		assert_eq!(rank(3), Emphasis::Dimmed);
	}

	#[test]
	fn highlight_follows_links_pointing_at_the_active_node() {
		let arena = arena();
		// Only "b" lists "c", yet hovering "c" lights up "b" and their edge.
		let set = highlight_set(&arena, Some("c"));
		assert_eq!(set, HashSet::from([2, 3]));
		let edge = arena.links().iter().find(|&&(s, t)| {
			arena.nodes[s].id == "b" && arena.nodes[t].id == "c"
		});
		let &(src, tgt) = edge.unwrap();
		assert!(set.contains(&src) && set.contains(&tgt));

		// "b" has the outgoing link to "c" and the incoming one from "hub".
		assert_eq!(highlight_set(&arena, Some("b")), HashSet::from([0, 2, 3]));
	}

	#[test]
	fn selected_keeps_its_label_while_hovering_elsewhere() {
		let arena = arena();
		let highlight = highlight_set(&arena, Some("c"));
		let emphasis = |idx: usize| {
			node_emphasis(&arena.nodes[idx], idx, Some("c"), Some("a"), &highlight)
		};
		assert_eq!(emphasis(1), Emphasis::Selected);
		assert_eq!(emphasis(3), Emphasis::Hovered);
		assert_eq!(emphasis(2), Emphasis::Linked);
		assert_eq!(emphasis(0), Emphasis::Dimmed);
		assert!(label_visible(emphasis(1)));
		assert!(!label_visible(emphasis(0)));
	}

	#[test]
	fn nothing_active_means_plain_and_labelled() {
		let arena = arena();
		let highlight = highlight_set(&arena, None);
		for (idx, n) in arena.nodes.iter().enumerate() {
			let e = node_emphasis(n, idx, None, None, &highlight);
			assert_eq!(e, Emphasis::Plain);
			assert!(label_visible(e));
		}
	}

	#[test]
	fn long_titles_are_truncated() {
		let exact = "a".repeat(28);
		assert_eq!(truncate_label(&exact), exact.as_str());
		let long = "b".repeat(29);
		let cut = truncate_label(&long);
		assert_eq!(cut.chars().count(), 27);
		assert!(cut.ends_with('…'));
		let wide = "é".repeat(40);
		assert_eq!(truncate_label(&wide).chars().count(), 27);
	}

	#[test]
	fn tooltip_shows_type_and_three_tags() {
		let mut input = node("t", &[]);
		input.node_type = NodeType::MapOfContent;
		input.tags = ["rust", "graphs", "layout", "extra"]
			.iter()
			.map(|t| t.to_string())
			.collect();
		let arena = build(&[input], None, || 0.5);
		assert_eq!(
			tooltip_lines(&arena.nodes[0]),
			vec!["MOC".to_string(), "#rust #graphs #layout".to_string()]
		);

		let bare = build(&[node("u", &[])], None, || 0.5);
		assert_eq!(tooltip_lines(&bare.nodes[0]), vec!["CONCEPT".to_string()]);
	}
}
