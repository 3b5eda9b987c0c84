use leptos::prelude::*;

use crate::components::knowledge_graph::{KnowledgeGraphCanvas, KnowledgeNode, NodeType};

fn note(id: &str, title: &str, node_type: NodeType, tags: &[&str], links: &[&str]) -> KnowledgeNode {
	KnowledgeNode {
		id: id.into(),
		title: title.into(),
		node_type,
		tags: tags.iter().map(|t| t.to_string()).collect(),
		linked_node_ids: links.iter().map(|l| l.to_string()).collect(),
	}
}

/// A small hand-written knowledge base. `async-book` is linked but missing on purpose.
fn sample_notes() -> Vec<KnowledgeNode> {
	use NodeType::*;
	vec![
		note(
			"rust-moc",
			"Rust",
			MapOfContent,
			&["rust", "index"],
			&["ownership", "traits", "async", "error-handling", "testing"],
		),
		note(
			"ownership",
			"Ownership and borrowing",
			Concept,
			&["rust", "memory"],
			&["lifetimes", "rust-moc"],
		),
		note("lifetimes", "Lifetimes", Concept, &["rust"], &["ownership"]),
		note(
			"traits",
			"Traits and generics",
			Concept,
			&["rust", "types"],
			&["trait-objects"],
		),
		note(
			"trait-objects",
			"Prefer enums over trait objects for closed sets of variants",
			Claim,
			&["rust", "design"],
			&["traits"],
		),
		note(
			"async",
			"Async runtimes",
			Concept,
			&["rust", "concurrency"],
			&["async-book", "cancellation"],
		),
		note(
			"cancellation",
			"Cancel work by dropping its future",
			Technique,
			&["async"],
			&["async"],
		),
		note(
			"error-handling",
			"Error handling with Result",
			Concept,
			&["rust", "errors"],
			&["thiserror-howto"],
		),
		note(
			"thiserror-howto",
			"Define library errors",
			Procedure,
			&["errors", "howto"],
			&["error-handling"],
		),
		note(
			"testing",
			"Unit tests next to the code",
			Technique,
			&["rust", "testing"],
			&["proptest"],
		),
		note(
			"proptest",
			"Property-based testing",
			Reference,
			&["testing", "crate"],
			&[],
		),
		note(
			"graphs-moc",
			"Graph layout",
			MapOfContent,
			&["graphs", "index"],
			&["force-directed", "barnes-hut", "rust-moc"],
		),
		note(
			"force-directed",
			"Force-directed layout",
			Concept,
			&["graphs", "physics", "layout"],
			&["barnes-hut", "cooling"],
		),
		note(
			"barnes-hut",
			"Barnes–Hut approximation",
			Reference,
			&["graphs", "physics"],
			&["force-directed"],
		),
		note(
			"cooling",
			"Cool the simulation so the layout settles",
			Claim,
			&["physics"],
			&["force-directed"],
		),
	]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (notes, set_notes) = signal(sample_notes());
	let (selected, set_selected) = signal(None::<String>);
	let on_node_click = Callback::new(move |id: String| set_selected.set(Some(id)));

	let add_note = move |_: leptos::ev::MouseEvent| {
		set_notes.update(|notes| {
			let n = notes.len();
			let anchor = selected
				.get_untracked()
				.or_else(|| notes.first().map(|first| first.id.clone()));
			let links: Vec<&str> = anchor.as_deref().into_iter().collect();
			notes.push(note(
				&format!("note-{n}"),
				&format!("Untitled note {n}"),
				NodeType::Claim,
				&["draft"],
				&links,
			));
		});
	};

	let details = move || {
		let id = selected.get()?;
		let found = notes.with(|notes| notes.iter().find(|n| n.id == id).cloned())?;
		let known = notes.with(|notes| {
			found
				.linked_node_ids
				.iter()
				.map(|link| notes.iter().any(|n| &n.id == link))
				.collect::<Vec<_>>()
		});
		Some(view! {
			<h2>{found.title.clone()}</h2>
			<p class="node-type">{found.node_type.label()}</p>
			<p class="tags">
				{found.tags.iter().map(|tag| format!("#{tag} ")).collect::<String>()}
			</p>
			<ul class="links">
				{found
					.linked_node_ids
					.into_iter()
					.zip(known)
					.map(|(link, present)| {
						let target = link.clone();
						view! {
							<li>
								<button
									disabled=!present
									on:click=move |_| set_selected.set(Some(target.clone()))
								>
									{link}
								</button>
							</li>
						}
					})
					.collect_view()}
			</ul>
		})
	};

	view! {
		<div class="fullscreen-graph">
			<KnowledgeGraphCanvas
				nodes=notes
				selected=selected
				on_node_click=on_node_click
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">
					"Drag notes to reposition. Scroll to zoom. Drag background to pan. Click a note to open it."
				</p>
				<button on:click=add_note>"Add note"</button>
			</div>
			<aside class="node-details">
				{move || details()}
			</aside>
		</div>
	}
}
