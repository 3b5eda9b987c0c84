use leptos::prelude::*;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Nothing here"</h1>
			<p>"This page does not exist. " <a href="/">"Back to the graph"</a></p>
		</div>
	}
}
