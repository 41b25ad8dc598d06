use leptos::prelude::*;

use crate::components::peer_graph::{
	EdgeSnapshot, GraphConfig, GraphSnapshot, NodeSnapshot, PeerGraphCanvas, Theme,
};

const FRIENDS: &[&str] = &[
	"Ana Lima",
	"Bo Chen",
	"Cleo Martins",
	"Dev Patel",
	"Eli Okafor",
	"Farah Haddad",
];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// The signed-in user and their fasting circle. `refresh` only changes who
/// is fasting and for how long, so the layout carries over between refreshes.
fn circle_snapshot(refresh: usize) -> GraphSnapshot {
	let mut nodes = vec![NodeSnapshot::me("me", "Sam Reyes")];
	for (i, name) in FRIENDS.iter().enumerate() {
		let friend = NodeSnapshot::new(format!("friend-{i}"), *name);
		let hours = rand_simple(i * 7 + refresh * 31) * 30.0;
		nodes.push(if hours > 6.0 { friend.active(hours) } else { friend });
	}
	let edges = (0..FRIENDS.len())
		.map(|i| EdgeSnapshot::new("me", format!("friend-{i}")))
		.chain([
			EdgeSnapshot::new("friend-0", "friend-1"),
			EdgeSnapshot::new("friend-3", "friend-4"),
		])
		.collect();
	GraphSnapshot { nodes, edges }
}

/// Dashboard with the compact circle widget.
#[component]
pub fn Home() -> impl IntoView {
	let (refresh, set_refresh) = signal(0usize);
	let (theme, set_theme) = signal(Theme::Dark);
	let (opened, set_opened) = signal(None::<String>);
	let graph_data = Signal::derive(move || circle_snapshot(refresh.get()));

	let opened_name = move || {
		let id = opened.get()?;
		graph_data.with(|g| {
			g.nodes
				.iter()
				.find(|n| n.id == id)
				.map(|n| n.display_name.clone())
		})
	};

	view! {
		<div class="dashboard" class:light=move || theme.get() == Theme::Light>
			<header class="dashboard-toolbar">
				<h1>"Your fasting circle"</h1>
				<button on:click=move |_| set_refresh.update(|n| *n += 1)>"Refresh"</button>
				<button on:click=move |_| set_theme.update(|t| *t = t.toggled())>"Toggle theme"</button>
			</header>
			<div class="graph-widget" style="width: 380px; height: 380px;">
				<PeerGraphCanvas
					data=graph_data
					theme=theme
					config=GraphConfig::widget()
					on_node_activated=move |id: String| set_opened.set(Some(id))
				/>
			</div>
			<p class="subtitle">
				{move || match opened_name() {
					Some(name) => format!("Opened {name}'s profile"),
					None => "Tap a friend to open their profile.".to_owned(),
				}}
			</p>
		</div>
	}
}
