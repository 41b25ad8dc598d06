use leptos::prelude::*;
use log::warn;

use crate::components::peer_graph::{
	EdgeSnapshot, GraphConfig, GraphSnapshot, NodeSnapshot, PeerGraphCanvas, Theme,
};

/// Looser forces for the larger member graph.
const CONSOLE_FORCES: &str = r#"{ "forces": {
	"repulsion": 4200.0, "attraction": 0.003, "gravity": 0.0025, "damping": 0.9,
	"drift": 0.01, "drift_frequency_x": 0.7, "drift_frequency_y": 0.45,
	"margin": 40.0, "min_distance": 1.0
} }"#;

fn console_config() -> GraphConfig {
	match GraphConfig::from_json(CONSOLE_FORCES) {
		Ok(tuned) => GraphConfig::admin().with_forces(tuned.forces),
		Err(err) => {
			warn!("{err}; using default console forces");
			GraphConfig::admin()
		}
	}
}

/// Deterministic member roster: every third member is premium, and members
/// fast on a staggered schedule.
fn roster(members: usize) -> GraphSnapshot {
	let mut nodes = vec![NodeSnapshot::me("admin", "Console Admin").privileged()];
	for i in 0..members {
		let mut member = NodeSnapshot::new(format!("member-{i}"), format!("Member {}", i + 1));
		if i % 3 == 0 {
			member = member.privileged();
		}
		if i % 2 == 0 {
			member = member.active((i * 5 % 28) as f64 + 2.0);
		}
		nodes.push(member);
	}
	let edges = (0..members)
		.map(|i| {
			if i < 4 {
				EdgeSnapshot::new("admin", format!("member-{i}"))
			} else {
				EdgeSnapshot::new(format!("member-{}", i % 4), format!("member-{i}"))
			}
		})
		.collect();
	GraphSnapshot { nodes, edges }
}

/// Admin console view of the social graph: drag to rearrange, tap to inspect.
#[component]
pub fn Admin() -> impl IntoView {
	let (members, set_members) = signal(9usize);
	let (theme, set_theme) = signal(Theme::Dark);
	let (inspected, set_inspected) = signal(None::<String>);
	let graph_data = Signal::derive(move || roster(members.get()));

	view! {
		<div class="fullscreen-graph">
			<PeerGraphCanvas
				data=graph_data
				theme=theme
				config=console_config()
				on_node_activated=move |id: String| set_inspected.set(Some(id))
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Member graph"</h1>
				<p class="subtitle">"Drag members to rearrange. Tap to inspect."</p>
				<button on:click=move |_| set_members.update(|n| *n += 1)>"Add member"</button>
				<button on:click=move |_| set_members.update(|n| *n = n.saturating_sub(1))>
					"Remove member"
				</button>
				<button on:click=move |_| set_theme.update(|t| *t = t.toggled())>"Toggle theme"</button>
				<p>{move || inspected.get().map(|id| format!("Inspecting {id}")).unwrap_or_default()}</p>
			</div>
		</div>
	}
}
