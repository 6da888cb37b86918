//! Replay of stored snapping scenes.
//!
//! Loads a scene file, feeds its pointer trace through a snapping monitor and
//! renders one line per trace step followed by per-signal totals.

use nodesnap_core::{ReplayStep, Scene, SnapResult, SnapSignal};
use std::path::Path;

/// Load the scene at `path`, replay it and render the report.
pub fn run(path: impl AsRef<Path>) -> SnapResult<String> {
    let path = path.as_ref();
    let scene = Scene::load(path)?;
    log::info!(
        "Loaded {} nodes and {} trace steps from {}",
        scene.nodes.len(),
        scene.trace.len(),
        path.display()
    );
    let steps = scene.replay()?;
    Ok(render(&steps))
}

/// Render replayed steps as text.
pub fn render(steps: &[ReplayStep]) -> String {
    let mut out = String::new();
    let mut totals = vec![0usize; SnapSignal::ALL.len()];

    for step in steps {
        let names: Vec<&str> = step.signals.iter().map(|s| s.name()).collect();
        out.push_str(&format!(
            "{:>4}  ({}, {})  {}\n",
            step.index,
            step.snapped.x,
            step.snapped.y,
            names.join(" ")
        ));
        for signal in &step.signals {
            if let Some(slot) = SnapSignal::ALL.iter().position(|s| s == signal) {
                totals[slot] += 1;
            }
        }
    }

    out.push_str("--\n");
    for (signal, count) in SnapSignal::ALL.iter().zip(totals) {
        if count > 0 {
            out.push_str(&format!("{}: {}\n", signal, count));
        }
    }
    out
}
