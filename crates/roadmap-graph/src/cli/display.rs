//! Common display utilities for CLI commands.

use colored::Colorize;
use roadmap_graph::{GraphSnapshot, NodeKind, RenderFrame, Selection};

/// `name (id)`, or just the id when the node is unknown or unnamed.
pub fn node_label(snapshot: &GraphSnapshot, id: &str) -> String {
    match snapshot.node(id) {
        Some(node) if !node.name.is_empty() && node.name != id => {
            format!("{} ({})", node.name.white().bold(), id.dimmed())
        }
        _ => id.white().bold().to_string(),
    }
}

/// Signed lag, e.g. `+29d` or `-3d`.
pub fn format_lag(lag_days: i64) -> String {
    format!("{lag_days:+}d")
}

/// Print a positioned frame as a table.
///
/// Selected nodes are marked with `▶`; nodes on a highlighted critical path
/// are drawn in yellow.
pub fn print_frame(frame: &RenderFrame) {
    if frame.nodes.is_empty() {
        println!("{}", "Nothing to lay out.".dimmed());
        return;
    }

    println!(
        "{} layout on {}×{} canvas, {} nodes, {} edges",
        frame.strategy.to_string().bold(),
        frame.dimensions.width,
        frame.dimensions.height,
        frame.nodes.len(),
        frame.edges.len()
    );
    println!();

    let id_width = frame
        .nodes
        .iter()
        .map(|n| n.node.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    println!(
        "    {}",
        format!("{:<id_width$}  {:>9}  {:>9}  {:>6}  kind", "id", "x", "y", "radius").dimmed()
    );
    for render in &frame.nodes {
        let marker = if render.selected { "▶" } else { " " };
        let id = format!("{:<id_width$}", render.node.id);
        let id = if render.critical {
            id.yellow().bold()
        } else {
            id.normal()
        };
        let kind = match render.node.kind {
            NodeKind::Initiative => render.node.kind.to_string().cyan(),
            NodeKind::System => render.node.kind.to_string().magenta(),
        };
        println!(
            "  {} {}  {:>9.1}  {:>9.1}  {:>6.1}  {}",
            marker.green().bold(),
            id,
            render.node.position.x,
            render.node.position.y,
            render.radius,
            kind
        );
    }

    if !frame.critical_path.is_empty() {
        println!();
        println!(
            "  {} {}",
            "critical path:".yellow(),
            frame.critical_path.join(" → ")
        );
    }
    if let Selection::Selected(id) = &frame.selection {
        println!("  {} {id}", "selected:".green());
    }
}
