//! `roadmap-graph edges` command implementation.

use std::path::Path;

use colored::Colorize;

use super::Context;
use super::display::{format_lag, node_label};

/// Run the edges command.
pub fn run(ctx: &Context, input: &Path) -> roadmap_graph::Result<()> {
    let snapshot = ctx.load_snapshot(input)?;

    if snapshot.edges().is_empty() {
        println!("{}", "No dependencies inferred.".green());
        return Ok(());
    }

    let violated = snapshot.edges().iter().filter(|e| !e.satisfied).count();
    println!(
        "Inferred {} dependencies across {} nodes:",
        snapshot.edges().len().to_string().bold(),
        snapshot.len()
    );
    println!();

    for edge in snapshot.edges() {
        let status = if edge.satisfied {
            "satisfied".green()
        } else {
            "violated".red().bold()
        };
        println!(
            "  {} {} {}  {}  {}",
            node_label(&snapshot, &edge.source_id),
            "→".dimmed(),
            node_label(&snapshot, &edge.target_id),
            format_lag(edge.lag_days).dimmed(),
            status
        );
    }

    if violated > 0 {
        println!();
        println!(
            "{} {} dependencies start before their predecessor ends",
            "warning:".yellow().bold(),
            violated
        );
    }

    Ok(())
}
