//! `roadmap-graph critical-path` command implementation.

use std::path::Path;

use colored::Colorize;
use roadmap_graph::CriticalPathAnalyzer;

use super::Context;
use super::display::node_label;

/// Run the critical-path command.
pub fn run(ctx: &Context, input: &Path) -> roadmap_graph::Result<()> {
    let snapshot = ctx.load_snapshot(input)?;
    let path = CriticalPathAnalyzer::new(true, ctx.config.critical_path).analyze(&snapshot);

    if path.is_empty() {
        println!("{}", "No critical path: no two nodes are linked.".dimmed());
        return Ok(());
    }

    println!(
        "Critical path ({} nodes):",
        path.len().to_string().yellow().bold()
    );
    println!();

    let arrow = format!(" {} ", "→".dimmed());
    let chain = path
        .chain()
        .iter()
        .map(|id| node_label(&snapshot, id))
        .collect::<Vec<_>>()
        .join(arrow.as_str());
    println!("  {chain}");

    let total_lag: i64 = snapshot
        .edges()
        .iter()
        .filter(|e| {
            path.chain()
                .windows(2)
                .any(|pair| pair[0] == e.source_id && pair[1] == e.target_id)
        })
        .map(|e| e.lag_days)
        .sum();
    println!();
    println!("  {} total lag {total_lag:+} days", "•".dimmed());

    Ok(())
}
