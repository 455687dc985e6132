//! `roadmap-graph layout` command implementation.

use std::path::Path;

use roadmap_graph::{Dimensions, GraphView, InputEvent, LayoutStrategy};

use super::Context;
use super::display::print_frame;

/// Options for the layout command
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Strategy to position nodes with
    pub strategy: LayoutStrategy,
    /// Canvas size
    pub dimensions: Dimensions,
    /// Highlight the critical path
    pub critical_path: bool,
    /// Emit the render frame as JSON instead of a table
    pub json: bool,
    /// Node to mark as selected
    pub select: Option<String>,
}

/// Run the layout command.
pub fn run(ctx: &Context, input: &Path, options: &LayoutOptions) -> roadmap_graph::Result<()> {
    let document = ctx.load_document(input)?;

    let mut view = GraphView::new(ctx.config.clone());
    view.set_dimensions(options.dimensions);
    view.set_strategy(options.strategy);
    view.set_highlight_critical_path(options.critical_path);
    view.set_inputs(document.initiatives, document.systems, ctx.filter);

    if let Some(id) = &options.select {
        if view.snapshot().contains(id) {
            view.handle_event(InputEvent::NodeClick { id: id.clone() });
        } else {
            tracing::warn!(id = %id, "Cannot select unknown node");
        }
    }

    let ticks = view.run_to_convergence();
    if ticks > 0 {
        tracing::info!(ticks, "Force layout settled");
    }

    let frame = view.frame();
    view.teardown();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        print_frame(&frame);
    }
    Ok(())
}
