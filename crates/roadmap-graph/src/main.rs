//! roadmap-graph CLI - roadmap dependency analysis from the command line.
//!
//! Reads a planner export, infers dependencies between its work items, and
//! reports edges, the critical path, or node positions.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use roadmap_graph::Dimensions;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Context;
use cli::layout::LayoutOptions;
use cli::types::{FilterArg, StrategyArg, validate_extent};

/// roadmap-graph: dependency graph analytics for roadmap plans.
#[derive(Parser)]
#[command(name = "roadmap-graph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep only initiatives belonging to this scenario
    #[arg(short, long, global = true)]
    scenario: Option<String>,

    /// Node kinds to include
    #[arg(short, long, value_enum, default_value_t = FilterArg::Both, global = true)]
    filter: FilterArg,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List dependencies inferred from the schedule
    Edges {
        /// Roadmap document (JSON)
        input: PathBuf,
    },

    /// Show the longest chain of dependencies
    CriticalPath {
        /// Roadmap document (JSON)
        input: PathBuf,
    },

    /// Compute node positions
    Layout {
        /// Roadmap document (JSON)
        input: PathBuf,

        /// Positioning strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Force)]
        strategy: StrategyArg,

        /// Canvas width
        #[arg(long, value_parser = validate_extent, default_value = "800")]
        width: f64,

        /// Canvas height
        #[arg(long, value_parser = validate_extent, default_value = "600")]
        height: f64,

        /// Highlight the critical path
        #[arg(long)]
        critical_path: bool,

        /// Print the render frame as JSON
        #[arg(long)]
        json: bool,

        /// Mark a node as selected
        #[arg(long, value_name = "ID")]
        select: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = match Context::new(cli.config.as_deref(), cli.filter.into(), cli.scenario) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e),
    };

    let result = match cli.command {
        Commands::Edges { input } => cli::edges::run(&ctx, &input),
        Commands::CriticalPath { input } => cli::critical_path::run(&ctx, &input),
        Commands::Layout {
            input,
            strategy,
            width,
            height,
            critical_path,
            json,
            select,
        } => {
            let options = LayoutOptions {
                strategy: strategy.into(),
                dimensions: Dimensions::new(width, height),
                critical_path,
                json,
                select,
            };
            cli::layout::run(&ctx, &input, &options)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(error: &roadmap_graph::Error) -> ExitCode {
    eprintln!("{}: {error}", "error".red().bold());
    // Show cause chain for nested errors
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  {}: {cause}", "caused by".dimmed());
        source = std::error::Error::source(cause);
    }
    ExitCode::FAILURE
}
