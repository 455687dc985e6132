//! # roadmap-graph: dependency graph analytics for roadmap planners
//!
//! Turns a planner's dated work items into a dependency graph, finds its
//! critical path, and positions it for drawing.
//!
//! ## Pipeline
//!
//! 1. [`GraphModelBuilder`] builds an immutable [`GraphSnapshot`] from work
//!    items and supporting entities, inferring finish-to-start edges between
//!    work items that follow each other closely in time.
//! 2. [`CriticalPathAnalyzer`] finds the longest chain of edges.
//! 3. [`LayoutEngine`] positions the nodes with a force-directed, ranked or
//!    circular strategy.
//! 4. [`SelectionController`] tracks the single active node.
//!
//! [`GraphView`] wires the four together for an interactive host and owns the
//! force simulation's lifecycle.
//!
//! ## Quick Start
//!
//! ```
//! use roadmap_graph::{
//!     CriticalPathAnalyzer, Dimensions, GraphModelBuilder, LayoutEngine, LayoutStrategy,
//!     NodeKindFilter, WorkItem,
//! };
//!
//! let items = vec![
//!     WorkItem::new("a", "Discovery").with_dates("2024-01-01", "2024-01-31"),
//!     WorkItem::new("b", "Build").with_dates("2024-03-01", "2024-04-30"),
//! ];
//!
//! let snapshot = GraphModelBuilder::default().build(&items, &[], NodeKindFilter::Both);
//! assert_eq!(snapshot.edges()[0].lag_days, 29);
//!
//! let path = CriticalPathAnalyzer::default().analyze(&snapshot);
//! assert_eq!(path.chain(), ["a", "b"]);
//!
//! let positioned = LayoutEngine::default().layout(
//!     LayoutStrategy::Hierarchical,
//!     snapshot.nodes(),
//!     snapshot.edges(),
//!     Dimensions::new(800.0, 600.0),
//! );
//! assert!(positioned[0].position.x < positioned[1].position.x);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod critical_path;
pub mod domain;
pub mod error;
pub mod graph;
pub mod input;
pub mod layout;
pub mod selection;
pub mod view;

pub use config::EngineConfig;
pub use critical_path::{CriticalPath, CriticalPathAnalyzer};
pub use domain::{
    Dimensions, GraphEdge, GraphNode, LayoutStrategy, NodeKind, NodeKindFilter, Point,
    RelationType, SupportingEntity, WorkItem,
};
pub use error::{Error, Result};
pub use graph::{GraphModelBuilder, GraphSnapshot};
pub use input::RoadmapDocument;
pub use layout::{
    CircularLayout, ForceLayout, ForceSimulation, HierarchicalLayout, Layout, LayoutEngine,
    SimulationState,
};
pub use selection::{Selection, SelectionController};
pub use view::{GraphView, InputEvent, RenderEdge, RenderFrame, RenderNode};
