//! Stateful glue between planner inputs and a rendering host.
//!
//! A [`GraphView`] owns one snapshot, one layout strategy, at most one force
//! simulation and one selection. The host feeds it inputs and events, calls
//! [`GraphView::tick`] once per frame while it returns `true`, and paints
//! whatever [`GraphView::frame`] returns.
//!
//! Work is recomputed only when its inputs change by value:
//!
//! | Change | Rebuild snapshot | Relayout | Critical path |
//! |--------|------------------|----------|---------------|
//! | work items, entities, filter | yes | if the snapshot differs | if the snapshot differs |
//! | strategy | no | yes | no |
//! | dimensions | no | yes | no |
//! | critical-path toggle | no | no | yes |
//!
//! Any running simulation is stopped before a relayout and on teardown.

use crate::config::EngineConfig;
use crate::critical_path::{CriticalPath, CriticalPathAnalyzer};
use crate::domain::{
    Dimensions, GraphEdge, GraphNode, LayoutStrategy, NodeKindFilter, Point, SupportingEntity,
    WorkItem,
};
use crate::graph::{GraphModelBuilder, GraphSnapshot};
use crate::layout::{ForceSimulation, LayoutEngine, SimulationState};
use crate::selection::{Selection, SelectionController};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;

/// An interaction reported by the host
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer click on a node
    NodeClick {
        /// Clicked node
        id: String,
    },
    /// Enter or Space on a focused node
    NodeKeyActivate {
        /// Focused node
        id: String,
    },
    /// Click on empty canvas
    BackgroundClick,
    /// Escape key
    Escape,
    /// A drag began on a node
    DragStart {
        /// Dragged node
        id: String,
        /// Pointer position in canvas space
        position: Point,
    },
    /// The pointer moved during a drag
    DragMove {
        /// Dragged node
        id: String,
        /// Pointer position in canvas space
        position: Point,
    },
    /// The drag was released
    DragEnd {
        /// Dragged node
        id: String,
    },
}

/// A node ready to paint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    /// The positioned node
    #[serde(flatten)]
    pub node: GraphNode,
    /// Drawing radius, grown by effort
    pub radius: f64,
    /// Whether this is the active node
    pub selected: bool,
    /// Whether the node lies on the highlighted critical path
    pub critical: bool,
}

/// An edge with its endpoint coordinates resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    /// The underlying edge
    #[serde(flatten)]
    pub edge: GraphEdge,
    /// Position of the source node
    pub source: Point,
    /// Position of the target node
    pub target: Point,
    /// Whether both endpoints lie on the highlighted critical path
    pub critical: bool,
}

/// Everything a rendering layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    /// Active layout strategy
    pub strategy: LayoutStrategy,
    /// Canvas the positions refer to
    pub dimensions: Dimensions,
    /// Nodes in snapshot order
    pub nodes: Vec<RenderNode>,
    /// Edges in snapshot order
    pub edges: Vec<RenderEdge>,
    /// Current selection
    pub selection: Selection,
    /// Highlighted chain, source first; empty when highlighting is off
    pub critical_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewInputs {
    work_items: Vec<WorkItem>,
    entities: Vec<SupportingEntity>,
    filter: NodeKindFilter,
}

/// Interactive roadmap graph view
#[derive(Debug)]
pub struct GraphView {
    config: EngineConfig,
    builder: GraphModelBuilder,
    engine: LayoutEngine,
    inputs: Option<ViewInputs>,
    snapshot: GraphSnapshot,
    strategy: LayoutStrategy,
    dimensions: Dimensions,
    highlight_critical_path: bool,
    critical_path: CriticalPath,
    positioned: Vec<GraphNode>,
    simulation: Option<ForceSimulation>,
    pins: HashMap<String, Point>,
    selection: SelectionController,
    rng: StdRng,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GraphView {
    /// Create an empty view.
    ///
    /// Force simulations draw their seeds from a generator seeded with
    /// `config.seed`, or from the operating system when no seed is set.
    /// Invalid configuration sections fall back to their defaults.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            builder: GraphModelBuilder::new(config.inference),
            engine: LayoutEngine::new(config.clone()),
            config,
            inputs: None,
            snapshot: GraphSnapshot::empty(),
            strategy: LayoutStrategy::default(),
            dimensions: Dimensions::default(),
            highlight_critical_path: false,
            critical_path: CriticalPath::empty(),
            positioned: Vec::new(),
            simulation: None,
            pins: HashMap::new(),
            selection: SelectionController::new(),
            rng,
        }
    }

    /// Replace the planner inputs.
    ///
    /// Returns `true` if the snapshot was rebuilt. Value-equal inputs are a
    /// no-op; so is a rebuild that yields an identical snapshot.
    pub fn set_inputs(
        &mut self,
        work_items: Vec<WorkItem>,
        entities: Vec<SupportingEntity>,
        filter: NodeKindFilter,
    ) -> bool {
        let inputs = ViewInputs {
            work_items,
            entities,
            filter,
        };
        if self.inputs.as_ref() == Some(&inputs) {
            return false;
        }

        let snapshot = self
            .builder
            .build(&inputs.work_items, &inputs.entities, inputs.filter);
        self.inputs = Some(inputs);
        if snapshot == self.snapshot {
            return false;
        }

        self.stop_simulation();
        self.snapshot = snapshot;
        self.selection.reconcile(&self.snapshot);
        let snapshot = &self.snapshot;
        self.pins.retain(|id, _| snapshot.contains(id));
        self.refresh_critical_path();
        self.relayout();
        true
    }

    /// Switch layout strategy, stopping any running simulation.
    pub fn set_strategy(&mut self, strategy: LayoutStrategy) {
        if strategy == self.strategy {
            return;
        }
        tracing::debug!(from = %self.strategy, to = %strategy, "Switching layout strategy");
        self.strategy = strategy;
        self.relayout();
    }

    /// Resize the canvas and lay out again.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        if dimensions == self.dimensions {
            return;
        }
        self.dimensions = dimensions;
        self.relayout();
    }

    /// Turn critical-path highlighting on or off
    pub fn set_highlight_critical_path(&mut self, enabled: bool) {
        if enabled == self.highlight_critical_path {
            return;
        }
        self.highlight_critical_path = enabled;
        self.refresh_critical_path();
    }

    /// Apply an interaction event
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::NodeClick { id } | InputEvent::NodeKeyActivate { id } => {
                if self.snapshot.contains(&id) {
                    self.selection.activate(&id);
                }
            }
            InputEvent::BackgroundClick | InputEvent::Escape => {
                self.selection.clear();
            }
            InputEvent::DragStart { id, position } | InputEvent::DragMove { id, position } => {
                self.drag_to(&id, position);
            }
            InputEvent::DragEnd { id } => self.release(&id),
        }
    }

    /// Advance the force simulation by one step.
    ///
    /// Returns `true` while further ticks are needed. Static layouts never
    /// need ticks.
    pub fn tick(&mut self) -> bool {
        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };
        if !simulation.is_running() {
            return false;
        }
        simulation.step();
        self.positioned = simulation.nodes().to_vec();
        simulation.is_running()
    }

    /// Tick until the simulation converges or hits the configured tick cap.
    ///
    /// Returns the number of ticks advanced.
    pub fn run_to_convergence(&mut self) -> usize {
        let Some(simulation) = self.simulation.as_mut() else {
            return 0;
        };
        let ticks = simulation.run_to_convergence(self.config.force.max_ticks);
        self.positioned = simulation.nodes().to_vec();
        ticks
    }

    /// Render output for the current state
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        let positions: HashMap<&str, Point> = self
            .positioned
            .iter()
            .map(|n| (n.id.as_str(), n.position))
            .collect();
        let highlighted = self.highlighted_path();

        let nodes = self
            .positioned
            .iter()
            .map(|node| RenderNode {
                radius: node.visual_radius(self.config.force.node_radius),
                selected: self.selection.is_selected(&node.id),
                critical: highlighted.is_some_and(|path| path.contains(&node.id)),
                node: node.clone(),
            })
            .collect();

        let edges = self
            .snapshot
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = *positions.get(edge.source_id.as_str())?;
                let target = *positions.get(edge.target_id.as_str())?;
                Some(RenderEdge {
                    source,
                    target,
                    critical: highlighted.is_some_and(|path| {
                        path.contains(&edge.source_id) && path.contains(&edge.target_id)
                    }),
                    edge: edge.clone(),
                })
            })
            .collect();

        RenderFrame {
            strategy: self.strategy,
            dimensions: self.dimensions,
            nodes,
            edges,
            selection: self.selection.selection().clone(),
            critical_path: highlighted.map(|p| p.chain().to_vec()).unwrap_or_default(),
        }
    }

    /// Stop the simulation and release it. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.stop_simulation();
    }

    /// The current snapshot
    #[must_use]
    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    /// Nodes with their latest positions, in snapshot order
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.positioned
    }

    /// Active strategy
    #[must_use]
    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// Current canvas size
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    /// Longest chain of the current snapshot (empty while highlighting is off)
    #[must_use]
    pub fn critical_path(&self) -> &CriticalPath {
        &self.critical_path
    }

    /// The live simulation, if the force strategy is active
    #[must_use]
    pub fn simulation(&self) -> Option<&ForceSimulation> {
        self.simulation.as_ref()
    }

    /// Lifecycle state of the live simulation, if any
    #[must_use]
    pub fn simulation_state(&self) -> Option<SimulationState> {
        self.simulation.as_ref().map(ForceSimulation::state)
    }

    fn highlighted_path(&self) -> Option<&CriticalPath> {
        self.highlight_critical_path.then_some(&self.critical_path)
    }

    fn refresh_critical_path(&mut self) {
        let analyzer =
            CriticalPathAnalyzer::new(self.highlight_critical_path, self.config.critical_path);
        self.critical_path = analyzer.analyze(&self.snapshot);
    }

    fn stop_simulation(&mut self) {
        if let Some(mut simulation) = self.simulation.take() {
            simulation.stop();
        }
    }

    /// Snapshot nodes carrying any active drag pins.
    fn pinned_nodes(&self) -> Vec<GraphNode> {
        self.snapshot
            .nodes()
            .iter()
            .map(|node| {
                let mut node = node.clone();
                node.pinned_position = self.pins.get(&node.id).copied();
                node
            })
            .collect()
    }

    fn relayout(&mut self) {
        self.stop_simulation();
        let nodes = self.pinned_nodes();
        let edges = self.snapshot.edges();

        if self.strategy.is_incremental() {
            let seed = self.rng.random::<u64>();
            let mut simulation =
                ForceSimulation::seeded(&nodes, edges, self.dimensions, self.config.force, seed);
            simulation.start();
            self.positioned = simulation.nodes().to_vec();
            self.simulation = Some(simulation);
        } else {
            self.positioned = self
                .engine
                .layout(self.strategy, &nodes, edges, self.dimensions);
        }
    }

    fn drag_to(&mut self, id: &str, position: Point) {
        if !self.snapshot.contains(id) {
            return;
        }
        self.pins.insert(id.to_string(), position);

        if let Some(simulation) = self.simulation.as_mut() {
            simulation.pin(id, position);
            simulation.reheat();
            self.positioned = simulation.nodes().to_vec();
        } else if let Some(node) = self.positioned.iter_mut().find(|n| n.id == id) {
            node.position = position;
            node.pinned_position = Some(position);
        }
    }

    fn release(&mut self, id: &str) {
        if self.pins.remove(id).is_none() {
            return;
        }
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.unpin(id);
            self.positioned = simulation.nodes().to_vec();
        } else if let Some(node) = self.positioned.iter_mut().find(|n| n.id == id) {
            node.pinned_position = None;
        }
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.teardown();
    }
}
