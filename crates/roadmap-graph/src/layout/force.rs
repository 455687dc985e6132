//! Force-directed layout.
//!
//! [`ForceSimulation`] is a long-lived, tick-driven physics simulation that a
//! host advances once per frame. [`ForceLayout`] wraps it for synchronous
//! callers by ticking until convergence.
//!
//! ## Forces (applied each tick, scaled by the cooling factor `alpha`)
//!
//! - Charge: every pair of nodes repels, inversely to distance
//! - Links: each edge pulls its endpoints toward `link_distance`
//! - Centering: every node drifts toward the canvas centre
//! - Collision: overlapping nodes are pushed apart to `2 * node_radius`
//!
//! Pinned nodes sit on their pin, carry no velocity and are never displaced;
//! they still exert forces on free nodes.
//!
//! ## Lifecycle
//!
//! `Idle --start--> Running --converged--> Converged`
//!
//! `stop()` moves any state to `Stopped` and is idempotent. `reheat()` puts a
//! finished simulation back into `Running`. Dropping a simulation stops it.

use super::{Layout, apply_pins, resolve_edges};
use crate::config::ForceConfig;
use crate::domain::{Dimensions, GraphEdge, GraphNode, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Squared distance below which two nodes are treated as coincident.
const MIN_DISTANCE_SQ: f64 = 1e-6;

/// Distance floor for charge, so near-coincident nodes are not flung away.
const MIN_CHARGE_DISTANCE: f64 = 1.0;

/// Cooling factor restored when a finished simulation is reheated.
const REHEAT_ALPHA: f64 = 0.3;

/// Lifecycle state of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Created, not yet started
    Idle,
    /// Advancing on each tick
    Running,
    /// Kinetic energy fell below the threshold
    Converged,
    /// Halted by its owner
    Stopped,
}

/// An interactive force-directed simulation.
///
/// The random source is injectable so that tests can use a seeded generator;
/// randomness is only used for the initial placement and to separate
/// coincident nodes.
#[derive(Debug)]
pub struct ForceSimulation<R: Rng = StdRng> {
    nodes: Vec<GraphNode>,
    links: Vec<(usize, usize)>,
    velocities: Vec<Point>,
    index: HashMap<String, usize>,
    config: ForceConfig,
    dimensions: Dimensions,
    alpha: f64,
    energy: f64,
    ticks: usize,
    state: SimulationState,
    rng: R,
}

impl ForceSimulation<StdRng> {
    /// Create a simulation seeded from the operating system
    #[must_use]
    pub fn with_os_rng(
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
        config: ForceConfig,
    ) -> Self {
        Self::new(nodes, edges, dimensions, config, StdRng::from_os_rng())
    }

    /// Create a reproducible simulation from a seed
    #[must_use]
    pub fn seeded(
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
        config: ForceConfig,
        seed: u64,
    ) -> Self {
        Self::new(nodes, edges, dimensions, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ForceSimulation<R> {
    /// Create an idle simulation.
    ///
    /// Free nodes start at random offsets within `initial_jitter` of the canvas
    /// centre; pinned nodes start on their pin. An invalid `config` is
    /// replaced by the defaults.
    pub fn new(
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
        config: ForceConfig,
        mut rng: R,
    ) -> Self {
        let config = config.sanitized();
        let center = dimensions.center();
        let jitter = config.initial_jitter.abs();

        let mut nodes = nodes.to_vec();
        for node in &mut nodes {
            node.position = Point::new(
                center.x + rng.random_range(-jitter..=jitter),
                center.y + rng.random_range(-jitter..=jitter),
            );
        }
        apply_pins(&mut nodes);

        let links = resolve_edges(&nodes, edges);
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let velocities = vec![Point::default(); nodes.len()];

        Self {
            nodes,
            links,
            velocities,
            index,
            config,
            dimensions,
            alpha: 1.0,
            energy: 0.0,
            ticks: 0,
            state: SimulationState::Idle,
            rng,
        }
    }

    /// Begin (or resume) advancing on each tick
    pub fn start(&mut self) {
        if self.state != SimulationState::Running {
            tracing::debug!(nodes = self.nodes.len(), "Force simulation started");
        }
        self.state = SimulationState::Running;
    }

    /// Halt the simulation. Calling this on a halted simulation does nothing.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Running {
            tracing::info!(ticks = self.ticks, "Force simulation stopped");
        }
        self.state = SimulationState::Stopped;
    }

    /// Restore some heat and resume, e.g. after the user drags a node
    pub fn reheat(&mut self) {
        self.alpha = self.alpha.max(REHEAT_ALPHA);
        self.start();
    }

    /// Whether ticks currently advance the simulation
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Kinetic energy of free nodes after the last tick
    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Number of ticks advanced so far
    #[must_use]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Nodes with their current positions
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Consume the simulation, returning the positioned nodes
    #[must_use]
    pub fn into_nodes(mut self) -> Vec<GraphNode> {
        self.stop();
        std::mem::take(&mut self.nodes)
    }

    /// Hold a node at `position` until [`Self::unpin`] is called.
    ///
    /// Returns `false` if the node is unknown.
    pub fn pin(&mut self, id: &str, position: Point) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        self.nodes[i].pinned_position = Some(position);
        self.nodes[i].position = position;
        self.velocities[i] = Point::default();
        true
    }

    /// Release a pinned node back to the physics. Returns `false` if unknown.
    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        self.nodes[i].pinned_position = None;
        true
    }

    /// Advance one tick. Does nothing unless running.
    pub fn step(&mut self) -> SimulationState {
        if self.state != SimulationState::Running {
            return self.state;
        }

        self.alpha *= 1.0 - self.config.alpha_decay;
        self.apply_charge();
        self.apply_links();
        self.apply_centering();
        self.integrate();
        self.resolve_collisions();
        self.confine();

        self.ticks += 1;
        self.energy = self
            .nodes
            .iter()
            .zip(&self.velocities)
            .filter(|(node, _)| !node.is_pinned())
            .map(|(_, v)| 0.5 * (v.x * v.x + v.y * v.y))
            .sum();
        tracing::trace!(tick = self.ticks, energy = self.energy, alpha = self.alpha, "Tick");

        if self.energy < self.config.energy_threshold {
            self.state = SimulationState::Converged;
            tracing::info!(ticks = self.ticks, "Force simulation converged");
        }
        self.state
    }

    /// Tick until the simulation leaves `Running` or `max_ticks` elapse.
    ///
    /// Returns the number of ticks advanced by this call.
    pub fn run_to_convergence(&mut self, max_ticks: usize) -> usize {
        let before = self.ticks;
        while self.is_running() && self.ticks - before < max_ticks {
            self.step();
        }
        self.ticks - before
    }

    /// Vector from `a` to `b` and its length, separating coincident points.
    fn separation(&mut self, a: Point, b: Point) -> (f64, f64, f64) {
        let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
        if dx * dx + dy * dy < MIN_DISTANCE_SQ {
            dx = self.rng.random_range(-1e-3..1e-3);
            dy = self.rng.random_range(-1e-3..1e-3);
        }
        let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE_SQ.sqrt());
        (dx, dy, distance)
    }

    fn apply_charge(&mut self) {
        let strength = self.config.charge_strength * self.alpha;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let (dx, dy, distance) =
                    self.separation(self.nodes[i].position, self.nodes[j].position);
                // Unit direction scaled by strength / distance
                let distance = distance.max(MIN_CHARGE_DISTANCE);
                let factor = strength / (distance * distance);
                self.velocities[i].x -= dx * factor;
                self.velocities[i].y -= dy * factor;
                self.velocities[j].x += dx * factor;
                self.velocities[j].y += dy * factor;
            }
        }
    }

    fn apply_links(&mut self) {
        for k in 0..self.links.len() {
            let (source, target) = self.links[k];
            if source == target {
                continue;
            }
            let (dx, dy, distance) =
                self.separation(self.nodes[source].position, self.nodes[target].position);
            let pull = (distance - self.config.link_distance) / distance
                * self.config.link_strength
                * self.alpha
                * 0.5;
            self.velocities[source].x += dx * pull;
            self.velocities[source].y += dy * pull;
            self.velocities[target].x -= dx * pull;
            self.velocities[target].y -= dy * pull;
        }
    }

    fn apply_centering(&mut self) {
        let center = self.dimensions.center();
        let strength = self.config.center_strength * self.alpha;
        for (node, velocity) in self.nodes.iter().zip(&mut self.velocities) {
            velocity.x += (center.x - node.position.x) * strength;
            velocity.y += (center.y - node.position.y) * strength;
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        for (node, velocity) in self.nodes.iter_mut().zip(&mut self.velocities) {
            if let Some(pin) = node.pinned_position {
                node.position = pin;
                *velocity = Point::default();
                continue;
            }
            velocity.x *= keep;
            velocity.y *= keep;
            node.position.x += velocity.x;
            node.position.y += velocity.y;
        }
    }

    /// Keep free nodes inside the canvas, one radius from each edge.
    fn confine(&mut self) {
        let margin = self.config.node_radius;
        let (max_x, max_y) = (
            (self.dimensions.width - margin).max(margin),
            (self.dimensions.height - margin).max(margin),
        );
        for node in self.nodes.iter_mut().filter(|n| !n.is_pinned()) {
            node.position.x = node.position.x.clamp(margin, max_x);
            node.position.y = node.position.y.clamp(margin, max_y);
        }
    }

    fn resolve_collisions(&mut self) {
        let min_separation = 2.0 * self.config.node_radius;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let (i_pinned, j_pinned) = (self.nodes[i].is_pinned(), self.nodes[j].is_pinned());
                if i_pinned && j_pinned {
                    continue;
                }
                let (dx, dy, distance) =
                    self.separation(self.nodes[i].position, self.nodes[j].position);
                if distance >= min_separation {
                    continue;
                }

                let push = (min_separation - distance) / distance;
                let (i_share, j_share) = match (i_pinned, j_pinned) {
                    (true, _) => (0.0, 1.0),
                    (_, true) => (1.0, 0.0),
                    _ => (0.5, 0.5),
                };
                self.nodes[i].position.x -= dx * push * i_share;
                self.nodes[i].position.y -= dy * push * i_share;
                self.nodes[j].position.x += dx * push * j_share;
                self.nodes[j].position.y += dy * push * j_share;
            }
        }
    }
}

impl<R: Rng> Drop for ForceSimulation<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Synchronous force layout: simulate until converged or the tick cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceLayout {
    config: ForceConfig,
    seed: Option<u64>,
}

impl ForceLayout {
    /// Create a layout; `seed` makes the result reproducible
    #[must_use]
    pub fn new(config: ForceConfig, seed: Option<u64>) -> Self {
        Self { config, seed }
    }
}

impl Layout for ForceLayout {
    fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
    ) -> Vec<GraphNode> {
        let mut simulation = match self.seed {
            Some(seed) => ForceSimulation::seeded(nodes, edges, dimensions, self.config, seed),
            None => ForceSimulation::with_os_rng(nodes, edges, dimensions, self.config),
        };
        simulation.start();
        let ticks = simulation.run_to_convergence(self.config.max_ticks);
        if simulation.is_running() {
            tracing::debug!(ticks, "Force layout hit the tick cap before converging");
        }
        simulation.into_nodes()
    }
}
