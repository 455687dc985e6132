//! Layout strategies.
//!
//! Every strategy maps `(nodes, edges, canvas)` to positioned copies of the
//! nodes, one output node per input node in input order:
//!
//! | Strategy | Determinism | Cost |
//! |----------|-------------|------|
//! | [`ForceLayout`] | Seeded RNG only | O(n²) per tick, runs until converged |
//! | [`HierarchicalLayout`] | Deterministic | O(n + e) |
//! | [`CircularLayout`] | Deterministic | O(n) |
//!
//! A node carrying a `pinned_position` is placed at its pin by every
//! strategy. Edges whose endpoints are not among the nodes are ignored.

mod circular;
mod force;
mod hierarchical;

pub use circular::CircularLayout;
pub use force::{ForceLayout, ForceSimulation, SimulationState};
pub use hierarchical::{HierarchicalLayout, assign_ranks};

use crate::config::EngineConfig;
use crate::domain::{Dimensions, GraphEdge, GraphNode, LayoutStrategy};
use std::collections::HashMap;

/// A positioning strategy.
pub trait Layout {
    /// Return a positioned copy of every node.
    fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
    ) -> Vec<GraphNode>;
}

/// Dispatches to the configured strategy implementations
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: EngineConfig,
}

impl LayoutEngine {
    /// Create an engine; invalid sections fall back to their defaults
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// The engine configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run `strategy` to completion.
    ///
    /// The force strategy is simulated synchronously until it converges or
    /// reaches the configured tick cap.
    #[must_use]
    pub fn layout(
        &self,
        strategy: LayoutStrategy,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
    ) -> Vec<GraphNode> {
        let positioned = match strategy {
            LayoutStrategy::Force => ForceLayout::new(self.config.force, self.config.seed)
                .layout(nodes, edges, dimensions),
            LayoutStrategy::Hierarchical => {
                HierarchicalLayout::new(self.config.hierarchical).layout(nodes, edges, dimensions)
            }
            LayoutStrategy::Circular => {
                CircularLayout::new(self.config.circular).layout(nodes, edges, dimensions)
            }
        };
        tracing::debug!(%strategy, nodes = positioned.len(), "Layout pass complete");
        positioned
    }
}

/// Resolve edges to `(source, target)` indices into `nodes`, in edge order.
pub(crate) fn resolve_edges(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<(usize, usize)> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .rev()
        .collect();

    edges
        .iter()
        .filter_map(|e| {
            Some((
                *index.get(e.source_id.as_str())?,
                *index.get(e.target_id.as_str())?,
            ))
        })
        .collect()
}

/// Move pinned nodes onto their pins.
pub(crate) fn apply_pins(nodes: &mut [GraphNode]) {
    for node in nodes {
        if let Some(pin) = node.pinned_position {
            node.position = pin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, WorkItem};
    use rstest::rstest;
    use std::collections::HashSet;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .map(|id| GraphNode::from_work_item(&WorkItem::new(*id, *id)))
            .collect()
    }

    fn engine() -> LayoutEngine {
        let mut config = EngineConfig::default();
        config.seed = Some(11);
        LayoutEngine::new(config)
    }

    #[rstest]
    #[case::force(LayoutStrategy::Force)]
    #[case::hierarchical(LayoutStrategy::Hierarchical)]
    #[case::circular(LayoutStrategy::Circular)]
    fn test_empty_input_gives_empty_output(#[case] strategy: LayoutStrategy) {
        let positioned = engine().layout(strategy, &[], &[], Dimensions::default());
        assert!(positioned.is_empty());
    }

    #[rstest]
    #[case::force(LayoutStrategy::Force)]
    #[case::hierarchical(LayoutStrategy::Hierarchical)]
    #[case::circular(LayoutStrategy::Circular)]
    fn test_every_node_is_positioned(#[case] strategy: LayoutStrategy) {
        let input = nodes(&["a", "b", "c", "lonely"]);
        let edges = vec![
            GraphEdge::finish_to_start("a", "b", 1),
            GraphEdge::finish_to_start("b", "c", 1),
            GraphEdge::finish_to_start("c", "missing", 1),
        ];

        let positioned = engine().layout(strategy, &input, &edges, Dimensions::default());

        let ids: Vec<_> = positioned.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "lonely"]);
        assert!(positioned.iter().all(|n| n.position.is_finite()));
    }

    #[rstest]
    #[case::force(LayoutStrategy::Force)]
    #[case::hierarchical(LayoutStrategy::Hierarchical)]
    #[case::circular(LayoutStrategy::Circular)]
    fn test_pinned_nodes_stay_on_pin(#[case] strategy: LayoutStrategy) {
        let mut input = nodes(&["a", "b", "c"]);
        input[1].pinned_position = Some(Point::new(12.0, 34.0));
        let edges = vec![GraphEdge::finish_to_start("a", "b", 0)];

        let positioned = engine().layout(strategy, &input, &edges, Dimensions::default());
        assert_eq!(positioned[1].position, Point::new(12.0, 34.0));
    }

    #[test]
    fn test_resolve_edges_skips_unknown_endpoints() {
        let input = nodes(&["a", "b"]);
        let edges = vec![
            GraphEdge::finish_to_start("a", "b", 0),
            GraphEdge::finish_to_start("a", "zzz", 0),
        ];
        assert_eq!(resolve_edges(&input, &edges), vec![(0, 1)]);
    }

    #[test]
    fn test_distinct_positions_for_static_layouts() {
        let input = nodes(&["a", "b", "c", "d"]);
        for strategy in [LayoutStrategy::Hierarchical, LayoutStrategy::Circular] {
            let positioned = engine().layout(strategy, &input, &[], Dimensions::default());
            let distinct: HashSet<_> = positioned
                .iter()
                .map(|n| (n.position.x.to_bits(), n.position.y.to_bits()))
                .collect();
            assert_eq!(distinct.len(), 4, "{strategy} stacked nodes");
        }
    }
}
