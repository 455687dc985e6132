//! Ranked (layered) layout.
//!
//! Ranks are longest-path distances from source nodes, computed with Kahn's
//! algorithm. Ranks run left to right; nodes within a rank run top to bottom
//! in input order. No crossing minimization is attempted.

use super::{Layout, apply_pins, resolve_edges};
use crate::config::HierarchicalConfig;
use crate::domain::{Dimensions, GraphEdge, GraphNode, Point};
use std::collections::VecDeque;

/// Assign a rank to every node.
///
/// `edges` are `(source, target)` indices into a node list of length
/// `node_count`. Nodes reachable only through a cycle are ranked afterwards,
/// in index order, one past their highest already-ranked predecessor.
#[must_use]
pub fn assign_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut successors = vec![Vec::new(); node_count];
    let mut predecessors = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];
    for &(source, target) in edges {
        successors[source].push(target);
        predecessors[target].push(source);
        in_degree[target] += 1;
    }

    let mut rank = vec![0usize; node_count];
    let mut ranked = vec![false; node_count];
    let mut queue: VecDeque<usize> = (0..node_count).filter(|&i| in_degree[i] == 0).collect();

    while let Some(node) = queue.pop_front() {
        ranked[node] = true;
        for &succ in &successors[node] {
            rank[succ] = rank[succ].max(rank[node] + 1);
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    for node in 0..node_count {
        if ranked[node] {
            continue;
        }
        rank[node] = predecessors[node]
            .iter()
            .filter(|&&p| ranked[p])
            .map(|&p| rank[p] + 1)
            .max()
            .unwrap_or(0);
        ranked[node] = true;
    }

    rank
}

/// Layered left-to-right layout
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalLayout {
    config: HierarchicalConfig,
}

impl HierarchicalLayout {
    /// Create a layout with the given spacing (defaults if invalid)
    #[must_use]
    pub fn new(config: HierarchicalConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// Start offset that centres a span on an axis, or hugs the padding when
    /// the span does not fit.
    fn axis_start(&self, extent: f64, span: f64) -> f64 {
        let available = extent - 2.0 * self.config.padding;
        if span <= available {
            extent / 2.0 - span / 2.0
        } else {
            self.config.padding
        }
    }
}

impl Layout for HierarchicalLayout {
    #[allow(clippy::cast_precision_loss)]
    fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        dimensions: Dimensions,
    ) -> Vec<GraphNode> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let ranks = assign_ranks(nodes.len(), &resolve_edges(nodes, edges));
        let rank_count = ranks.iter().max().map_or(0, |&r| r + 1);

        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); rank_count];
        for (node, &rank) in ranks.iter().enumerate() {
            layers[rank].push(node);
        }
        // Keep columns evenly spaced even if a rank ends up empty.
        layers.retain(|layer| !layer.is_empty());

        let x_span = (layers.len() - 1) as f64 * self.config.rank_spacing;
        let x0 = self.axis_start(dimensions.width, x_span);

        let mut positioned = nodes.to_vec();
        for (column, layer) in layers.iter().enumerate() {
            let x = x0 + column as f64 * self.config.rank_spacing;
            let y_span = (layer.len() - 1) as f64 * self.config.node_spacing;
            let y0 = self.axis_start(dimensions.height, y_span);
            for (row, &node) in layer.iter().enumerate() {
                positioned[node].position = Point::new(x, y0 + row as f64 * self.config.node_spacing);
            }
        }

        apply_pins(&mut positioned);
        positioned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkItem;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .map(|id| GraphNode::from_work_item(&WorkItem::new(*id, *id)))
            .collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs
            .iter()
            .map(|(s, t)| GraphEdge::finish_to_start(*s, *t, 0))
            .collect()
    }

    #[test]
    fn test_ranks_use_longest_path() {
        // a -> b -> c, a -> c: c sits on rank 2, not 1
        let ranks = assign_ranks(3, &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn test_isolated_nodes_are_rank_zero() {
        assert_eq!(assign_ranks(3, &[]), vec![0, 0, 0]);
    }

    #[test]
    fn test_cycle_members_still_ranked() {
        // s -> a -> b -> a, b -> c
        let ranks = assign_ranks(4, &[(0, 1), (1, 2), (2, 1), (2, 3)]);
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_chain_runs_left_to_right() {
        let input = nodes(&["a", "b", "c"]);
        let positioned = HierarchicalLayout::default().layout(
            &input,
            &edges(&[("a", "b"), ("b", "c")]),
            Dimensions::new(800.0, 600.0),
        );

        let xs: Vec<_> = positioned.iter().map(|n| n.position.x).collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert!((xs[1] - xs[0] - 160.0).abs() < 1e-9);
        assert!(positioned.iter().all(|n| (n.position.y - 300.0).abs() < 1e-9));
    }

    #[test]
    fn test_rank_members_stack_top_to_bottom() {
        let input = nodes(&["root", "x", "y", "z"]);
        let positioned = HierarchicalLayout::default().layout(
            &input,
            &edges(&[("root", "x"), ("root", "y"), ("root", "z")]),
            Dimensions::new(800.0, 600.0),
        );

        let column: Vec<_> = positioned[1..].iter().map(|n| n.position).collect();
        assert!(column.iter().all(|p| (p.x - column[0].x).abs() < 1e-9));
        assert!(column[0].y < column[1].y && column[1].y < column[2].y);
        assert!((column[1].y - column[0].y - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_rank_starts_at_padding() {
        let ids: Vec<String> = (0..20).map(|i| format!("n{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let positioned = HierarchicalLayout::default().layout(
            &nodes(&refs),
            &[],
            Dimensions::new(300.0, 300.0),
        );

        assert!((positioned[0].position.y - 40.0).abs() < 1e-9);
        assert!((positioned[19].position.y - (40.0 + 19.0 * 70.0)).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_runs_are_bit_identical() {
        let input = nodes(&["a", "b", "c", "d"]);
        let links = edges(&[("a", "b"), ("a", "c"), ("c", "d")]);
        let layout = HierarchicalLayout::default();
        let dims = Dimensions::new(1024.0, 768.0);

        assert_eq!(
            layout.layout(&input, &links, dims),
            layout.layout(&input, &links, dims)
        );
    }

    #[test]
    fn test_non_finite_spacing_uses_defaults() {
        let layout = HierarchicalLayout::new(HierarchicalConfig {
            rank_spacing: f64::INFINITY,
            node_spacing: 70.0,
            padding: f64::NAN,
        });
        let positioned = layout.layout(
            &nodes(&["a", "b"]),
            &edges(&[("a", "b")]),
            Dimensions::new(800.0, 600.0),
        );

        assert!(positioned.iter().all(|n| n.position.is_finite()));
        assert!((positioned[1].position.x - positioned[0].position.x - 160.0).abs() < 1e-9);
    }
}
