//! Critical path search.
//!
//! The critical path is the longest chain of directed edges in a snapshot,
//! used to highlight the causal spine of a roadmap. It is not a scheduling
//! guarantee.
//!
//! ## Algorithm
//!
//! | Graph shape | Algorithm |
//! |-------------|-----------|
//! | Acyclic (the common case) | Longest path over a topological order, O(V+E) |
//! | Contains a cycle | Depth-bounded DFS with an explicit stack |
//!
//! Both algorithms break ties the same way: the first longest chain found
//! when starting nodes are tried in node order and successors in edge order.

use crate::config::CriticalPathConfig;
use crate::graph::GraphSnapshot;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashSet;

/// Result of a critical path search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalPath {
    chain: Vec<String>,
    members: HashSet<String>,
}

impl CriticalPath {
    /// An empty result
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_chain(chain: Vec<String>) -> Self {
        let members = chain.iter().cloned().collect();
        Self { chain, members }
    }

    /// Node ids from the first to the last node of the chain
    #[must_use]
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Node ids on the chain, for membership checks
    #[must_use]
    pub fn members(&self) -> &HashSet<String> {
        &self.members
    }

    /// Whether `id` lies on the chain
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Number of nodes on the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// True if no chain was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Computes the critical path of a snapshot.
///
/// The search is opt-in: a disabled analyzer returns an empty result without
/// touching the graph.
#[derive(Debug, Clone, Copy)]
pub struct CriticalPathAnalyzer {
    enabled: bool,
    max_search_depth: usize,
}

impl Default for CriticalPathAnalyzer {
    fn default() -> Self {
        Self::new(true, CriticalPathConfig::default())
    }
}

impl CriticalPathAnalyzer {
    /// Create an analyzer
    #[must_use]
    pub fn new(enabled: bool, config: CriticalPathConfig) -> Self {
        Self {
            enabled,
            max_search_depth: config.max_search_depth.max(1),
        }
    }

    /// An analyzer that never searches
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(false, CriticalPathConfig::default())
    }

    /// Whether the analyzer searches at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Find the longest chain in `snapshot`.
    ///
    /// Returns an empty result when disabled, and when no chain of at least
    /// two nodes exists.
    #[must_use]
    pub fn analyze(&self, snapshot: &GraphSnapshot) -> CriticalPath {
        if !self.enabled || snapshot.edges().is_empty() {
            return CriticalPath::empty();
        }

        let successors = snapshot.successors();
        let path = match topological_order(snapshot.len(), &snapshot.edge_indices()) {
            Some(order) => longest_path_acyclic(&order, &successors),
            None => {
                tracing::warn!(
                    nodes = snapshot.len(),
                    max_depth = self.max_search_depth,
                    "Dependency cycle detected, falling back to bounded search"
                );
                longest_path_bounded(&successors, self.max_search_depth)
            }
        };

        if path.len() < 2 {
            return CriticalPath::empty();
        }

        let chain: Vec<String> = path
            .into_iter()
            .map(|i| snapshot.nodes()[i].id.clone())
            .collect();
        tracing::debug!(length = chain.len(), "Critical path computed");
        CriticalPath::from_chain(chain)
    }
}

/// Topological order of node indices, or `None` if the edges form a cycle.
fn topological_order(node_count: usize, edges: &[(usize, usize)]) -> Option<Vec<usize>> {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(node_count, edges.len());
    for _ in 0..node_count {
        graph.add_node(());
    }
    for &(source, target) in edges {
        graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), ());
    }

    algo::toposort(&graph, None)
        .ok()
        .map(|order| order.into_iter().map(NodeIndex::index).collect())
}

/// Longest path over a DAG given a topological order.
///
/// `length[v]` is the node count of the longest chain starting at `v`; `next`
/// records the successor that achieves it (first in edge order on ties).
fn longest_path_acyclic(order: &[usize], successors: &[Vec<usize>]) -> Vec<usize> {
    let n = successors.len();
    let mut length = vec![1usize; n];
    let mut next: Vec<Option<usize>> = vec![None; n];

    for &node in order.iter().rev() {
        for &succ in &successors[node] {
            if length[succ] + 1 > length[node] {
                length[node] = length[succ] + 1;
                next[node] = Some(succ);
            }
        }
    }

    let Some(start) = (0..n).fold(None, |best: Option<usize>, i| match best {
        Some(b) if length[b] >= length[i] => Some(b),
        _ => Some(i),
    }) else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut cursor = start;
    while let Some(succ) = next[cursor] {
        path.push(succ);
        cursor = succ;
    }
    path
}

/// Depth-bounded longest simple path search for graphs with cycles.
///
/// Each start node runs an explicit-stack DFS; a node is on the path set
/// while it is on the stack, so cycles are never followed.
fn longest_path_bounded(successors: &[Vec<usize>], max_depth: usize) -> Vec<usize> {
    let n = successors.len();
    let mut best: Vec<usize> = Vec::new();
    let mut on_path = vec![false; n];

    for start in 0..n {
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        let mut path = vec![start];
        on_path[start] = true;
        if path.len() > best.len() {
            best.clone_from(&path);
        }

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            if cursor < successors[node].len() && path.len() < max_depth {
                frame.1 += 1;
                let succ = successors[node][cursor];
                if !on_path[succ] {
                    on_path[succ] = true;
                    path.push(succ);
                    stack.push((succ, 0));
                    if path.len() > best.len() {
                        best.clone_from(&path);
                    }
                }
            } else {
                stack.pop();
                path.pop();
                on_path[node] = false;
            }
        }
    }

    best
}
