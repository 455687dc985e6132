//! Graph model construction.
//!
//! A [`GraphSnapshot`] is the immutable (nodes, edges) pair built from one
//! coherent input state. [`GraphModelBuilder`] produces snapshots from planner
//! records; a changed input always yields a new snapshot.
//!
//! ## Integrity
//!
//! - Node ids are unique: the first record with a given id wins
//! - Every edge endpoint resolves to a node in the same snapshot; edges that
//!   reference a missing or filtered-out node are dropped
//! - Construction never fails

mod inference;

pub use inference::{days_between, infer_edges, parse_planner_date, parse_planner_end_date};

use crate::config::InferenceConfig;
use crate::domain::{GraphEdge, GraphNode, NodeKind, NodeKindFilter, SupportingEntity, WorkItem};
use std::collections::{HashMap, HashSet};

/// An immutable node/edge snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl GraphSnapshot {
    /// An empty snapshot
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a snapshot from raw parts, enforcing the integrity rules.
    ///
    /// Later nodes with an already-seen id are skipped, as are edges whose
    /// endpoints are not present and repeated (source, target) pairs. Edge
    /// ids are not used for deduplication: node ids are free-form, so two
    /// distinct edges can share an id.
    #[must_use]
    pub fn from_parts(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        let mut kept = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node.id) {
                tracing::warn!(id = %node.id, "Skipping node with duplicate id");
                continue;
            }
            index.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        let mut endpoints = HashSet::new();
        let edges: Vec<GraphEdge> = edges
            .into_iter()
            .filter(|edge| {
                let resolves =
                    index.contains_key(&edge.source_id) && index.contains_key(&edge.target_id);
                if !resolves {
                    tracing::trace!(edge = %edge.id, "Dropping edge with unresolved endpoint");
                }
                resolves && endpoints.insert((edge.source_id.clone(), edge.target_id.clone()))
            })
            .collect();

        Self {
            nodes: kept,
            edges,
            index,
        }
    }

    /// Nodes in build order
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in build order
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Position of a node in [`Self::nodes`]
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Whether a node with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the snapshot has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges as (source index, target index) pairs, in edge order.
    #[must_use]
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter_map(|e| Some((self.index_of(&e.source_id)?, self.index_of(&e.target_id)?)))
            .collect()
    }

    /// Outgoing adjacency per node index, preserving edge order.
    #[must_use]
    pub fn successors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (source, target) in self.edge_indices() {
            adjacency[source].push(target);
        }
        adjacency
    }
}

/// Builds graph snapshots from planner records
#[derive(Debug, Clone, Default)]
pub struct GraphModelBuilder {
    inference: InferenceConfig,
}

impl GraphModelBuilder {
    /// Create a builder with a custom inference window
    #[must_use]
    pub fn new(inference: InferenceConfig) -> Self {
        Self {
            inference: inference.sanitized(),
        }
    }

    /// Build a snapshot from work items and supporting entities.
    ///
    /// Work items become initiative nodes, entities become system nodes, and
    /// edges are inferred from the work items' schedules. The filter decides
    /// which kinds are kept; edges touching an excluded node disappear.
    #[must_use]
    pub fn build(
        &self,
        work_items: &[WorkItem],
        entities: &[SupportingEntity],
        filter: NodeKindFilter,
    ) -> GraphSnapshot {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        if filter.includes(NodeKind::Initiative) {
            let mut seen = HashSet::new();
            let unique: Vec<WorkItem> = work_items
                .iter()
                .filter(|item| seen.insert(item.id.as_str()))
                .cloned()
                .collect();

            nodes.extend(unique.iter().map(GraphNode::from_work_item));
            edges = infer_edges(&unique, &self.inference);
        }

        if filter.includes(NodeKind::System) {
            nodes.extend(entities.iter().map(GraphNode::from_entity));
        }

        let snapshot = GraphSnapshot::from_parts(nodes, edges);
        tracing::debug!(
            nodes = snapshot.len(),
            edges = snapshot.edges().len(),
            ?filter,
            "Built graph snapshot"
        );
        snapshot
    }
}
