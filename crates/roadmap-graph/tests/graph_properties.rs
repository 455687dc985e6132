//! Property tests for the graph pipeline.
//!
//! Random planner inputs are pushed through the builder, the critical-path
//! search and every layout strategy, checking the integrity guarantees each
//! stage makes regardless of input shape.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use roadmap_graph::{
    CriticalPathAnalyzer, Dimensions, EngineConfig, GraphEdge, GraphModelBuilder, GraphNode,
    GraphSnapshot, LayoutEngine, LayoutStrategy, NodeKindFilter, SupportingEntity, WorkItem,
};

const STRATEGIES: [LayoutStrategy; 3] = [
    LayoutStrategy::Force,
    LayoutStrategy::Hierarchical,
    LayoutStrategy::Circular,
];

fn date(offset: i64) -> String {
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (origin + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

/// Work items drawn from a small id pool so duplicates occur, with dates
/// that are sometimes missing or garbage.
fn work_item() -> impl Strategy<Value = WorkItem> {
    (
        0..12usize,
        prop::option::weighted(0.8, (0..400i64, 0..120i64)),
        prop::bool::weighted(0.05),
        prop::option::of(0.0..50.0f64),
    )
        .prop_map(|(id, schedule, garbage, effort)| {
            let mut item = WorkItem::new(format!("w{id}"), format!("Initiative {id}"));
            if let Some((start, length)) = schedule {
                item = item.with_dates(date(start), date(start + length));
            }
            if garbage {
                item.end_date = Some("someday".to_string());
            }
            item.effort = effort;
            item
        })
}

fn entities() -> impl Strategy<Value = Vec<SupportingEntity>> {
    prop::collection::vec(0..6usize, 0..6).prop_map(|ids| {
        ids.into_iter()
            .map(|i| SupportingEntity::new(format!("s{i}"), format!("System {i}")))
            .collect()
    })
}

fn filter() -> impl Strategy<Value = NodeKindFilter> {
    prop_oneof![
        Just(NodeKindFilter::Both),
        Just(NodeKindFilter::Initiatives),
        Just(NodeKindFilter::Entities),
    ]
}

/// A snapshot over `n` plain nodes with arbitrary edges, cycles included.
fn arbitrary_graph() -> impl Strategy<Value = GraphSnapshot> {
    (1..10usize)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..25)))
        .prop_map(|(n, pairs)| {
            let nodes = (0..n)
                .map(|i| GraphNode::from_work_item(&WorkItem::new(format!("n{i}"), "node")))
                .collect();
            let edges = pairs
                .into_iter()
                .map(|(s, t)| GraphEdge::finish_to_start(format!("n{s}"), format!("n{t}"), 0))
                .collect();
            GraphSnapshot::from_parts(nodes, edges)
        })
}

fn engine() -> LayoutEngine {
    let mut config = EngineConfig::default();
    config.seed = Some(5);
    config.force.max_ticks = 60;
    LayoutEngine::new(config)
}

fn assert_chain_is_connected(snapshot: &GraphSnapshot, chain: &[String]) {
    let edges: HashSet<(&str, &str)> = snapshot
        .edges()
        .iter()
        .map(|e| (e.source_id.as_str(), e.target_id.as_str()))
        .collect();
    for pair in chain.windows(2) {
        assert!(
            edges.contains(&(pair[0].as_str(), pair[1].as_str())),
            "{} -> {} is not an edge",
            pair[0],
            pair[1]
        );
    }
    let unique: HashSet<_> = chain.iter().collect();
    assert_eq!(unique.len(), chain.len(), "chain revisits a node");
}

proptest! {
    #[test]
    fn prop_edge_endpoints_exist(
        items in prop::collection::vec(work_item(), 0..20),
        entities in entities(),
        filter in filter(),
    ) {
        let snapshot = GraphModelBuilder::default().build(&items, &entities, filter);

        let ids: HashSet<&str> = snapshot.nodes().iter().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids.len(), snapshot.len(), "node ids are not unique");
        for edge in snapshot.edges() {
            prop_assert!(ids.contains(edge.source_id.as_str()));
            prop_assert!(ids.contains(edge.target_id.as_str()));
        }
    }

    #[test]
    fn prop_every_strategy_keeps_node_ids(
        items in prop::collection::vec(work_item(), 0..12),
        entities in entities(),
    ) {
        let snapshot = GraphModelBuilder::default().build(&items, &entities, NodeKindFilter::Both);
        let expected: Vec<&str> = snapshot.nodes().iter().map(|n| n.id.as_str()).collect();

        for strategy in STRATEGIES {
            let positioned = engine().layout(
                strategy,
                snapshot.nodes(),
                snapshot.edges(),
                Dimensions::new(640.0, 480.0),
            );
            let ids: Vec<&str> = positioned.iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(&ids, &expected);
            prop_assert!(positioned.iter().all(|n| n.position.is_finite()));
        }
    }

    #[test]
    fn prop_static_layouts_are_repeatable(graph in arbitrary_graph()) {
        for strategy in [LayoutStrategy::Hierarchical, LayoutStrategy::Circular] {
            let dims = Dimensions::new(1000.0, 700.0);
            let first = engine().layout(strategy, graph.nodes(), graph.edges(), dims);
            let second = engine().layout(strategy, graph.nodes(), graph.edges(), dims);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_inferred_critical_path_is_connected(
        items in prop::collection::vec(work_item(), 0..20),
    ) {
        let snapshot = GraphModelBuilder::default().build(&items, &[], NodeKindFilter::Both);
        let path = CriticalPathAnalyzer::default().analyze(&snapshot);

        prop_assert!(path.len() != 1);
        assert_chain_is_connected(&snapshot, path.chain());
    }

    #[test]
    fn prop_critical_path_is_connected_on_cyclic_graphs(graph in arbitrary_graph()) {
        let path = CriticalPathAnalyzer::default().analyze(&graph);

        prop_assert!(path.len() != 1);
        prop_assert!(path.len() <= graph.len());
        if !graph.edges().iter().any(|e| e.source_id != e.target_id) {
            prop_assert!(path.is_empty());
        }
        assert_chain_is_connected(&graph, path.chain());
    }
}

#[test]
fn test_gap_inside_window_yields_satisfied_edge() {
    let items = vec![
        WorkItem::new("a", "A").with_dates("2024-01-01", "2024-01-31"),
        WorkItem::new("b", "B").with_dates("2024-03-01", "2024-04-30"),
    ];
    let snapshot = GraphModelBuilder::default().build(&items, &[], NodeKindFilter::Both);

    assert_eq!(snapshot.edges().len(), 1);
    let edge = &snapshot.edges()[0];
    assert!(edge.satisfied);
    assert_eq!(edge.lag_days, 29);
}

#[test]
fn test_gap_of_ninety_five_days_yields_no_edge() {
    // Inclusive end: 2024-01-31 closes at 2024-02-01T00:00, 95 days before 2024-05-06.
    let items = vec![
        WorkItem::new("a", "A").with_dates("2024-01-01", "2024-01-31"),
        WorkItem::new("b", "B").with_dates("2024-05-06", "2024-06-30"),
    ];
    let snapshot = GraphModelBuilder::default().build(&items, &[], NodeKindFilter::Both);

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.edges().is_empty());
}

#[test]
fn test_empty_input_flows_through_every_stage() {
    let snapshot = GraphModelBuilder::default().build(&[], &[], NodeKindFilter::Both);
    assert!(snapshot.is_empty());
    assert!(snapshot.edges().is_empty());
    assert!(CriticalPathAnalyzer::default().analyze(&snapshot).is_empty());

    for strategy in STRATEGIES {
        assert!(engine()
            .layout(strategy, &[], &[], Dimensions::default())
            .is_empty());
    }
}
