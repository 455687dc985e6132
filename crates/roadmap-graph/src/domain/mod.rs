//! Domain types for the roadmap dependency graph.
//!
//! Input records (`WorkItem`, `SupportingEntity`) mirror what the planner
//! hands over each time its data changes. Graph records (`GraphNode`,
//! `GraphEdge`) are what the builder produces and the layouts position.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest multiple of the base radius a node can grow to from its effort.
const MAX_RADIUS_SCALE: f64 = 3.0;

/// A coordinate in canvas space (device-independent pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset from the canvas origin
    pub x: f64,
    /// Vertical offset from the canvas origin
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True if both coordinates are finite
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A work item (initiative) as supplied by the planner.
///
/// Dates are kept as the planner stores them (`YYYY-MM-DD`, optionally with a
/// time component) and parsed during edge inference. Both camelCase and the
/// planner's snake_case column names are accepted when deserializing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Status label (used only for highlight decisions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Initiative type label
    #[serde(
        default,
        rename = "type",
        alias = "initiativeType",
        alias = "initiative_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub initiative_type: Option<String>,

    /// Estimated effort, scales the node radius
    #[serde(
        default,
        alias = "effortEstimate",
        alias = "effort_estimate",
        skip_serializing_if = "Option::is_none"
    )]
    pub effort: Option<f64>,

    /// Planned start date
    #[serde(default, alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Planned end date
    #[serde(default, alias = "end_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Scenario the item belongs to
    #[serde(default, alias = "scenario_id", skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,

    /// Priority rank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl WorkItem {
    /// Create a work item with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the planned start and end dates
    #[must_use]
    pub fn with_dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }
}

/// A supporting entity (a system touched by initiatives).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingEntity {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,
}

impl SupportingEntity {
    /// Create a new supporting entity
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Kind of graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Built from a work item
    Initiative,

    /// Built from a supporting entity
    System,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiative => write!(f, "initiative"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Which node kinds a snapshot includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKindFilter {
    /// Work items only
    Initiatives,

    /// Supporting entities only
    Entities,

    /// Everything
    #[default]
    Both,
}

impl NodeKindFilter {
    /// Whether nodes of `kind` pass this filter
    #[must_use]
    pub fn includes(self, kind: NodeKind) -> bool {
        match self {
            Self::Both => true,
            Self::Initiatives => kind == NodeKind::Initiative,
            Self::Entities => kind == NodeKind::System,
        }
    }
}

/// Relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    /// The target starts after the source finishes
    #[default]
    FinishToStart,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinishToStart => write!(f, "finish-to-start"),
        }
    }
}

/// A node in a graph snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Identifier, unique within a snapshot
    pub id: String,

    /// Display name
    pub name: String,

    /// What the node was built from
    pub kind: NodeKind,

    /// Status label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Initiative type label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative_type: Option<String>,

    /// Non-negative effort estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,

    /// Position assigned by the last layout pass
    pub position: Point,

    /// User-dragged override; physics leaves the node here while set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_position: Option<Point>,
}

impl GraphNode {
    /// Build an initiative node from a work item.
    ///
    /// Negative or non-finite effort is discarded.
    #[must_use]
    pub fn from_work_item(item: &WorkItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            kind: NodeKind::Initiative,
            status: item.status.clone(),
            initiative_type: item.initiative_type.clone(),
            effort: item.effort.filter(|e| e.is_finite() && *e >= 0.0),
            position: Point::default(),
            pinned_position: None,
        }
    }

    /// Build a system node from a supporting entity
    #[must_use]
    pub fn from_entity(entity: &SupportingEntity) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            kind: NodeKind::System,
            status: None,
            initiative_type: None,
            effort: None,
            position: Point::default(),
            pinned_position: None,
        }
    }

    /// Whether the node is currently held by a drag
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned_position.is_some()
    }

    /// Radius to draw the node with, grown by the square root of its effort.
    #[must_use]
    pub fn visual_radius(&self, base: f64) -> f64 {
        let effort = self.effort.unwrap_or(0.0);
        (base + effort.sqrt() * 2.0).min(base * MAX_RADIUS_SCALE)
    }
}

/// A directed edge in a graph snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Display identifier `source->target`; snapshots keep one edge per
    /// endpoint pair, but ids containing `->` can coincide
    pub id: String,

    /// Node the edge leaves
    pub source_id: String,

    /// Node the edge enters
    pub target_id: String,

    /// Relationship kind
    pub relation_type: RelationType,

    /// False when the target starts before the source ends
    pub satisfied: bool,

    /// Days between source end and target start, rounded
    pub lag_days: i64,
}

impl GraphEdge {
    /// Create a finish-to-start edge
    pub fn finish_to_start(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        lag_days: i64,
    ) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        Self {
            id: format!("{source_id}->{target_id}"),
            source_id,
            target_id,
            relation_type: RelationType::FinishToStart,
            satisfied: lag_days >= 0,
            lag_days,
        }
    }
}

/// Layout strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Interactive physics simulation
    #[default]
    Force,

    /// Ranked left-to-right layers
    Hierarchical,

    /// Evenly spaced around a circle
    Circular,
}

impl LayoutStrategy {
    /// Whether the strategy runs across multiple ticks
    #[must_use]
    pub fn is_incremental(self) -> bool {
        matches!(self, Self::Force)
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Force => write!(f, "force"),
            Self::Hierarchical => write!(f, "hierarchical"),
            Self::Circular => write!(f, "circular"),
        }
    }
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "force" => Ok(Self::Force),
            "hierarchical" => Ok(Self::Hierarchical),
            "circular" => Ok(Self::Circular),
            other => Err(format!("unknown layout strategy: {other}")),
        }
    }
}

/// Canvas dimensions in device-independent pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The canvas centre
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::both_initiative(NodeKindFilter::Both, NodeKind::Initiative, true)]
    #[case::both_system(NodeKindFilter::Both, NodeKind::System, true)]
    #[case::initiatives_only(NodeKindFilter::Initiatives, NodeKind::Initiative, true)]
    #[case::initiatives_excludes_system(NodeKindFilter::Initiatives, NodeKind::System, false)]
    #[case::entities_only(NodeKindFilter::Entities, NodeKind::System, true)]
    #[case::entities_excludes_initiative(NodeKindFilter::Entities, NodeKind::Initiative, false)]
    fn test_filter_includes(
        #[case] filter: NodeKindFilter,
        #[case] kind: NodeKind,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.includes(kind), expected);
    }

    #[test]
    fn test_work_item_accepts_planner_column_names() {
        let json = r#"{
            "id": "i-1",
            "name": "Migrate billing",
            "initiative_type": "project",
            "effort_estimate": 12.5,
            "start_date": "2024-01-01",
            "end_date": "2024-01-31",
            "scenario_id": "s-1"
        }"#;

        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.initiative_type.as_deref(), Some("project"));
        assert_eq!(item.effort, Some(12.5));
        assert_eq!(item.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(item.end_date.as_deref(), Some("2024-01-31"));
        assert_eq!(item.scenario_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_work_item_accepts_camel_case() {
        let json = r#"{"id": "i-1", "name": "A", "type": "bau", "startDate": "2024-02-01"}"#;

        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.initiative_type.as_deref(), Some("bau"));
        assert_eq!(item.start_date.as_deref(), Some("2024-02-01"));
        assert!(item.end_date.is_none());
    }

    #[test]
    fn test_negative_effort_is_discarded() {
        let mut item = WorkItem::new("i-1", "A");
        item.effort = Some(-3.0);
        assert_eq!(GraphNode::from_work_item(&item).effort, None);
    }

    #[test]
    fn test_visual_radius_grows_with_effort_and_caps() {
        let mut item = WorkItem::new("i-1", "A");
        let plain = GraphNode::from_work_item(&item);
        assert!((plain.visual_radius(10.0) - 10.0).abs() < f64::EPSILON);

        item.effort = Some(16.0);
        let sized = GraphNode::from_work_item(&item);
        assert!((sized.visual_radius(10.0) - 18.0).abs() < f64::EPSILON);

        item.effort = Some(10_000.0);
        let capped = GraphNode::from_work_item(&item);
        assert!((capped.visual_radius(10.0) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_satisfied_follows_lag_sign() {
        assert!(GraphEdge::finish_to_start("a", "b", 0).satisfied);
        assert!(GraphEdge::finish_to_start("a", "b", 29).satisfied);
        assert!(!GraphEdge::finish_to_start("a", "b", -1).satisfied);
        assert_eq!(GraphEdge::finish_to_start("a", "b", 3).id, "a->b");
    }

    #[rstest]
    #[case::force("force", LayoutStrategy::Force)]
    #[case::hierarchical("Hierarchical", LayoutStrategy::Hierarchical)]
    #[case::circular("CIRCULAR", LayoutStrategy::Circular)]
    fn test_layout_strategy_from_str(#[case] input: &str, #[case] expected: LayoutStrategy) {
        assert_eq!(input.parse::<LayoutStrategy>().unwrap(), expected);
    }

    #[test]
    fn test_layout_strategy_rejects_unknown() {
        assert!("radial".parse::<LayoutStrategy>().is_err());
    }

    #[test]
    fn test_relation_type_serializes_kebab_case() {
        let json = serde_json::to_string(&RelationType::FinishToStart).unwrap();
        assert_eq!(json, "\"finish-to-start\"");
    }
}
