//! Temporal edge inference.
//!
//! Until the planner records explicit dependencies, edges are inferred from
//! schedule proximity: dated work items are ordered by start date and each
//! item is linked to the next one when the gap between them falls inside a
//! configured window. The result is close to a single chain, but consumers
//! must not rely on that.

use crate::config::InferenceConfig;
use crate::domain::{GraphEdge, WorkItem};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Parse a planner date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DD HH:MM:SS`
/// (with either a space or `T` separator). Returns `None` for anything else.
pub fn parse_planner_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a planner end date.
///
/// End dates are inclusive: a bare `YYYY-MM-DD` closes at the following
/// midnight. Timestamps are taken as given.
pub fn parse_planner_end_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return date.succ_opt().map(|next| next.and_time(NaiveTime::MIN));
    }
    parse_planner_date(raw)
}

/// Fractional days from `from` to `to` (negative when `to` is earlier).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// A work item with both dates parsed.
struct DatedItem<'a> {
    id: &'a str,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

fn parse_field(
    item: &WorkItem,
    field: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    let raw = raw?;
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(id = %item.id, field, value = raw, "Ignoring unparseable date");
    }
    parsed
}

/// Infer finish-to-start edges between consecutive dated work items.
///
/// Items lacking either date (or carrying an unparseable one) are skipped and
/// stay isolated. The sort by start date is stable, so items starting on the
/// same day keep their input order.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn infer_edges(items: &[WorkItem], window: &InferenceConfig) -> Vec<GraphEdge> {
    let mut dated: Vec<DatedItem<'_>> = items
        .iter()
        .filter_map(|item| {
            let start = parse_field(item, "start_date", item.start_date.as_deref(), parse_planner_date)?;
            let end = parse_field(
                item,
                "end_date",
                item.end_date.as_deref(),
                parse_planner_end_date,
            )?;
            Some(DatedItem {
                id: &item.id,
                start,
                end,
            })
        })
        .collect();

    dated.sort_by_key(|d| d.start);

    let mut edges = Vec::new();
    for pair in dated.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.id == next.id {
            continue;
        }

        let gap_days = days_between(current.end, next.start);
        if gap_days < window.min_gap_days || gap_days > window.max_gap_days {
            tracing::trace!(
                source = current.id,
                target = next.id,
                gap_days,
                "Gap outside inference window"
            );
            continue;
        }

        let mut edge = GraphEdge::finish_to_start(current.id, next.id, gap_days.round() as i64);
        edge.satisfied = gap_days >= 0.0;
        edges.push(edge);
    }

    edges
}
