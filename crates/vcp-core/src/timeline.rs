use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

use crate::events::Event;

/// A timestamp that goes backwards relative to its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRegression {
    /// Position of the later event.
    pub index: usize,
    /// Event whose timestamp precedes the previous one.
    pub event_id: String,
}

/// Finds every non-monotonic timestamp in pack order.
///
/// Timestamps are compared as instants when both parse as RFC 3339, and as
/// strings otherwise. Events without a timestamp are skipped and do not
/// reset the comparison baseline.
pub fn find_regressions(events: &[Event]) -> Vec<TimelineRegression> {
    let mut regressions = Vec::new();
    let mut previous: Option<&str> = None;

    for (index, event) in events.iter().enumerate() {
        let Some(current) = event.timestamp() else {
            continue;
        };
        if let Some(prev) = previous {
            if compare_timestamps(current, prev) == Ordering::Less {
                regressions.push(TimelineRegression {
                    index,
                    event_id: event.event_id().to_string(),
                });
            }
        }
        previous = Some(current);
    }

    regressions
}

fn compare_timestamps(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn parse(ts: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(ts).ok()
}
