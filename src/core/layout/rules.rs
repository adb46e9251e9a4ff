//! Timeline grouping rules
//!
//! The two predicates the layout policy delegates to. They only look at the
//! pair of events handed to them and hold no state between calls.

use crate::config::LayoutConfig;
use crate::domain::Event;
use chrono::{DateTime, Duration, Utc};

/// Pairwise grouping predicates for adjacent rendered events
pub trait LayoutRules: Send + Sync {
    /// Whether a day boundary separates the two timestamps
    fn needs_date_gap(&self, prev: DateTime<Utc>, cur: DateTime<Utc>) -> bool;

    /// Whether `cur` visually continues `prev`
    fn forms_continuation(&self, prev: &Event, cur: &Event) -> bool;
}

/// Default rules for a Matrix room timeline
///
/// - A date gap is needed when the two events fall on different UTC calendar
///   days or are more than 24 hours apart.
/// - `cur` continues `prev` when both are non-state events of the same type
///   from the same sender and `cur` follows `prev` within the continuation
///   window.
#[derive(Debug, Clone)]
pub struct TimelineRules {
    continuation_window: Duration,
}

impl TimelineRules {
    /// Default continuation window: 5 minutes
    pub const DEFAULT_WINDOW_SECS: i64 = 300;

    pub fn new(continuation_window: Duration) -> Self {
        Self {
            continuation_window,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        let secs = i64::try_from(config.continuation_window_secs).unwrap_or(i64::MAX);
        Self::new(Duration::seconds(secs))
    }

    pub fn continuation_window(&self) -> Duration {
        self.continuation_window
    }
}

impl Default for TimelineRules {
    fn default() -> Self {
        Self::new(Duration::seconds(Self::DEFAULT_WINDOW_SECS))
    }
}

impl LayoutRules for TimelineRules {
    fn needs_date_gap(&self, prev: DateTime<Utc>, cur: DateTime<Utc>) -> bool {
        prev.date_naive() != cur.date_naive() || (cur - prev).abs() > Duration::days(1)
    }

    fn forms_continuation(&self, prev: &Event, cur: &Event) -> bool {
        if prev.is_state() || cur.is_state() {
            return false;
        }
        if prev.event_type != cur.event_type || prev.sender != cur.sender {
            return false;
        }

        let gap = cur.timestamp - prev.timestamp;
        gap >= Duration::zero() && gap <= self.continuation_window
    }
}
