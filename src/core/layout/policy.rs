//! Continuation policy
//!
//! Decides, for the previous rendered event and the current one, whether a
//! date separator goes in between and whether the current event continues
//! the previous one. A separator always breaks a continuation.

use super::rules::LayoutRules;
use crate::domain::Event;

/// Layout decision for one rendered event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TilePlan {
    /// Emit a date separator before the event
    pub separator: bool,
    /// Render the event as a continuation of the previous one
    pub continuation: bool,
}

/// Whether a date separator precedes `cur`
///
/// The first rendered event always gets one.
pub fn needs_separator(rules: &dyn LayoutRules, prev: Option<&Event>, cur: &Event) -> bool {
    match prev {
        None => true,
        Some(prev) => rules.needs_date_gap(prev.timestamp, cur.timestamp),
    }
}

/// Whether `cur` continues `prev`, given the separator decision for `cur`
pub fn is_continuation(
    rules: &dyn LayoutRules,
    prev: Option<&Event>,
    cur: &Event,
    separator_inserted: bool,
) -> bool {
    if separator_inserted {
        return false;
    }
    match prev {
        None => false,
        Some(prev) => rules.forms_continuation(prev, cur),
    }
}

/// Both decisions for `cur` at once
pub fn plan_event(rules: &dyn LayoutRules, prev: Option<&Event>, cur: &Event) -> TilePlan {
    let separator = needs_separator(rules, prev, cur);
    TilePlan {
        separator,
        continuation: is_continuation(rules, prev, cur, separator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    /// Rules with fixed answers
    struct Fixed {
        gap: bool,
        continuation: bool,
    }

    impl LayoutRules for Fixed {
        fn needs_date_gap(&self, _prev: DateTime<Utc>, _cur: DateTime<Utc>) -> bool {
            self.gap
        }

        fn forms_continuation(&self, _prev: &Event, _cur: &Event) -> bool {
            self.continuation
        }
    }

    fn event(id: &str) -> Event {
        Event::builder()
            .event_id(id)
            .sender("@alice:example.org")
            .timestamp(Utc.timestamp_millis_opt(1_000).unwrap())
            .content(json!({"msgtype": "m.text", "body": "hi"}))
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_event_gets_separator_and_no_continuation() {
        let rules = Fixed {
            gap: false,
            continuation: true,
        };
        let cur = event("$a");
        assert_eq!(
            plan_event(&rules, None, &cur),
            TilePlan {
                separator: true,
                continuation: false
            }
        );
    }

    #[test]
    fn test_separator_breaks_continuation() {
        let rules = Fixed {
            gap: true,
            continuation: true,
        };
        let (prev, cur) = (event("$a"), event("$b"));
        let plan = plan_event(&rules, Some(&prev), &cur);
        assert!(plan.separator);
        assert!(!plan.continuation);
    }

    #[test]
    fn test_delegates_when_no_separator() {
        let (prev, cur) = (event("$a"), event("$b"));

        let grouping = Fixed {
            gap: false,
            continuation: true,
        };
        assert_eq!(
            plan_event(&grouping, Some(&prev), &cur),
            TilePlan {
                separator: false,
                continuation: true
            }
        );

        let splitting = Fixed {
            gap: false,
            continuation: false,
        };
        assert_eq!(plan_event(&splitting, Some(&prev), &cur), TilePlan::default());
    }

    #[test]
    fn test_is_continuation_without_prev() {
        let rules = Fixed {
            gap: false,
            continuation: true,
        };
        assert!(!is_continuation(&rules, None, &event("$a"), false));
    }
}
