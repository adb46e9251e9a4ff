//! Timeline layout: date separators and message continuation

pub mod policy;
pub mod rules;

pub use policy::{is_continuation, needs_separator, plan_event, TilePlan};
pub use rules::{LayoutRules, TimelineRules};
