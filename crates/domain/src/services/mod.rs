//! Domain services.

pub mod personalize;
pub mod segment;

pub use personalize::personalize_message;
pub use segment::{compile_rules, compile_rules_at, Comparison, Condition, SegmentFilter};
