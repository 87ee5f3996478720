//! Segment rule models.
//!
//! A segment is described by an ordered list of rules; the list is a
//! conjunction (logical AND) of every rule. Rules arrive from the frontend
//! and from the AI rule-suggestion endpoint, so the wire shape is kept
//! permissive: unknown operators and unparseable values are tolerated here
//! and resolved during compilation.

use serde::{Deserialize, Serialize};

/// Customer field names a rule can target.
pub const FIELD_TOTAL_SPEND: &str = "totalSpend";
pub const FIELD_VISIT_COUNT: &str = "visitCount";
pub const FIELD_LAST_ACTIVE_DATE: &str = "lastActiveDate";

/// Comparison operator as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Anything else the client sent. Compiles to equality.
    #[serde(other)]
    Unknown,
}

/// Rule value: the frontend sends strings, the AI endpoint may emit numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
}

impl Default for RuleValue {
    fn default() -> Self {
        RuleValue::Text(String::new())
    }
}

impl RuleValue {
    /// The trimmed string form of the value, or `None` when it is empty.
    pub fn as_trimmed(&self) -> Option<String> {
        match self {
            RuleValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            RuleValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

/// A single segment rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub operator: RuleOperator,
    #[serde(default)]
    pub value: RuleValue,
}
