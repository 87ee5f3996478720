//! Segment rule compilation.
//!
//! Turns a declarative rule list into a [`SegmentFilter`]: a conjunction of
//! typed conditions that the persistence layer renders as SQL and that can
//! also be evaluated in memory against a [`Customer`].
//!
//! Compilation is deliberately permissive: a rule whose value is empty or
//! unparseable is dropped with a warning rather than rejected, so a launch
//! proceeds with the remaining constraints. An empty or fully-dropped rule
//! list compiles to a filter that matches every customer.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::models::customer::Customer;
use crate::models::rule::{
    Rule, RuleOperator, FIELD_LAST_ACTIVE_DATE, FIELD_TOTAL_SPEND, FIELD_VISIT_COUNT,
};

/// Numeric comparison produced from a rule operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    LessThan,
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    fn from_operator(op: RuleOperator) -> Self {
        match op {
            RuleOperator::GreaterThan => Self::GreaterThan,
            RuleOperator::LessThan => Self::LessThan,
            RuleOperator::Equal => Self::Equal,
            RuleOperator::GreaterOrEqual => Self::GreaterOrEqual,
            RuleOperator::LessOrEqual => Self::LessOrEqual,
            // Unrecognized operators fall back to equality.
            RuleOperator::Unknown => Self::Equal,
        }
    }

    /// SQL comparison operator.
    pub fn sql(&self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Equal => "=",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
        }
    }

    fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Self::GreaterThan => left > right,
            Self::LessThan => left < right,
            Self::Equal => left == right,
            Self::GreaterOrEqual => left >= right,
            Self::LessOrEqual => left <= right,
        }
    }
}

/// One compiled condition. All conditions of a filter must hold (AND).
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    TotalSpend(Comparison, f64),
    VisitCount(Comparison, f64),
    /// `lastActiveDate <= threshold`, i.e. inactive since the threshold.
    /// The threshold is the start of the day N days before compilation time;
    /// the rule's stated operator is intentionally ignored for this field.
    InactiveSince(DateTime<Utc>),
    /// Fallback exact-match on any other field name.
    FieldEquals { field: String, value: String },
}

/// Compiled predicate over customers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentFilter {
    pub conditions: Vec<Condition>,
}

impl SegmentFilter {
    /// True when the filter matches every customer.
    pub fn is_match_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the filter against a customer record in memory.
    pub fn matches(&self, customer: &Customer) -> bool {
        self.conditions.iter().all(|cond| match cond {
            Condition::TotalSpend(cmp, value) => cmp.holds(customer.total_spend, *value),
            Condition::VisitCount(cmp, value) => cmp.holds(customer.visit_count as f64, *value),
            Condition::InactiveSince(threshold) => customer.last_active_date <= *threshold,
            Condition::FieldEquals { field, value } => match field.as_str() {
                "name" => customer.name == *value,
                "email" => customer.email == *value,
                // The record has no such field, so equality cannot hold.
                _ => false,
            },
        })
    }
}

/// Compile a rule list against the current clock.
pub fn compile_rules(rules: &[Rule]) -> SegmentFilter {
    compile_rules_at(rules, Utc::now())
}

/// Compile a rule list with an explicit "now", so day thresholds are
/// deterministic under test.
pub fn compile_rules_at(rules: &[Rule], now: DateTime<Utc>) -> SegmentFilter {
    let mut conditions = Vec::with_capacity(rules.len());

    for rule in rules {
        let value = match rule.value.as_trimmed() {
            Some(v) => v,
            None => {
                warn!(field = %rule.field, "Skipping rule with empty value");
                continue;
            }
        };

        match rule.field.as_str() {
            FIELD_LAST_ACTIVE_DATE => match value.parse::<i64>() {
                // The subtraction must stay within chrono's representable
                // range; a day count that overflows it drops like any other
                // invalid value instead of panicking mid-request.
                Ok(days) => match Duration::try_days(days)
                    .and_then(|delta| now.checked_sub_signed(delta))
                {
                    Some(threshold) => {
                        conditions.push(Condition::InactiveSince(start_of_day(threshold)));
                    }
                    None => {
                        warn!(
                            value = %value,
                            "Day count for lastActiveDate out of range, skipping rule"
                        );
                    }
                },
                Err(_) => {
                    warn!(value = %value, "Invalid day value for lastActiveDate, skipping rule");
                }
            },
            FIELD_TOTAL_SPEND | FIELD_VISIT_COUNT => match value.parse::<f64>() {
                Ok(number) => {
                    let cmp = Comparison::from_operator(rule.operator);
                    if rule.field == FIELD_TOTAL_SPEND {
                        conditions.push(Condition::TotalSpend(cmp, number));
                    } else {
                        conditions.push(Condition::VisitCount(cmp, number));
                    }
                }
                Err(_) => {
                    warn!(field = %rule.field, value = %value, "Invalid numeric value, skipping rule");
                }
            },
            other => {
                conditions.push(Condition::FieldEquals {
                    field: other.to_string(),
                    value,
                });
            }
        }
    }

    SegmentFilter { conditions }
}

/// Truncate a timestamp to the start of its UTC day.
fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::RuleValue;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn rule(field: &str, operator: RuleOperator, value: &str) -> Rule {
        Rule {
            field: field.to_string(),
            operator,
            value: RuleValue::Text(value.to_string()),
        }
    }

    fn customer(total_spend: f64, visit_count: i32, days_inactive: i64) -> Customer {
        let now = Utc::now();
        Customer {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            total_spend,
            visit_count,
            last_active_date: now - Duration::days(days_inactive),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_rules_match_all() {
        let filter = compile_rules(&[]);
        assert!(filter.is_match_all());
        assert!(filter.matches(&customer(0.0, 0, 0)));
    }

    #[test]
    fn test_numeric_comparisons() {
        let filter = compile_rules(&[
            rule("totalSpend", RuleOperator::GreaterThan, "10000"),
            rule("visitCount", RuleOperator::LessThan, "3"),
        ]);
        assert_eq!(filter.conditions.len(), 2);
        assert!(filter.matches(&customer(12000.0, 2, 5)));
        assert!(!filter.matches(&customer(12000.0, 5, 5)));
        assert!(!filter.matches(&customer(500.0, 2, 5)));
    }

    #[test]
    fn test_unparseable_numeric_value_drops_rule() {
        let filter = compile_rules(&[rule("totalSpend", RuleOperator::GreaterThan, "abc")]);
        assert_eq!(filter, compile_rules(&[]));
        assert!(filter.is_match_all());
    }

    #[test]
    fn test_empty_value_drops_rule() {
        let filter = compile_rules(&[rule("visitCount", RuleOperator::Equal, "   ")]);
        assert!(filter.is_match_all());
    }

    #[test]
    fn test_unknown_operator_falls_back_to_equality() {
        let filter = compile_rules(&[rule("visitCount", RuleOperator::Unknown, "3")]);
        assert_eq!(
            filter.conditions,
            vec![Condition::VisitCount(Comparison::Equal, 3.0)]
        );
        assert!(filter.matches(&customer(0.0, 3, 0)));
        assert!(!filter.matches(&customer(0.0, 4, 0)));
    }

    #[test]
    fn test_last_active_date_ignores_operator() {
        let now = Utc.with_ymd_and_hms(2026, 5, 15, 13, 45, 0).unwrap();
        let with_gt = compile_rules_at(
            &[rule("lastActiveDate", RuleOperator::GreaterThan, "30")],
            now,
        );
        let with_lte = compile_rules_at(
            &[rule("lastActiveDate", RuleOperator::LessOrEqual, "30")],
            now,
        );
        assert_eq!(with_gt, with_lte);

        let expected = Utc.with_ymd_and_hms(2026, 4, 15, 0, 0, 0).unwrap();
        assert_eq!(
            with_gt.conditions,
            vec![Condition::InactiveSince(expected)]
        );
    }

    #[test]
    fn test_last_active_date_threshold_is_start_of_day() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 23, 59, 59).unwrap();
        let filter = compile_rules_at(&[rule("lastActiveDate", RuleOperator::Equal, "0")], now);
        assert_eq!(
            filter.conditions,
            vec![Condition::InactiveSince(
                Utc.with_ymd_and_hms(2026, 8, 29, 0, 0, 0).unwrap()
            )]
        );
    }

    #[test]
    fn test_last_active_date_non_integer_drops_rule() {
        let filter = compile_rules(&[rule("lastActiveDate", RuleOperator::Equal, "soon")]);
        assert!(filter.is_match_all());
    }

    #[test]
    fn test_last_active_date_out_of_range_drops_rule() {
        // Parses as i64 but overflows the chrono range once converted to a
        // duration; must drop instead of aborting the whole compilation.
        let filter = compile_rules(&[rule(
            "lastActiveDate",
            RuleOperator::GreaterThan,
            "100000000000000",
        )]);
        assert!(filter.is_match_all());

        for extreme in ["-100000000000000", "9223372036854775807", "-9223372036854775808"] {
            let filter = compile_rules(&[rule("lastActiveDate", RuleOperator::Equal, extreme)]);
            assert!(filter.is_match_all(), "{extreme} should be dropped");
        }
    }

    #[test]
    fn test_other_field_compiles_to_equality() {
        let filter = compile_rules(&[rule("email", RuleOperator::GreaterThan, " test@example.com ")]);
        assert_eq!(
            filter.conditions,
            vec![Condition::FieldEquals {
                field: "email".into(),
                value: "test@example.com".into(),
            }]
        );
        assert!(filter.matches(&customer(0.0, 0, 0)));
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let filter = compile_rules(&[rule("loyaltyTier", RuleOperator::Equal, "gold")]);
        assert!(!filter.matches(&customer(0.0, 0, 0)));
    }

    #[test]
    fn test_numeric_rule_value_is_accepted() {
        let filter = compile_rules(&[Rule {
            field: "totalSpend".into(),
            operator: RuleOperator::GreaterOrEqual,
            value: RuleValue::Number(500.0),
        }]);
        assert_eq!(
            filter.conditions,
            vec![Condition::TotalSpend(Comparison::GreaterOrEqual, 500.0)]
        );
    }

    #[test]
    fn test_matches_agrees_with_direct_comparison() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        let filter = compile_rules(&[rule("totalSpend", RuleOperator::GreaterOrEqual, "1000")]);

        for _ in 0..50 {
            let spend: f64 = (0.0..5000.0).fake();
            let visits: i32 = (0..50).fake();
            let mut c = customer(spend, visits, 0);
            c.name = Name().fake();
            c.email = SafeEmail().fake();
            assert_eq!(filter.matches(&c), spend >= 1000.0);
        }
    }

    // End-to-end fixture from the audience-preview acceptance scenario:
    // A spends a lot across few visits and is recent, B is a frequent
    // low-spender who went quiet.
    #[test]
    fn test_fixture_scenario() {
        let a = customer(12000.0, 2, 5);
        let b = customer(500.0, 10, 100);

        let high_value = compile_rules(&[
            rule("totalSpend", RuleOperator::GreaterThan, "10000"),
            rule("visitCount", RuleOperator::LessThan, "3"),
        ]);
        assert!(high_value.matches(&a));
        assert!(!high_value.matches(&b));

        let dormant = compile_rules(&[rule("lastActiveDate", RuleOperator::GreaterThan, "90")]);
        assert!(!dormant.matches(&a));
        assert!(dormant.matches(&b));
    }
}
