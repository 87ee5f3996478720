//! Renders a compiled [`SegmentFilter`] as a parameterized SQL WHERE clause.
//!
//! The compiler produces typed conditions over a fixed set of customer
//! columns, so the clause is assembled from constant column names and `$n`
//! placeholders only; user input travels exclusively through bind values.

use chrono::{DateTime, Utc};
use domain::services::segment::{Condition, SegmentFilter};

/// A bind value for a rendered filter, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Float(f64),
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// Rendered WHERE clause plus its bind values.
///
/// `where_clause` is either empty (match-all filter) or a full
/// `" WHERE ..."` fragment with placeholders starting at `$1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSql {
    pub where_clause: String,
    pub binds: Vec<BindValue>,
}

/// Equality fallback rules may only address these text columns; anything
/// else names a field customers do not have, which can never match.
fn equality_column(field: &str) -> Option<&'static str> {
    match field {
        "name" => Some("name"),
        "email" => Some("email"),
        _ => None,
    }
}

/// Render a segment filter. Conditions are AND-combined.
pub fn render_filter(filter: &SegmentFilter) -> FilterSql {
    if filter.is_match_all() {
        return FilterSql {
            where_clause: String::new(),
            binds: Vec::new(),
        };
    }

    let mut fragments = Vec::with_capacity(filter.conditions.len());
    let mut binds = Vec::new();

    for condition in &filter.conditions {
        match condition {
            Condition::TotalSpend(cmp, value) => {
                binds.push(BindValue::Float(*value));
                fragments.push(format!("total_spend {} ${}", cmp.sql(), binds.len()));
            }
            Condition::VisitCount(cmp, value) => {
                binds.push(BindValue::Float(*value));
                fragments.push(format!(
                    "visit_count::double precision {} ${}",
                    cmp.sql(),
                    binds.len()
                ));
            }
            Condition::InactiveSince(threshold) => {
                binds.push(BindValue::Timestamp(*threshold));
                fragments.push(format!("last_active_date <= ${}", binds.len()));
            }
            Condition::FieldEquals { field, value } => match equality_column(field) {
                Some(column) => {
                    binds.push(BindValue::Text(value.clone()));
                    fragments.push(format!("{} = ${}", column, binds.len()));
                }
                None => {
                    fragments.push("FALSE".to_string());
                }
            },
        }
    }

    FilterSql {
        where_clause: format!(" WHERE {}", fragments.join(" AND ")),
        binds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::services::segment::Comparison;

    #[test]
    fn test_match_all_renders_empty_clause() {
        let rendered = render_filter(&SegmentFilter::default());
        assert_eq!(rendered.where_clause, "");
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn test_numeric_conditions() {
        let filter = SegmentFilter {
            conditions: vec![
                Condition::TotalSpend(Comparison::GreaterThan, 10000.0),
                Condition::VisitCount(Comparison::LessThan, 3.0),
            ],
        };
        let rendered = render_filter(&filter);
        assert_eq!(
            rendered.where_clause,
            " WHERE total_spend > $1 AND visit_count::double precision < $2"
        );
        assert_eq!(
            rendered.binds,
            vec![BindValue::Float(10000.0), BindValue::Float(3.0)]
        );
    }

    #[test]
    fn test_inactivity_condition() {
        let threshold = Utc.with_ymd_and_hms(2026, 4, 15, 0, 0, 0).unwrap();
        let filter = SegmentFilter {
            conditions: vec![Condition::InactiveSince(threshold)],
        };
        let rendered = render_filter(&filter);
        assert_eq!(rendered.where_clause, " WHERE last_active_date <= $1");
        assert_eq!(rendered.binds, vec![BindValue::Timestamp(threshold)]);
    }

    #[test]
    fn test_equality_on_known_text_column() {
        let filter = SegmentFilter {
            conditions: vec![Condition::FieldEquals {
                field: "email".into(),
                value: "a@example.com".into(),
            }],
        };
        let rendered = render_filter(&filter);
        assert_eq!(rendered.where_clause, " WHERE email = $1");
        assert_eq!(
            rendered.binds,
            vec![BindValue::Text("a@example.com".into())]
        );
    }

    #[test]
    fn test_equality_on_unknown_field_never_matches() {
        let filter = SegmentFilter {
            conditions: vec![Condition::FieldEquals {
                field: "loyaltyTier".into(),
                value: "gold".into(),
            }],
        };
        let rendered = render_filter(&filter);
        assert_eq!(rendered.where_clause, " WHERE FALSE");
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn test_placeholder_numbering_skips_unbound_fragments() {
        let threshold = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let filter = SegmentFilter {
            conditions: vec![
                Condition::TotalSpend(Comparison::GreaterOrEqual, 500.0),
                Condition::FieldEquals {
                    field: "plan".into(),
                    value: "pro".into(),
                },
                Condition::InactiveSince(threshold),
            ],
        };
        let rendered = render_filter(&filter);
        assert_eq!(
            rendered.where_clause,
            " WHERE total_spend >= $1 AND FALSE AND last_active_date <= $2"
        );
        assert_eq!(rendered.binds.len(), 2);
    }
}
