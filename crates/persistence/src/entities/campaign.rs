//! Campaign entity definitions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use domain::models::{Campaign, CampaignStatus, CampaignWithStats};

/// Database entity for the campaigns table.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignEntity {
    pub id: Uuid,
    pub name: String,
    pub segment_rules: serde_json::Value,
    pub message_template: String,
    pub created_by_user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Parse a stored status string, falling back to `draft` for values this
/// build does not know (forward-compatibility across rollouts).
fn parse_status(raw: &str, campaign_id: Uuid) -> CampaignStatus {
    CampaignStatus::parse(raw).unwrap_or_else(|| {
        warn!(campaign_id = %campaign_id, status = %raw, "Unknown campaign status in store");
        CampaignStatus::Draft
    })
}

impl From<CampaignEntity> for Campaign {
    fn from(e: CampaignEntity) -> Self {
        let status = parse_status(&e.status, e.id);
        Campaign {
            id: e.id,
            name: e.name,
            segment_rules: e.segment_rules,
            message_template: e.message_template,
            created_by_user_id: e.created_by_user_id,
            status,
            created_at: e.created_at,
        }
    }
}

/// Campaign row joined with aggregated delivery record counts.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignWithStatsEntity {
    pub id: Uuid,
    pub name: String,
    pub segment_rules: serde_json::Value,
    pub message_template: String,
    pub created_by_user_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub audience_size: i64,
    pub sent_count: i64,
    pub failed_count: i64,
}

impl From<CampaignWithStatsEntity> for CampaignWithStats {
    fn from(e: CampaignWithStatsEntity) -> Self {
        let status = parse_status(&e.status, e.id);
        CampaignWithStats {
            campaign: Campaign {
                id: e.id,
                name: e.name,
                segment_rules: e.segment_rules,
                message_template: e.message_template,
                created_by_user_id: e.created_by_user_id,
                status,
                created_at: e.created_at,
            },
            audience_size: e.audience_size,
            sent_count: e.sent_count,
            failed_count: e.failed_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_known_value() {
        assert_eq!(
            parse_status("active", Uuid::new_v4()),
            CampaignStatus::Active
        );
    }

    #[test]
    fn test_parse_status_unknown_falls_back_to_draft() {
        assert_eq!(
            parse_status("paused", Uuid::new_v4()),
            CampaignStatus::Draft
        );
    }
}
