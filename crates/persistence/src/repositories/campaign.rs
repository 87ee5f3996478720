//! Campaign repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::CampaignStatus;

use crate::entities::{CampaignEntity, CampaignWithStatsEntity};

const CAMPAIGN_COLUMNS: &str =
    "id, name, segment_rules, message_template, created_by_user_id, status, created_at";

/// Repository for campaign operations.
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new campaign. The rules are stored verbatim for audit.
    pub async fn create(
        &self,
        name: &str,
        segment_rules: &serde_json::Value,
        message_template: &str,
        created_by_user_id: &str,
        status: CampaignStatus,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let entity = sqlx::query_as::<_, CampaignEntity>(&format!(
            r#"
            INSERT INTO campaigns (name, segment_rules, message_template, created_by_user_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(segment_rules)
        .bind(message_template)
        .bind(created_by_user_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    /// Advance a campaign's status. Status is the only mutable field.
    pub async fn update_status(
        &self,
        campaign_id: Uuid,
        status: CampaignStatus,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let entity = sqlx::query_as::<_, CampaignEntity>(&format!(
            r#"
            UPDATE campaigns
            SET status = $2
            WHERE id = $1
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(campaign_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    /// Find a campaign by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let entity = sqlx::query_as::<_, CampaignEntity>(&format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS}
            FROM campaigns
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }

    /// Campaigns owned by an operator, newest first, each with delivery
    /// counts derived from its records.
    pub async fn list_by_owner_with_stats(
        &self,
        created_by_user_id: &str,
    ) -> Result<Vec<CampaignWithStatsEntity>, sqlx::Error> {
        let entities = sqlx::query_as::<_, CampaignWithStatsEntity>(
            r#"
            SELECT c.id, c.name, c.segment_rules, c.message_template,
                   c.created_by_user_id, c.status, c.created_at,
                   COUNT(d.id) AS audience_size,
                   COUNT(d.id) FILTER (WHERE d.status IN ('sent', 'delivered')) AS sent_count,
                   COUNT(d.id) FILTER (WHERE d.status = 'failed') AS failed_count
            FROM campaigns c
            LEFT JOIN delivery_records d ON d.campaign_id = c.id
            WHERE c.created_by_user_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(created_by_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }
}
