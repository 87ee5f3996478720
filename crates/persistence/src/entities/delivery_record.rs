//! Delivery record entity definitions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use domain::models::{DeliveryRecord, DeliveryStatus};

/// Database entity for the delivery_records table.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryRecordEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub message_content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DeliveryRecordEntity> for DeliveryRecord {
    fn from(e: DeliveryRecordEntity) -> Self {
        let status = DeliveryStatus::parse(&e.status).unwrap_or_else(|| {
            warn!(record_id = %e.id, status = %e.status, "Unknown delivery status in store");
            DeliveryStatus::Pending
        });
        DeliveryRecord {
            id: e.id,
            campaign_id: e.campaign_id,
            customer_id: e.customer_id,
            status,
            message_content: e.message_content,
            sent_at: e.sent_at,
            failure_reason: e.failure_reason,
            created_at: e.created_at,
        }
    }
}

/// Aggregated delivery counts for one campaign.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DeliveryStatsEntity {
    pub audience_size: i64,
    pub sent_count: i64,
    pub failed_count: i64,
    pub pending_count: i64,
}
