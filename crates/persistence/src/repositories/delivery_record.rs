//! Delivery record repository.
//!
//! One record exists per campaign x customer. Records are created in bulk
//! with status `pending` at fan-out time and updated one at a time by the
//! delivery receipt endpoint.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::DeliveryStatus;

use crate::entities::{DeliveryRecordEntity, DeliveryStatsEntity};

const RECORD_COLUMNS: &str =
    "id, campaign_id, customer_id, status, message_content, sent_at, failure_reason, created_at";

/// Repository for delivery record operations.
pub struct DeliveryRecordRepository {
    pool: PgPool,
}

impl DeliveryRecordRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk-insert one pending record per (customer, message) pair for a
    /// campaign. Returns the created rows with their generated ids.
    pub async fn create_batch(
        &self,
        campaign_id: Uuid,
        entries: &[(Uuid, String)],
    ) -> Result<Vec<DeliveryRecordEntity>, sqlx::Error> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let customer_ids: Vec<Uuid> = entries.iter().map(|(id, _)| *id).collect();
        let messages: Vec<String> = entries.iter().map(|(_, msg)| msg.clone()).collect();

        let entities = sqlx::query_as::<_, DeliveryRecordEntity>(&format!(
            r#"
            INSERT INTO delivery_records (campaign_id, customer_id, status, message_content)
            SELECT $1, t.customer_id, 'pending', t.message_content
            FROM UNNEST($2::uuid[], $3::text[]) AS t(customer_id, message_content)
            RETURNING {RECORD_COLUMNS}
            "#,
        ))
        .bind(campaign_id)
        .bind(&customer_ids)
        .bind(&messages)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }

    /// Apply a delivery receipt: overwrite the status, stamp `sent_at` with
    /// the reconciliation time, and record the failure reason when the
    /// receipt reports a failure (an earlier reason is kept otherwise).
    ///
    /// Transitions are not guarded; a later receipt for the same record wins.
    /// Returns `None` when no record exists with that id.
    pub async fn record_outcome(
        &self,
        record_id: Uuid,
        status: DeliveryStatus,
        failure_reason: Option<&str>,
    ) -> Result<Option<DeliveryRecordEntity>, sqlx::Error> {
        let entity = sqlx::query_as::<_, DeliveryRecordEntity>(&format!(
            r#"
            UPDATE delivery_records
            SET status = $2,
                sent_at = $3,
                failure_reason = CASE
                    WHEN $2 = 'failed' THEN COALESCE($4, failure_reason)
                    ELSE failure_reason
                END
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#,
        ))
        .bind(record_id)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(failure_reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }

    /// All records of a campaign. Siblings carry no ordering guarantee;
    /// creation order is used for stable listings only.
    pub async fn find_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<DeliveryRecordEntity>, sqlx::Error> {
        let entities = sqlx::query_as::<_, DeliveryRecordEntity>(&format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM delivery_records
            WHERE campaign_id = $1
            ORDER BY created_at ASC
            "#,
        ))
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities)
    }

    /// Aggregated delivery counts for one campaign.
    pub async fn get_stats(&self, campaign_id: Uuid) -> Result<DeliveryStatsEntity, sqlx::Error> {
        let stats = sqlx::query_as::<_, DeliveryStatsEntity>(
            r#"
            SELECT COUNT(*) AS audience_size,
                   COUNT(*) FILTER (WHERE status IN ('sent', 'delivered')) AS sent_count,
                   COUNT(*) FILTER (WHERE status = 'failed') AS failed_count,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending_count
            FROM delivery_records
            WHERE campaign_id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    // In-memory mirror of the UPDATE in `record_outcome`, written against the
    // same column semantics so the receipt policy is pinned here: the latest
    // receipt wins the status, `sent_at` is restamped on every receipt, and
    // `failure_reason` is only written by failed receipts and kept otherwise.
    fn apply_receipt(
        record: &mut DeliveryRecordEntity,
        status: DeliveryStatus,
        failure_reason: Option<&str>,
        now: DateTime<Utc>,
    ) {
        record.status = status.as_str().to_string();
        record.sent_at = Some(now);
        if status == DeliveryStatus::Failed {
            if let Some(reason) = failure_reason {
                record.failure_reason = Some(reason.to_string());
            }
        }
    }

    fn pending_record() -> DeliveryRecordEntity {
        DeliveryRecordEntity {
            id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            status: "pending".to_string(),
            message_content: "Hi Alice, deal for you!".to_string(),
            sent_at: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_later_receipt_overwrites_earlier_status() {
        let mut record = pending_record();
        let first = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 8, 29, 10, 5, 0).unwrap();

        apply_receipt(&mut record, DeliveryStatus::Sent, None, first);
        assert_eq!(record.status, "sent");
        assert_eq!(record.sent_at, Some(first));

        apply_receipt(&mut record, DeliveryStatus::Failed, Some("No route"), second);
        assert_eq!(record.status, "failed");
        assert_eq!(record.sent_at, Some(second));
        assert_eq!(record.failure_reason.as_deref(), Some("No route"));
    }

    #[test]
    fn test_success_after_failure_keeps_recorded_reason() {
        let mut record = pending_record();
        let first = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 8, 29, 10, 5, 0).unwrap();

        apply_receipt(&mut record, DeliveryStatus::Failed, Some("No route"), first);
        apply_receipt(&mut record, DeliveryStatus::Sent, None, second);

        assert_eq!(record.status, "sent");
        assert_eq!(record.sent_at, Some(second));
        // The reason column is not cleared by a success receipt.
        assert_eq!(record.failure_reason.as_deref(), Some("No route"));
    }

    #[test]
    fn test_failure_without_reason_keeps_earlier_reason() {
        let mut record = pending_record();
        let ts = Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap();

        apply_receipt(&mut record, DeliveryStatus::Failed, Some("Timeout"), ts);
        apply_receipt(&mut record, DeliveryStatus::Failed, None, ts);

        assert_eq!(record.status, "failed");
        assert_eq!(record.failure_reason.as_deref(), Some("Timeout"));
    }
}
