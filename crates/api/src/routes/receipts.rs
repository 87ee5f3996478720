//! Delivery receipt endpoint.
//!
//! Called by the vendor, not by operators, so no identity header is
//! required. Receipts are applied last-write-wins: whatever arrives most
//! recently for a record overwrites its status, with no ordering or
//! duplicate detection.

use axum::{extract::State, Json};
use persistence::repositories::DeliveryRecordRepository;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_receipt_processed;
use domain::models::{DeliveryRecord, DeliveryStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceiptRequest {
    pub record_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub vendor_message_id: Option<String>,
}

/// Apply a vendor receipt to a delivery record.
///
/// POST /api/v1/delivery-receipts
pub async fn process_receipt(
    State(state): State<AppState>,
    Json(request): Json<DeliveryReceiptRequest>,
) -> Result<Json<DeliveryRecord>, ApiError> {
    let status = DeliveryStatus::parse(&request.status)
        .filter(DeliveryStatus::is_receipt_status)
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "Invalid receipt status: {}. Expected sent, failed or delivered.",
                request.status
            ))
        })?;

    let repo = DeliveryRecordRepository::new(state.pool.clone());
    let record: DeliveryRecord = repo
        .record_outcome(request.record_id, status, request.failure_reason.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Delivery record not found.".to_string()))?
        .into();

    record_receipt_processed(status.as_str());

    info!(
        record_id = %record.id,
        status = status.as_str(),
        vendor_message_id = request.vendor_message_id.as_deref().unwrap_or(""),
        "Delivery receipt processed"
    );

    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_request_parses_camel_case() {
        let request: DeliveryReceiptRequest = serde_json::from_str(
            r#"{
                "recordId": "00000000-0000-0000-0000-000000000001",
                "status": "failed",
                "failureReason": "Simulated vendor delivery failure",
                "vendorMessageId": "dummy-vendor-1-x"
            }"#,
        )
        .unwrap();
        assert_eq!(request.status, "failed");
        assert_eq!(
            request.failure_reason.as_deref(),
            Some("Simulated vendor delivery failure")
        );
    }

    #[test]
    fn test_receipt_request_optional_fields_default() {
        let request: DeliveryReceiptRequest = serde_json::from_str(
            r#"{"recordId": "00000000-0000-0000-0000-000000000001", "status": "sent"}"#,
        )
        .unwrap();
        assert!(request.failure_reason.is_none());
        assert!(request.vendor_message_id.is_none());
    }

    #[test]
    fn test_pending_is_not_a_receipt_status() {
        let status = DeliveryStatus::parse("pending").filter(DeliveryStatus::is_receipt_status);
        assert!(status.is_none());
    }
}
