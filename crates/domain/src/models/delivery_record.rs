//! Delivery record model and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-message delivery status.
///
/// Records are created `pending` at fan-out time and moved to one of the
/// other states by the delivery receipt endpoint. The reconciler does not
/// enforce at-most-one transition; a later receipt overwrites an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
    Delivered,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Delivered => "delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Statuses a delivery receipt is allowed to report.
    pub fn is_receipt_status(&self) -> bool {
        matches!(self, Self::Sent | Self::Failed | Self::Delivered)
    }

    /// Counts toward `sentCount` in campaign stats.
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Sent | Self::Delivered)
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outbound message: campaign x customer, with its frozen content and
/// delivery outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub customer_id: Uuid,
    pub status: DeliveryStatus,
    /// Personalized text, computed once at fan-out and never rewritten.
    pub message_content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::Sent,
            DeliveryStatus::Failed,
            DeliveryStatus::Delivered,
        ] {
            assert_eq!(DeliveryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeliveryStatus::parse("queued"), None);
    }

    #[test]
    fn test_receipt_statuses() {
        assert!(DeliveryStatus::Sent.is_receipt_status());
        assert!(DeliveryStatus::Failed.is_receipt_status());
        assert!(DeliveryStatus::Delivered.is_receipt_status());
        assert!(!DeliveryStatus::Pending.is_receipt_status());
    }

    #[test]
    fn test_successful_statuses() {
        assert!(DeliveryStatus::Sent.is_successful());
        assert!(DeliveryStatus::Delivered.is_successful());
        assert!(!DeliveryStatus::Failed.is_successful());
        assert!(!DeliveryStatus::Pending.is_successful());
    }
}
