//! Customer domain model and request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A customer record as the segmentation pipeline sees it.
///
/// Customers are owned by the store: the campaign pipeline only ever reads
/// them, mutations happen through the order-recording path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub total_spend: f64,
    pub visit_count: i32,
    pub last_active_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The projection a campaign launch needs per matched customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Request payload for creating a customer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 200, message = "Please provide a name for the customer."))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_email_format"))]
    pub email: String,

    #[validate(range(min = 0.0, message = "totalSpend cannot be negative."))]
    #[serde(default)]
    pub total_spend: f64,

    #[validate(range(min = 0, message = "visitCount cannot be negative."))]
    #[serde(default)]
    pub visit_count: i32,

    /// Defaults to the creation time when omitted.
    pub last_active_date: Option<DateTime<Utc>>,
}
