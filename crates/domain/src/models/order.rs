//! Order model and request DTO.
//!
//! Orders are the ingestion path that keeps the segmentation attributes
//! (`totalSpend`, `visitCount`, `lastActiveDate`) fresh; recording one also
//! updates the referenced customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for recording an order.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,

    #[validate(range(min = 0.0, message = "Order amount cannot be negative."))]
    pub amount: f64,

    /// Defaults to now when omitted.
    pub order_date: Option<DateTime<Utc>>,
}
