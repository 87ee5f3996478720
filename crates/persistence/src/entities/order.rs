//! Order entity definitions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Order;

/// Database entity for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderEntity> for Order {
    fn from(e: OrderEntity) -> Self {
        Order {
            id: e.id,
            customer_id: e.customer_id,
            amount: e.amount,
            order_date: e.order_date,
            created_at: e.created_at,
        }
    }
}

/// Order joined with the customer it belongs to, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct OrderWithCustomerEntity {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
}
