//! Order endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use persistence::entities::OrderWithCustomerEntity;
use persistence::repositories::{CustomerRepository, OrderRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Operator;
use domain::models::{CreateOrderRequest, Order};

/// An order joined with the customer it belongs to, for listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCustomer {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
}

impl From<OrderWithCustomerEntity> for OrderWithCustomer {
    fn from(entity: OrderWithCustomerEntity) -> Self {
        Self {
            id: entity.id,
            customer_id: entity.customer_id,
            amount: entity.amount,
            order_date: entity.order_date,
            created_at: entity.created_at,
            customer_name: entity.customer_name,
            customer_email: entity.customer_email,
        }
    }
}

/// Record an order and fold it into the customer's aggregates.
///
/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    request.validate()?;

    let customers = CustomerRepository::new(state.pool.clone());
    customers
        .find_by_id(request.customer_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Customer not found with the provided ID.".to_string())
        })?;

    let repo = OrderRepository::new(state.pool.clone());
    let order: Order = repo
        .create(request.customer_id, request.amount, request.order_date)
        .await?
        .into();

    info!(
        order_id = %order.id,
        customer_id = %order.customer_id,
        amount = order.amount,
        "Order recorded"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders, newest first, with customer details.
///
/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _operator: Operator,
) -> Result<Json<Vec<OrderWithCustomer>>, ApiError> {
    let repo = OrderRepository::new(state.pool.clone());
    let orders: Vec<OrderWithCustomer> = repo.list().await?.into_iter().map(Into::into).collect();

    Ok(Json(orders))
}
