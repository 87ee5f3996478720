//! Customer endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use persistence::repositories::CustomerRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Operator;
use domain::models::{CreateCustomerRequest, Customer};

/// Create a new customer.
///
/// POST /api/v1/customers
pub async fn create_customer(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    request.validate()?;

    let repo = CustomerRepository::new(state.pool.clone());
    let entity = repo
        .create(
            &request.name,
            &request.email,
            request.total_spend,
            request.visit_count,
            request.last_active_date,
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("A customer with this email already exists.".to_string())
            }
            other => other,
        })?;

    let customer: Customer = entity.into();

    info!(customer_id = %customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(customer)))
}

/// List all customers, newest first.
///
/// GET /api/v1/customers
pub async fn list_customers(
    State(state): State<AppState>,
    _operator: Operator,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let repo = CustomerRepository::new(state.pool.clone());
    let customers: Vec<Customer> = repo.list().await?.into_iter().map(Into::into).collect();

    Ok(Json(customers))
}
