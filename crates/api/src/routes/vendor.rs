//! Simulated vendor endpoint.

use axum::{extract::State, http::StatusCode, Json};

use crate::app::AppState;
use crate::services::vendor_sim::{VendorSendAck, VendorSendRequest};

/// Accept a message for delivery.
///
/// POST /api/v1/vendor/send-message
///
/// Returns 202 immediately; the outcome arrives later through the
/// delivery receipt endpoint.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<VendorSendRequest>,
) -> (StatusCode, Json<VendorSendAck>) {
    let ack = state.vendor.accept(request);
    (StatusCode::ACCEPTED, Json(ack))
}
