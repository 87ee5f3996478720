//! Segment preview endpoint.

use axum::{extract::State, Json};
use persistence::repositories::CustomerRepository;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Operator;
use domain::models::Rule;
use domain::services::compile_rules;

#[derive(Debug, Deserialize)]
pub struct PreviewSegmentRequest {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Serialize)]
pub struct PreviewSegmentResponse {
    pub count: i64,
}

/// Count the customers a rule set would reach, without launching anything.
///
/// POST /api/v1/segments/preview
pub async fn preview_segment(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<PreviewSegmentRequest>,
) -> Result<Json<PreviewSegmentResponse>, ApiError> {
    let filter = compile_rules(&request.rules);

    let repo = CustomerRepository::new(state.pool.clone());
    let count = repo.count_matching(&filter).await?;

    debug!(rules = request.rules.len(), count = count, "Segment previewed");

    Ok(Json(PreviewSegmentResponse { count }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_request_defaults_to_empty_rules() {
        let request: PreviewSegmentRequest = serde_json::from_str("{}").unwrap();
        assert!(request.rules.is_empty());
    }

    #[test]
    fn test_preview_request_parses_rules() {
        let request: PreviewSegmentRequest = serde_json::from_str(
            r#"{"rules":[{"field":"totalSpend","operator":">","value":1000}]}"#,
        )
        .unwrap();
        assert_eq!(request.rules.len(), 1);
        assert_eq!(request.rules[0].field, "totalSpend");
    }

    #[test]
    fn test_preview_response_shape() {
        let json = serde_json::to_value(PreviewSegmentResponse { count: 42 }).unwrap();
        assert_eq!(json["count"], 42);
    }
}
