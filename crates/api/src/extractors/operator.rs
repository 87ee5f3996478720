//! Operator identity extractor.
//!
//! Session management lives in a separate frontend/gateway layer; by the
//! time a request reaches this service the authenticated operator id is
//! carried in the `X-Operator-Id` header. Routes that act on behalf of an
//! operator take this extractor and reject requests without one.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the authenticated operator id.
pub const OPERATOR_ID_HEADER: &str = "X-Operator-Id";

/// The operator on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(OPERATOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthorized("Unauthorized. Session or user ID missing.".to_string())
            })?;

        Ok(Operator { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_operator_id() {
        let req = Request::builder()
            .header(OPERATOR_ID_HEADER, "user-42")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let operator = Operator::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(operator.id, "user-42");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let result = Operator::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_blank_header_is_unauthorized() {
        let req = Request::builder()
            .header(OPERATOR_ID_HEADER, "   ")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let result = Operator::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
