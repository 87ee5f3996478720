//! Campaign endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::{CampaignRepository, DeliveryRecordRepository};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Operator;
use crate::services::campaign_launch::{CampaignLaunchError, LaunchOutcome};
use domain::models::{Campaign, CampaignWithStats, DeliveryRecord, LaunchCampaignRequest};

/// Launch a campaign: persist it, resolve the audience and start delivery.
///
/// POST /api/v1/campaigns
pub async fn launch_campaign(
    State(state): State<AppState>,
    operator: Operator,
    Json(request): Json<LaunchCampaignRequest>,
) -> Result<(StatusCode, Json<LaunchOutcome>), ApiError> {
    request.validate()?;

    let outcome = state
        .launcher
        .launch(&operator.id, request)
        .await
        .map_err(|e| match e {
            CampaignLaunchError::InvalidRules(msg) => ApiError::Validation(msg),
            CampaignLaunchError::Database(err) => err.into(),
        })?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// List the operator's campaigns, newest first, with delivery stats.
///
/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    operator: Operator,
) -> Result<Json<Vec<CampaignWithStats>>, ApiError> {
    let repo = CampaignRepository::new(state.pool.clone());
    let campaigns: Vec<CampaignWithStats> = repo
        .list_by_owner_with_stats(&operator.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(campaigns))
}

/// A campaign with its delivery breakdown and per-message records.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub audience_size: i64,
    pub sent_count: i64,
    pub failed_count: i64,
    pub pending_count: i64,
    pub records: Vec<DeliveryRecord>,
}

/// Fetch one campaign with its delivery records.
///
/// GET /api/v1/campaigns/:id
///
/// A campaign owned by another operator answers 404, not 403, so ids
/// cannot be probed.
pub async fn get_campaign(
    State(state): State<AppState>,
    operator: Operator,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignDetail>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(id)
        .await?
        .filter(|c| c.created_by_user_id == operator.id)
        .ok_or_else(|| ApiError::NotFound("Campaign not found.".to_string()))?
        .into();

    let deliveries = DeliveryRecordRepository::new(state.pool.clone());
    let stats = deliveries.get_stats(id).await?;
    let records: Vec<DeliveryRecord> = deliveries
        .find_by_campaign(id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(CampaignDetail {
        campaign,
        audience_size: stats.audience_size,
        sent_count: stats.sent_count,
        failed_count: stats.failed_count,
        pending_count: stats.pending_count,
        records,
    }))
}
