//! AI assist endpoints.
//!
//! All three endpoints are thin prompt wrappers over the text generation
//! client. They answer 503 when no API key is configured and 502 when the
//! upstream model fails or returns something unusable.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Operator;
use crate::services::text_generation::{extract_json, TextGenerationError};
use domain::models::Rule;

impl From<TextGenerationError> for ApiError {
    fn from(err: TextGenerationError) -> Self {
        match err {
            TextGenerationError::Disabled => {
                ApiError::ServiceUnavailable("AI features are not configured.".to_string())
            }
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NlToRulesRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct NlToRulesResponse {
    pub rules: Vec<Rule>,
}

/// Translate a natural-language audience description into segment rules.
///
/// POST /api/v1/ai/nl-to-rules
pub async fn nl_to_rules(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<NlToRulesRequest>,
) -> Result<Json<NlToRulesResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt must not be empty.".to_string()));
    }

    let prompt = format!(
        "Convert this audience description into segmentation rules.\n\
         Available fields: totalSpend (number), visitCount (number), \
         lastActiveDate (number of days of inactivity).\n\
         Available operators: >, <, =, >=, <=.\n\
         Respond with ONLY a raw JSON array of objects with keys \
         \"field\", \"operator\" and \"value\". No explanation, no markdown.\n\n\
         Description: {}",
        request.prompt.trim()
    );

    let text = state.text_gen.generate(&prompt).await?;

    let rules: Vec<Rule> = serde_json::from_str(extract_json(&text)).map_err(|e| {
        warn!(error = %e, "Model returned unparseable rules");
        ApiError::Upstream("The model did not return valid segmentation rules.".to_string())
    })?;

    Ok(Json(NlToRulesResponse { rules }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSuggestionsRequest {
    pub objective: String,
}

#[derive(Debug, Serialize)]
pub struct MessageSuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Draft message templates for a campaign objective.
///
/// POST /api/v1/ai/message-suggestions
pub async fn message_suggestions(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<MessageSuggestionsRequest>,
) -> Result<Json<MessageSuggestionsResponse>, ApiError> {
    if request.objective.trim().is_empty() {
        return Err(ApiError::Validation(
            "Objective must not be empty.".to_string(),
        ));
    }

    let prompt = format!(
        "Write 3 short marketing message templates for this campaign objective. \
         Use {{{{name}}}} as a placeholder for the customer's name. \
         Return one message per line, nothing else.\n\n\
         Objective: {}",
        request.objective.trim()
    );

    let text = state.text_gen.generate(&prompt).await?;
    let suggestions = split_suggestions(&text);

    Ok(Json(MessageSuggestionsResponse { suggestions }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeCampaignRequest {
    pub campaign_name: String,
    #[serde(default)]
    pub message_template: String,
    pub audience_size: i64,
    pub sent_count: i64,
    pub failed_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SummarizeCampaignResponse {
    pub summary: String,
}

/// Produce a human-readable performance summary for a campaign.
///
/// POST /api/v1/ai/summarize-campaign
///
/// Stats come from the request body, so the caller summarizes whatever
/// numbers it is currently displaying.
pub async fn summarize_campaign(
    State(state): State<AppState>,
    _operator: Operator,
    Json(request): Json<SummarizeCampaignRequest>,
) -> Result<Json<SummarizeCampaignResponse>, ApiError> {
    let success_rate = if request.audience_size > 0 {
        (request.sent_count as f64 / request.audience_size as f64) * 100.0
    } else {
        0.0
    };

    let prompt = format!(
        "Summarize this marketing campaign's performance in 2-3 sentences \
         for a business user. Be concrete about the numbers.\n\n\
         Campaign: {}\n\
         Message template: {}\n\
         Audience size: {}\n\
         Messages delivered: {}\n\
         Messages failed: {}\n\
         Delivery success rate: {:.1}%",
        request.campaign_name,
        request.message_template,
        request.audience_size,
        request.sent_count,
        request.failed_count,
        success_rate
    );

    let summary = state.text_gen.generate(&prompt).await?;

    Ok(Json(SummarizeCampaignResponse {
        summary: summary.trim().to_string(),
    }))
}

/// Split model output into individual suggestions.
///
/// Accepts one-per-line output with optional "1." style numbering. Falls
/// back to the whole text as a single suggestion when every line filters
/// out.
fn split_suggestions(text: &str) -> Vec<String> {
    let suggestions: Vec<String> = text
        .lines()
        .map(strip_list_prefix)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if suggestions.is_empty() {
        vec![text.trim().to_string()]
    } else {
        suggestions
    }
}

/// Remove a leading "1." / "2)" / "-" list marker from a line.
fn strip_list_prefix(line: &str) -> &str {
    let trimmed = line.trim();
    let without_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() < trimmed.len() {
        if let Some(rest) = without_digits
            .strip_prefix('.')
            .or_else(|| without_digits.strip_prefix(')'))
        {
            return rest.trim();
        }
        return trimmed;
    }
    trimmed.strip_prefix("- ").unwrap_or(trimmed)
}
