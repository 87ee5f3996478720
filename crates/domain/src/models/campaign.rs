//! Campaign aggregate and lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::rule::Rule;

/// Campaign lifecycle status.
///
/// Status is the only field that changes after a campaign is created, and it
/// advances monotonically:
///
/// ```text
/// draft -> processing -> active
///               |------> completed_no_audience (terminal)
///               |------> completed_no_logs     (terminal, anomalous)
/// ```
///
/// `active` campaigns are not advanced further by the pipeline; per-message
/// outcomes live on the delivery records instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Processing,
    Active,
    Completed,
    CompletedNoAudience,
    CompletedNoLogs,
    Archived,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Processing => "processing",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::CompletedNoAudience => "completed_no_audience",
            Self::CompletedNoLogs => "completed_no_logs",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "processing" => Some(Self::Processing),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "completed_no_audience" => Some(Self::CompletedNoAudience),
            "completed_no_logs" => Some(Self::CompletedNoLogs),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A campaign as stored and returned by the API.
///
/// `segment_rules` holds the rule list verbatim as submitted so a campaign's
/// audience definition can be audited or replayed later.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub segment_rules: serde_json::Value,
    pub message_template: String,
    pub created_by_user_id: String,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// Campaign annotated with delivery stats derived from its records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWithStats {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub audience_size: i64,
    /// Records with status `sent` or `delivered`.
    pub sent_count: i64,
    pub failed_count: i64,
}

/// Request payload for launching a campaign.
///
/// `segment_rules` is kept as raw JSON rather than a typed rule list: the
/// submitted array is what gets persisted for audit/replay, so normalizing
/// it through [`Rule`] here would rewrite operators the parser does not
/// recognize before storage.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LaunchCampaignRequest {
    #[validate(length(min = 1, max = 200, message = "Please provide a campaign name."))]
    pub name: String,

    pub segment_rules: serde_json::Value,

    #[validate(length(
        min = 1,
        message = "Please provide a message template for the campaign."
    ))]
    pub message_template: String,
}

impl LaunchCampaignRequest {
    /// Parse the verbatim rule payload into typed rules for compilation.
    pub fn parsed_rules(&self) -> Result<Vec<Rule>, serde_json::Error> {
        serde_json::from_value(self.segment_rules.clone())
    }
}
