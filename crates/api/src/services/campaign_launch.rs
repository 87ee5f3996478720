//! Campaign launch orchestration.
//!
//! Runs the full launch flow synchronously inside the request:
//! persist the campaign, resolve the audience, write pending delivery
//! records, hand the batch to the dispatcher and settle the campaign
//! status. Terminal no-audience and no-logs statuses short-circuit the
//! pipeline before any dispatch happens.

use std::sync::Arc;

use domain::models::{Campaign, CampaignStatus, CustomerSummary, LaunchCampaignRequest};
use domain::services::{compile_rules, personalize_message};
use persistence::repositories::{CampaignRepository, CustomerRepository, DeliveryRecordRepository};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::middleware::metrics::{record_campaign_launched, record_messages_dispatched};
use crate::services::dispatcher::{DeliveryDispatcher, DispatchItem};

#[derive(Debug, Error)]
pub enum CampaignLaunchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid segment rules: {0}")]
    InvalidRules(String),
}

/// What a launch call resolved to, shaped for the HTTP response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOutcome {
    pub campaign: Campaign,
    pub audience_size: i64,
    pub dispatched: usize,
    pub message: String,
}

pub struct CampaignLauncher {
    campaigns: CampaignRepository,
    customers: CustomerRepository,
    deliveries: DeliveryRecordRepository,
    dispatcher: Arc<DeliveryDispatcher>,
}

impl CampaignLauncher {
    pub fn new(pool: PgPool, dispatcher: Arc<DeliveryDispatcher>) -> Self {
        Self {
            campaigns: CampaignRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            deliveries: DeliveryRecordRepository::new(pool),
            dispatcher,
        }
    }

    /// Launch a campaign for the given operator.
    ///
    /// The campaign row is created first in `processing` so a failure later
    /// in the flow leaves a visible record of the attempt. If the process
    /// dies between that insert and the final status update the campaign
    /// stays `processing`; there is no recovery sweep.
    pub async fn launch(
        &self,
        operator_id: &str,
        request: LaunchCampaignRequest,
    ) -> Result<LaunchOutcome, CampaignLaunchError> {
        // Typed rules drive audience matching; the raw payload is what gets
        // stored, so unrecognized operators reach the audit trail unchanged.
        let rules = request
            .parsed_rules()
            .map_err(|e| CampaignLaunchError::InvalidRules(e.to_string()))?;

        let campaign: Campaign = self
            .campaigns
            .create(
                &request.name,
                &request.segment_rules,
                &request.message_template,
                operator_id,
                CampaignStatus::Processing,
            )
            .await?
            .into();

        info!(
            campaign_id = %campaign.id,
            operator_id = %operator_id,
            "Campaign created, resolving audience"
        );

        let filter = compile_rules(&rules);
        let audience: Vec<CustomerSummary> = self
            .customers
            .find_matching(&filter)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        record_campaign_launched(audience.len());

        if audience.is_empty() {
            warn!(campaign_id = %campaign.id, "Campaign matched no customers");
            let campaign: Campaign = self
                .campaigns
                .update_status(campaign.id, CampaignStatus::CompletedNoAudience)
                .await?
                .into();
            return Ok(LaunchOutcome {
                campaign,
                audience_size: 0,
                dispatched: 0,
                message: "Campaign created but no matching customers found.".to_string(),
            });
        }

        let audience_size = audience.len() as i64;
        let entries = personalized_entries(&campaign.message_template, &audience);

        let records = self.deliveries.create_batch(campaign.id, &entries).await?;

        if records.is_empty() {
            error!(campaign_id = %campaign.id, "No delivery records were created");
            let campaign: Campaign = self
                .campaigns
                .update_status(campaign.id, CampaignStatus::CompletedNoLogs)
                .await?
                .into();
            return Ok(LaunchOutcome {
                campaign,
                audience_size,
                dispatched: 0,
                message: "Campaign created but delivery logging failed.".to_string(),
            });
        }

        let items: Vec<DispatchItem> = records
            .iter()
            .map(|r| DispatchItem {
                record_id: r.id,
                customer_id: r.customer_id,
                message_content: r.message_content.clone(),
            })
            .collect();

        let dispatched = self.dispatcher.dispatch_batch(items);
        record_messages_dispatched(dispatched);

        let campaign: Campaign = self
            .campaigns
            .update_status(campaign.id, CampaignStatus::Active)
            .await?
            .into();

        info!(
            campaign_id = %campaign.id,
            audience_size = audience_size,
            dispatched = dispatched,
            "Campaign launched"
        );

        Ok(LaunchOutcome {
            campaign,
            audience_size,
            dispatched,
            message: format!("Campaign launched to {} customers.", audience_size),
        })
    }
}

/// Render the message template once per audience member.
///
/// Kept separate from the launch flow so the fan-out step can be tested
/// without a database.
fn personalized_entries(template: &str, audience: &[CustomerSummary]) -> Vec<(Uuid, String)> {
    audience
        .iter()
        .map(|c| (c.id, personalize_message(template, &c.name, &c.email)))
        .collect()
}
