//! Simulated delivery vendor.
//!
//! Stands in for a real messaging provider during local development and
//! demos. Accepting a message returns immediately; a background task then
//! waits a random 500-1500ms and calls back to the delivery receipt
//! endpoint with a 90% sent / 10% failed outcome, exercising the same
//! reconciliation path a production vendor would.

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DeliveryConfig;

/// Acceptance request as posted by the dispatcher.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSendRequest {
    pub record_id: Uuid,
    pub customer_id: Uuid,
    pub message_content: String,
}

/// Acknowledgement returned to the dispatcher.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSendAck {
    pub record_id: Uuid,
    pub accepted: bool,
    /// Vendor-side tracking id, echoed later on the receipt.
    pub vendor_message_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptPayload {
    record_id: Uuid,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<&'static str>,
    vendor_message_id: String,
}

fn vendor_message_id(record_id: Uuid) -> String {
    format!(
        "dummy-vendor-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        record_id
    )
}

pub struct VendorSimulator {
    client: Client,
    receipt_url: String,
}

impl VendorSimulator {
    pub fn new(config: &DeliveryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            receipt_url: config.receipt_url.clone(),
        })
    }

    /// Accept a message for delivery and schedule its receipt callback.
    pub fn accept(&self, request: VendorSendRequest) -> VendorSendAck {
        // Outcome and delay are drawn before spawning; thread_rng is not
        // usable across an await point.
        let (delay_ms, succeeded) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(500..=1500), rng.gen_bool(0.9))
        };
        let tracking_id = vendor_message_id(request.record_id);

        info!(
            record_id = %request.record_id,
            vendor_message_id = %tracking_id,
            delay_ms = delay_ms,
            "Vendor accepted message, receipt scheduled"
        );

        let client = self.client.clone();
        let receipt_url = self.receipt_url.clone();
        let record_id = request.record_id;
        let callback_tracking_id = tracking_id.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;

            let payload = ReceiptPayload {
                record_id,
                status: if succeeded { "sent" } else { "failed" },
                failure_reason: if succeeded {
                    None
                } else {
                    Some("Simulated vendor delivery failure")
                },
                vendor_message_id: callback_tracking_id,
            };

            match client.post(&receipt_url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(record_id = %record_id, status = payload.status, "Receipt delivered");
                }
                Ok(response) => {
                    warn!(
                        record_id = %record_id,
                        status = response.status().as_u16(),
                        "Receipt endpoint rejected callback"
                    );
                }
                Err(e) => {
                    warn!(record_id = %record_id, error = %e, "Receipt callback failed");
                }
            }
        });

        VendorSendAck {
            record_id: request.record_id,
            accepted: true,
            vendor_message_id: tracking_id,
        }
    }
}
