//! Delivery dispatcher.
//!
//! Hands each delivery record of a campaign launch to the external vendor.
//! Dispatch is fire-and-forget: one task is spawned per record, all tasks
//! run concurrently with no cap, and the caller returns as soon as every
//! task has been spawned. The vendor's acceptance response only means the
//! message was taken for processing; the real outcome arrives later through
//! the delivery receipt endpoint.
//!
//! An acceptance call that fails is logged and dropped. The record stays
//! `pending` and nothing retries it; there is no correction path for a
//! vendor that never picks the message up.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DeliveryConfig;

/// One unit of dispatch work: the wire triple the vendor needs.
#[derive(Debug, Clone)]
pub struct DispatchItem {
    pub record_id: Uuid,
    pub customer_id: Uuid,
    pub message_content: String,
}

/// Payload sent to the vendor's send-message endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VendorSendPayload {
    record_id: Uuid,
    customer_id: Uuid,
    message_content: String,
}

/// Process-wide dispatcher. Holds a single reqwest client, created once at
/// startup and injected into the orchestrator through `AppState`.
pub struct DeliveryDispatcher {
    client: Client,
    vendor_url: String,
}

impl DeliveryDispatcher {
    /// Create the dispatcher and its HTTP client.
    pub fn new(config: &DeliveryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            vendor_url: config.vendor_url.clone(),
        })
    }

    /// Dispatch a batch of records to the vendor.
    ///
    /// Returns the number of dispatch tasks spawned. Completion of the
    /// spawned tasks is intentionally not awaited; per-record outcomes are
    /// reconciled through the receipt endpoint.
    pub fn dispatch_batch(&self, items: Vec<DispatchItem>) -> usize {
        let count = items.len();
        info!(count = count, "Dispatching messages to delivery vendor");

        for item in items {
            let client = self.client.clone();
            let vendor_url = self.vendor_url.clone();

            tokio::spawn(async move {
                let payload = VendorSendPayload {
                    record_id: item.record_id,
                    customer_id: item.customer_id,
                    message_content: item.message_content,
                };

                match client.post(&vendor_url).json(&payload).send().await {
                    Ok(response) if response.status().is_success() => {
                        info!(
                            record_id = %item.record_id,
                            "Message accepted by delivery vendor"
                        );
                    }
                    Ok(response) => {
                        warn!(
                            record_id = %item.record_id,
                            status = response.status().as_u16(),
                            "Vendor rejected message acceptance call"
                        );
                    }
                    Err(e) => {
                        // No retry; the record stays pending.
                        warn!(
                            record_id = %item.record_id,
                            error = %e,
                            "Failed to reach delivery vendor"
                        );
                    }
                }
            });
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DeliveryConfig {
        DeliveryConfig {
            vendor_url: "http://127.0.0.1:9/api/v1/vendor/send-message".to_string(),
            receipt_url: "http://127.0.0.1:9/api/v1/delivery-receipts".to_string(),
            request_timeout_secs: 1,
        }
    }

    #[test]
    fn test_vendor_payload_is_camel_case() {
        let payload = VendorSendPayload {
            record_id: Uuid::nil(),
            customer_id: Uuid::nil(),
            message_content: "Hi Alice".to_string(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"recordId\""));
        assert!(json.contains("\"customerId\""));
        assert!(json.contains("\"messageContent\":\"Hi Alice\""));
    }

    #[tokio::test]
    async fn test_dispatch_batch_returns_spawn_count() {
        let dispatcher = DeliveryDispatcher::new(&test_config()).unwrap();
        let items = vec![
            DispatchItem {
                record_id: Uuid::new_v4(),
                customer_id: Uuid::new_v4(),
                message_content: "a".into(),
            },
            DispatchItem {
                record_id: Uuid::new_v4(),
                customer_id: Uuid::new_v4(),
                message_content: "b".into(),
            },
        ];
        // Port 9 is unreachable; the spawned tasks log and drop, the call
        // itself still reports both dispatches as initiated.
        assert_eq!(dispatcher.dispatch_batch(items), 2);
    }

    #[tokio::test]
    async fn test_dispatch_empty_batch() {
        let dispatcher = DeliveryDispatcher::new(&test_config()).unwrap();
        assert_eq!(dispatcher.dispatch_batch(Vec::new()), 0);
    }
}
