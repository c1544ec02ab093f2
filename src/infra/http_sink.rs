use crate::app::ports::{SinkPort, SinkStatus};
use crate::envelope::TransformedBookingEvent;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{info, warn};

/// HTTP sink backed by one reusable `reqwest::Client`.
pub struct ReqwestSink {
    client: reqwest::Client,
    url: Option<String>,
}

impl ReqwestSink {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: Option<String>) -> Self {
        Self {
            client,
            url: url.filter(|u| !u.trim().is_empty()),
        }
    }
}

#[async_trait]
impl SinkPort for ReqwestSink {
    async fn probe(&self) -> SinkStatus {
        let Some(url) = self.url.as_deref() else {
            warn!("Sink URL is not configured");
            return SinkStatus::UnknownUrl;
        };

        match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => SinkStatus::Up,
            Ok(resp) => {
                let status = resp.status().as_u16();
                warn!(url = %url, status, "Sink probe returned non-success status");
                SinkStatus::Down { status }
            }
            Err(e) => {
                warn!(url = %url, "Sink probe failed: {}", e);
                SinkStatus::BadConfig { reason: e.to_string() }
            }
        }
    }

    async fn publish(&self, event: &TransformedBookingEvent) -> bool {
        let Some(url) = self.url.as_deref() else {
            warn!("Cannot publish, sink URL is not configured");
            return false;
        };

        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(event)
            .send()
            .await;

        match res {
            Ok(r) if r.status().is_success() => {
                info!(order_id = %event.product_order_id_buyer, "Published booking to sink");
                true
            }
            Ok(r) => {
                warn!(
                    order_id = %event.product_order_id_buyer,
                    "Sink responded with status {}",
                    r.status().as_u16()
                );
                false
            }
            Err(e) => {
                warn!(order_id = %event.product_order_id_buyer, "Failed to publish booking: {}", e);
                false
            }
        }
    }
}
