//! # Webhook Dashboard API
//!
//! Merchant webhook settings and delivery logs.

use crate::client::GatewayClient;
use checkout_core::{GatewayError, GatewayResult, Merchant, WebhookLogPage, WebhookStatus};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// Default page size for webhook logs
pub const DEFAULT_LOG_LIMIT: u32 = 10;

#[derive(Debug, Serialize)]
struct UpdateWebhookRequest<'a> {
    webhook_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct WebhookSecretResponse {
    webhook_secret: String,
}

/// Response of `POST /api/v1/webhooks/{id}/retry`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryResponse {
    pub id: Uuid,
    pub status: WebhookStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl GatewayClient {
    /// Fetch the authenticated merchant (`GET /api/v1/merchants/me`)
    #[instrument(skip(self))]
    pub async fn merchant(&self) -> GatewayResult<Merchant> {
        self.send_json(self.request(Method::GET, "/api/v1/merchants/me"))
            .await
    }

    /// Set the webhook URL (`PUT /api/v1/merchants/me/webhook`).
    ///
    /// An empty URL turns delivery off.
    #[instrument(skip(self))]
    pub async fn update_webhook_url(&self, webhook_url: &str) -> GatewayResult<Merchant> {
        let webhook_url = webhook_url.trim();
        if !webhook_url.is_empty() {
            let parsed = reqwest::Url::parse(webhook_url).map_err(|e| {
                GatewayError::InvalidRequest(format!("Invalid webhook URL: {}", e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(GatewayError::InvalidRequest(
                    "Webhook URL must use http or https".to_string(),
                ));
            }
        }

        let merchant: Merchant = self
            .send_json(
                self.request(Method::PUT, "/api/v1/merchants/me/webhook")
                    .json(&UpdateWebhookRequest { webhook_url }),
            )
            .await?;

        info!("Webhook URL updated: configured={}", merchant.has_webhook());
        Ok(merchant)
    }

    /// Rotate the webhook signing secret (`POST /api/v1/merchants/me/webhook/secret`)
    #[instrument(skip(self))]
    pub async fn regenerate_webhook_secret(&self) -> GatewayResult<String> {
        let response: WebhookSecretResponse = self
            .send_json(self.request(Method::POST, "/api/v1/merchants/me/webhook/secret"))
            .await?;

        info!("Webhook secret regenerated");
        Ok(response.webhook_secret)
    }

    /// List webhook deliveries, newest first (`GET /api/v1/webhooks`)
    #[instrument(skip(self))]
    pub async fn list_webhook_logs(&self, limit: u32, offset: u32) -> GatewayResult<WebhookLogPage> {
        let limit = if limit == 0 { DEFAULT_LOG_LIMIT } else { limit };

        let mut page: WebhookLogPage = self
            .send_json(
                self.request(Method::GET, "/api/v1/webhooks")
                    .query(&[("limit", limit), ("offset", offset)]),
            )
            .await?;

        page.limit.get_or_insert(limit);
        page.offset.get_or_insert(offset);
        Ok(page)
    }

    /// Re-queue a delivery (`POST /api/v1/webhooks/{id}/retry`)
    #[instrument(skip(self))]
    pub async fn retry_webhook(&self, id: Uuid) -> GatewayResult<RetryResponse> {
        let path = format!("/api/v1/webhooks/{}/retry", id);
        let response: RetryResponse = self.send_json(self.request(Method::POST, &path)).await?;

        info!("Webhook {} re-queued: status={:?}", id, response.status);
        Ok(response)
    }
}
