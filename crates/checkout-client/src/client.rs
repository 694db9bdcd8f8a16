//! # Gateway Client
//!
//! HTTP client for the gateway REST API. Every call authenticates with the
//! merchant's `X-Api-Key` / `X-Api-Secret` pair, so this belongs on the
//! merchant server and never in the browser.

use crate::config::GatewayConfig;
use crate::webhook;
use async_trait::async_trait;
use checkout_core::{
    CreateOrderRequest, GatewayError, GatewayResult, Order, OrderGateway, WebhookEvent,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Gateway REST client
#[derive(Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    /// Create a new client
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Start an authenticated request against an API path
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_base_url, path);
        let mut builder = self.client.request(method, url);
        for (name, value) in self.config.auth_headers() {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Send a request and decode a JSON body, mapping failures to `GatewayError`
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GatewayResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Gateway API error: status={}, body={}", status, body);

            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(ApiErrorResponse::into_message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(GatewayError::NotFound(message));
            }

            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            GatewayError::Serialization(format!("Failed to parse gateway response: {}", e))
        })
    }

    /// Create an order (`POST /api/v1/orders`)
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<Order> {
        if request.amount <= 0 {
            return Err(GatewayError::InvalidRequest(
                "Order amount must be positive".to_string(),
            ));
        }

        debug!("Creating gateway order");

        let order: Order = self
            .send_json(self.request(Method::POST, "/api/v1/orders").json(request))
            .await?;

        info!("Created gateway order: id={}", order.id);
        Ok(order)
    }
}

#[async_trait]
impl OrderGateway for GatewayClient {
    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<Order> {
        GatewayClient::create_order(self, request).await
    }

    fn verify_webhook(&self, payload: &[u8], signature: &str) -> GatewayResult<WebhookEvent> {
        let secret = self.config.webhook_secret.as_deref().ok_or_else(|| {
            GatewayError::Configuration("GATEWAY_WEBHOOK_SECRET not set".to_string())
        })?;
        webhook::verify_webhook(payload, signature, secret)
    }

    fn public_key(&self) -> &str {
        &self.config.api_key
    }

    fn checkout_base_url(&self) -> &str {
        &self.config.checkout_base_url
    }
}

/// Error bodies the gateway returns: `{"error": {"code", "description"}}`
/// or a flat `{"error": "...", "message": "..."}`
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiErrorResponse {
    fn into_message(self) -> Option<String> {
        if let Some(message) = self.message {
            return Some(message);
        }
        match self.error? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(obj) => obj
                .get("description")
                .or_else(|| obj.get("message"))
                .or_else(|| obj.get("code"))
                .and_then(|v| v.as_str())
                .map(String::from),
            _ => None,
        }
    }
}
