//! # Gateway Configuration
//!
//! Configuration for talking to the payment gateway.
//! All secrets are loaded from environment variables.

use checkout_core::{GatewayError, DEFAULT_CHECKOUT_BASE_URL};
use std::env;

/// Gateway API served by the local development stack
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Gateway API configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant API key (sent as `X-Api-Key`, also the widget's public key)
    pub api_key: String,

    /// Merchant API secret (sent as `X-Api-Secret`, never leaves the server)
    pub api_secret: String,

    /// Webhook signing secret (whsec_...), needed only to verify webhooks
    pub webhook_secret: Option<String>,

    /// API base URL
    pub api_base_url: String,

    /// Hosted checkout base URL handed to the widget
    pub checkout_base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `GATEWAY_API_KEY`
    /// - `GATEWAY_API_SECRET`
    ///
    /// Optional:
    /// - `GATEWAY_WEBHOOK_SECRET` (must start with `whsec_`)
    /// - `GATEWAY_API_URL` (default `http://localhost:8000`)
    /// - `GATEWAY_CHECKOUT_URL` (default `http://localhost:3001`)
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_key = required_var("GATEWAY_API_KEY")?;
        let api_secret = required_var("GATEWAY_API_SECRET")?;

        let webhook_secret = env::var("GATEWAY_WEBHOOK_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        if let Some(ref secret) = webhook_secret {
            if !secret.starts_with("whsec_") {
                return Err(GatewayError::Configuration(
                    "GATEWAY_WEBHOOK_SECRET must start with whsec_".to_string(),
                ));
            }
        }

        let mut config = Self::new(api_key, api_secret);
        config.webhook_secret = webhook_secret;

        if let Ok(url) = env::var("GATEWAY_API_URL") {
            config = config.with_api_base_url(url);
        }
        if let Ok(url) = env::var("GATEWAY_CHECKOUT_URL") {
            config = config.with_checkout_base_url(url);
        }

        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            webhook_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            checkout_base_url: DEFAULT_CHECKOUT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("key_test_")
    }

    /// Authentication headers for every API call
    pub fn auth_headers(&self) -> [(&'static str, &str); 2] {
        [
            ("X-Api-Key", self.api_key.as_str()),
            ("X-Api-Secret", self.api_secret.as_str()),
        ]
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set the hosted checkout base URL
    pub fn with_checkout_base_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_base_url = url.into();
        self
    }

    /// Builder: set the webhook signing secret
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Builder: set the request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn required_var(name: &str) -> Result<String, GatewayError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| GatewayError::Configuration(format!("{} not set", name)))
}
