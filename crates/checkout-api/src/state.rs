//! # Server State
//!
//! Listener settings and the gateway handle shared by every request.

use checkout_client::GatewayClient;
use checkout_core::BoxedOrderGateway;
use std::net::SocketAddr;
use std::sync::Arc;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Merchant server settings (`HOST`, `PORT`, `ENVIRONMENT`, `DEFAULT_CURRENCY`)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `development`, `staging` or `production`
    pub environment: String,
    /// ISO code used when a session request names no currency
    pub default_currency: String,
}

impl AppConfig {
    /// Read settings from the process environment (and `.env`, if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8080").parse().unwrap_or(8080),
            environment: env_or("ENVIRONMENT", "development"),
            default_currency: env_or("DEFAULT_CURRENCY", "INR").to_uppercase(),
        }
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", raw, e))
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Handed to every handler through `State`
#[derive(Clone)]
pub struct AppState {
    /// Creates orders and verifies webhooks
    pub gateway: BoxedOrderGateway,
    pub config: AppConfig,
}

impl AppState {
    /// Build state around the REST gateway client configured from env
    pub fn new() -> anyhow::Result<Self> {
        let settings = AppConfig::from_env();
        let client = GatewayClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize gateway client: {}", e))?;

        if client.config().webhook_secret.is_none() {
            tracing::warn!("GATEWAY_WEBHOOK_SECRET not set, webhooks will be rejected");
        }

        Ok(Self::with_gateway(Arc::new(client), settings))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(gateway: BoxedOrderGateway, config: AppConfig) -> Self {
        Self { gateway, config }
    }
}
