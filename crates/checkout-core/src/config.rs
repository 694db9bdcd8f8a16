//! # Embed Configuration
//!
//! Caller-supplied settings for one embedded checkout.
//! The widget decodes these from the JS options object, so field names
//! follow the camelCase the integrator writes (`key`, `orderId`, `baseUrl`).

use serde::{Deserialize, Serialize};
use tracing::error;

/// Hosted checkout served by the local development stack
pub const DEFAULT_CHECKOUT_BASE_URL: &str = "http://localhost:3001";

/// Logged when a checkout is configured without a merchant key
pub const MISSING_KEY_MESSAGE: &str = "PaymentGateway: API Key is required";

/// Which origins may post messages into an open checkout.
///
/// The default accepts every origin. The hosted checkout contract does not
/// pin an origin, so integrators that know theirs opt in with `Exact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum OriginPolicy {
    /// Accept messages from any origin
    #[default]
    Any,
    /// Accept messages only from this origin (scheme://host[:port])
    Exact(String),
}

impl OriginPolicy {
    /// Check whether a message from `origin` should be handled
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            OriginPolicy::Any => true,
            OriginPolicy::Exact(expected) => {
                expected.trim_end_matches('/') == origin.trim_end_matches('/')
            }
        }
    }
}

impl From<Option<String>> for OriginPolicy {
    fn from(origin: Option<String>) -> Self {
        match origin {
            Some(o) if !o.trim().is_empty() && o.trim() != "*" => OriginPolicy::Exact(o),
            _ => OriginPolicy::Any,
        }
    }
}

impl From<OriginPolicy> for Option<String> {
    fn from(policy: OriginPolicy) -> Self {
        match policy {
            OriginPolicy::Any => None,
            OriginPolicy::Exact(o) => Some(o),
        }
    }
}

/// Settings for one checkout attempt (immutable once the controller owns it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Merchant public key passed through to the hosted checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Backend-created order to resolve inside the hosted checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Origin + path prefix of the hosted checkout application.
    /// `null`, missing and blank all mean [`DEFAULT_CHECKOUT_BASE_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Inbound message origin filter
    #[serde(default, rename = "allowedOrigin")]
    pub origin_policy: OriginPolicy,
}


impl EmbedConfig {
    /// Create a configuration for the given merchant key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Builder: set the order reference
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Builder: set the hosted checkout base address
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builder: restrict inbound messages to one origin
    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin_policy = OriginPolicy::from(Some(origin.into()));
        self
    }

    /// The merchant key, if one was supplied and is non-blank
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// The order reference, if one was supplied and is non-blank
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref().filter(|o| !o.trim().is_empty())
    }

    /// The hosted checkout base address, falling back to the default
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_CHECKOUT_BASE_URL)
    }

    /// Report configuration problems without failing.
    ///
    /// A missing key is logged; the hosted checkout rejects the session itself.
    /// Returns `true` when the configuration is complete.
    pub fn validate(&self) -> bool {
        if self.key().is_none() {
            error!("{}", MISSING_KEY_MESSAGE);
            return false;
        }
        true
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            key: None,
            order_id: None,
            base_url: None,
            origin_policy: OriginPolicy::Any,
        }
    }
}
