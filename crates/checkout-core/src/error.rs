//! # Gateway Error Types
//!
//! Typed error handling for the embeddable checkout.
//! Everything that can fail returns `Result<T, GatewayError>`.

use thiserror::Error;

/// Core error type shared by the widget, the REST client and the merchant server
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Hosted checkout address could not be built
    #[error("Invalid checkout address: {0}")]
    InvalidAddress(String),

    /// Rendering surface could not be created or mounted
    #[error("Surface error: {0}")]
    Surface(String),

    /// Message subscription could not be registered
    #[error("Message channel error: {0}")]
    Channel(String),

    /// Gateway REST API answered with a non-success status
    #[error("Gateway API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Resource not found on the gateway
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration(_) => 500,
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::InvalidAddress(_) => 400,
            GatewayError::Surface(_) => 500,
            GatewayError::Channel(_) => 500,
            GatewayError::Api { status, .. } if *status >= 500 => 502,
            GatewayError::Api { status, .. } => *status,
            GatewayError::Network(_) => 503,
            GatewayError::WebhookVerificationFailed(_) => 401,
            GatewayError::WebhookParseError(_) => 400,
            GatewayError::NotFound(_) => 404,
            GatewayError::Serialization(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        GatewayError::InvalidAddress(err.to_string())
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
