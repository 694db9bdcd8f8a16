//! # Request Handlers
//!
//! Axum request handlers for the merchant server.
//! The browser asks for a checkout session; the server creates the gateway
//! order with its secret and answers with the widget's options.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use checkout_client::{dispatch_webhook_event, LoggingWebhookHandler};
use checkout_core::{CreateOrderRequest, EmbedConfig, GatewayError, SIGNATURE_HEADER};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session request
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Amount in minor units
    pub amount: i64,
    /// Currency (optional, defaults to the configured currency)
    #[serde(default)]
    pub currency: Option<String>,
    /// Merchant receipt reference (optional)
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Create checkout session response: the widget's options plus the order summary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    /// `{key, orderId, baseUrl}` ready for `new PaymentGateway(...)`
    #[serde(flatten)]
    pub options: EmbedConfig,
    pub amount: i64,
    pub currency: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub(crate) fn gateway_error_to_response(err: GatewayError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "checkout-merchant",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a gateway order and return the widget options for it
#[instrument(skip(state, request), fields(amount = request.amount))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.amount <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Amount must be a positive integer", 400)),
        ));
    }

    let currency = request
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.config.default_currency.clone());

    let mut order_request = CreateOrderRequest::new(request.amount, currency);
    if let Some(receipt) = request.receipt {
        order_request = order_request.with_receipt(receipt);
    }

    let order = state
        .gateway
        .create_order(&order_request)
        .await
        .map_err(|e| {
            error!("Failed to create order: {}", e);
            gateway_error_to_response(e)
        })?;

    info!("Created checkout session for order {}", order.id);

    let options = EmbedConfig::new(state.gateway.public_key())
        .with_order_id(&order.id)
        .with_base_url(state.gateway.checkout_base_url());

    Ok(Json(CreateSessionResponse {
        options,
        amount: order_request.amount,
        currency: order_request.currency,
    }))
}

/// Receive a gateway webhook
#[instrument(skip(state, headers, body))]
pub async fn gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    // Get signature header
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    format!("Missing {} header", SIGNATURE_HEADER),
                    400,
                )),
            )
        })?;

    // Verify and parse webhook
    let event = state
        .gateway
        .verify_webhook(&body, signature)
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            gateway_error_to_response(e)
        })?;

    info!(
        "Received webhook: event={}, subject={:?}",
        event.event.as_str(),
        event.subject_id()
    );

    dispatch_webhook_event(&LoggingWebhookHandler, &event).map_err(|e| {
        error!("Webhook handler error: {}", e);
        gateway_error_to_response(e)
    })?;

    Ok(StatusCode::OK)
}
