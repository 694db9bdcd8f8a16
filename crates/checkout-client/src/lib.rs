//! # checkout-client
//!
//! Server-side client for the payment gateway behind embed-checkout-rs.
//!
//! This crate provides:
//!
//! 1. **GatewayClient** - authenticated REST client
//!    - Order creation for the embedded checkout
//!    - Merchant webhook settings and delivery logs
//!    - Implements `checkout_core::OrderGateway`
//!
//! 2. **Webhook verification** - HMAC-SHA256 signatures
//!    - `verify_webhook` checks `X-Webhook-Signature` and parses the event
//!    - `WebhookHandler` + `dispatch_webhook_event` for routing events
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_client::GatewayClient;
//! use checkout_core::CreateOrderRequest;
//!
//! // Create client from environment
//! let client = GatewayClient::from_env()?;
//!
//! // Create the order the widget will open
//! let order = client.create_order(&CreateOrderRequest::new(50000, "INR")).await?;
//!
//! // Hand { key, orderId: order.id } to the browser
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use checkout_client::{dispatch_webhook_event, verify_webhook, WebhookHandler};
//!
//! struct MyHandler;
//!
//! impl WebhookHandler for MyHandler {
//!     fn on_payment_success(&self, event: &WebhookEvent) -> GatewayResult<()> {
//!         // Fulfill the order
//!         Ok(())
//!     }
//! }
//!
//! // In your webhook endpoint:
//! let event = verify_webhook(&body, signature, &secret)?;
//! dispatch_webhook_event(&MyHandler, &event)?;
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod webhook;

// Re-exports
pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use dashboard::{RetryResponse, DEFAULT_LOG_LIMIT};
pub use webhook::{
    dispatch_webhook_event, sign_payload, verify_signature, verify_webhook,
    LoggingWebhookHandler, WebhookHandler, WEBHOOK_EVENTS,
};
