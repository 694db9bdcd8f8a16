//! # checkout-core
//!
//! Core types and state machine for the embeddable checkout widget.
//!
//! This crate provides:
//! - `EmbedConfig` and `OriginPolicy` for configuring one checkout
//! - `checkout_url` for building the hosted checkout address
//! - `InboundMessage` for decoding what the hosted checkout posts back
//! - `EmbedController` driving a `SurfaceHost` and a `MessageChannel`
//! - `CheckoutHandler` callbacks and `dispatch_notifications`
//! - Gateway contract types (`Order`, `WebhookLog`, `WebhookEvent`, ...)
//! - `GatewayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{EmbedConfig, EmbeddedCheckout, LoggingCheckoutHandler};
//!
//! let config = EmbedConfig::new("key_test_abc123")
//!     .with_order_id("order_NXhj67fGH2jk9mPq")
//!     .with_base_url("https://checkout.example");
//!
//! let mut checkout = EmbeddedCheckout::new(config, host, channel, LoggingCheckoutHandler);
//! checkout.open();
//!
//! // later, for every message the hosted checkout posts:
//! checkout.deliver(&origin, &data);
//! ```

pub mod address;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod message;
pub mod order;
pub mod surface;
pub mod webhook;

// Re-exports for convenience
pub use address::{checkout_url, CHECKOUT_PATH};
pub use config::{EmbedConfig, OriginPolicy, DEFAULT_CHECKOUT_BASE_URL, MISSING_KEY_MESSAGE};
pub use controller::{
    dispatch_notifications, CheckoutHandler, CheckoutNotification, EmbedController,
    EmbedState, EmbeddedCheckout, LoggingCheckoutHandler,
};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{BoxedOrderGateway, OrderGateway};
pub use message::InboundMessage;
pub use order::{CreateOrderRequest, Order};
pub use surface::{MessageChannel, SurfaceHost};
pub use url::Url;
pub use webhook::{
    Merchant, RetrySchedule, WebhookEvent, WebhookEventType, WebhookLog, WebhookLogPage,
    WebhookStatus, MAX_DELIVERY_ATTEMPTS, SIGNATURE_HEADER,
};
