//! # Webhook Handling
//!
//! Verifying and dispatching the payment events the gateway posts to the
//! merchant's webhook URL.
//!
//! Every delivery carries `X-Webhook-Signature`: the lowercase hex
//! HMAC-SHA256 of the raw body, keyed by the merchant's webhook secret.

use checkout_core::{GatewayError, GatewayResult, WebhookEvent, WebhookEventType};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Events the gateway delivers
pub const WEBHOOK_EVENTS: &[&str] = &[
    "payment.success",
    "payment.failed",
    "payment.pending",
    "refund.processed",
];

/// Sign a payload the way the gateway does
pub fn sign_payload(payload: &[u8], secret: &str) -> String {
    let mut mac = new_mac(secret);
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a signature header against the payload (constant-time)
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> GatewayResult<()> {
    let expected = hex::decode(signature.trim()).map_err(|_| {
        GatewayError::WebhookVerificationFailed("Signature is not valid hex".to_string())
    })?;

    let mut mac = new_mac(secret);
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| GatewayError::WebhookVerificationFailed("Signature mismatch".to_string()))
}

/// Verify a delivery and parse its event
pub fn verify_webhook(payload: &[u8], signature: &str, secret: &str) -> GatewayResult<WebhookEvent> {
    verify_signature(payload, signature, secret)?;

    let event: WebhookEvent = serde_json::from_slice(payload).map_err(|e| {
        GatewayError::WebhookParseError(format!("Failed to parse webhook: {}", e))
    })?;

    debug!("Verified webhook: event={}", event.event.as_str());
    Ok(event)
}

fn new_mac(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

/// Webhook event handler trait
///
/// Implement this trait to handle different webhook events.
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    /// Called when a payment succeeds
    fn on_payment_success(&self, event: &WebhookEvent) -> GatewayResult<()> {
        info!("Payment succeeded: {:?}", event.subject_id());
        Ok(())
    }

    /// Called when a payment fails
    fn on_payment_failed(&self, event: &WebhookEvent) -> GatewayResult<()> {
        warn!("Payment failed: {:?}", event.subject_id());
        Ok(())
    }

    /// Called when a payment is still being processed
    fn on_payment_pending(&self, event: &WebhookEvent) -> GatewayResult<()> {
        debug!("Payment pending: {:?}", event.subject_id());
        Ok(())
    }

    /// Called when a refund is processed
    fn on_refund_processed(&self, event: &WebhookEvent) -> GatewayResult<()> {
        info!("Refund processed: {:?}", event.subject_id());
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> GatewayResult<()> {
        debug!("Unhandled webhook event: {}", event.event.as_str());
        Ok(())
    }
}

/// Default no-op webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: &WebhookEvent) -> GatewayResult<()> {
    match &event.event {
        WebhookEventType::PaymentSuccess => handler.on_payment_success(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::PaymentPending => handler.on_payment_pending(event),
        WebhookEventType::RefundProcessed => handler.on_refund_processed(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}
