//! # Gateway Trait
//!
//! The server-side half of an embedded checkout: something has to create
//! the order the widget opens, and verify the webhooks that report how it
//! ended. The REST client implements this; tests use in-memory fakes.

use crate::error::GatewayResult;
use crate::order::{CreateOrderRequest, Order};
use crate::webhook::WebhookEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Server-side gateway operations used by the merchant backend.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order and return it (its `id` goes into the embed config).
    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<Order>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Value of the `X-Webhook-Signature` header
    fn verify_webhook(&self, payload: &[u8], signature: &str) -> GatewayResult<WebhookEvent>;

    /// Public key the widget passes to the hosted checkout
    fn public_key(&self) -> &str;

    /// Base address of the hosted checkout application
    fn checkout_base_url(&self) -> &str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedOrderGateway = Arc<dyn OrderGateway>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::webhook::WebhookEventType;
    use serde_json::json;

    struct StaticGateway;

    #[async_trait]
    impl OrderGateway for StaticGateway {
        async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<Order> {
            if request.amount <= 0 {
                return Err(GatewayError::InvalidRequest("amount must be positive".into()));
            }
            Ok(serde_json::from_value(json!({
                "id": "order_static",
                "amount": request.amount,
                "currency": request.currency,
            }))?)
        }

        fn verify_webhook(&self, payload: &[u8], _signature: &str) -> GatewayResult<WebhookEvent> {
            Ok(serde_json::from_slice(payload)?)
        }

        fn public_key(&self) -> &str {
            "key_test_static"
        }

        fn checkout_base_url(&self) -> &str {
            "http://localhost:3001"
        }
    }

    #[tokio::test]
    async fn test_boxed_gateway_dispatch() {
        let gateway: BoxedOrderGateway = Arc::new(StaticGateway);

        let order = gateway
            .create_order(&CreateOrderRequest::new(50000, "INR"))
            .await
            .unwrap();
        assert_eq!(order.id, "order_static");
        assert_eq!(order.amount, 50000);

        let err = gateway
            .create_order(&CreateOrderRequest::new(0, "INR"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let event = gateway
            .verify_webhook(br#"{"event":"payment.failed","data":{}}"#, "sig")
            .unwrap();
        assert_eq!(event.event, WebhookEventType::PaymentFailed);
    }
}
