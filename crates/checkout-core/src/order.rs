//! # Order Types
//!
//! Orders as the gateway's order API creates them. The embedded checkout
//! only needs the returned `id`; the rest is carried for display and logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in the smallest currency unit (paise, cents)
    pub amount: i64,

    /// ISO currency code, passed through untouched
    pub currency: String,

    /// Merchant-side receipt reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

impl CreateOrderRequest {
    /// Create a request for an amount in minor units
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            receipt: None,
        }
    }

    /// Builder: set the receipt reference
    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }
}

/// An order returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order reference handed to the embedded checkout
    pub id: String,

    #[serde(default)]
    pub amount: i64,

    #[serde(default)]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,

    /// Gateway-side status (e.g. "created", "paid")
    #[serde(default = "default_order_status")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_order_status() -> String {
    "created".to_string()
}

impl Order {
    /// Check if the order can still be paid
    pub fn is_payable(&self) -> bool {
        self.status == "created"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_order_body() {
        let request = CreateOrderRequest::new(50000, "INR").with_receipt("rcpt_1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"amount": 50000, "currency": "INR", "receipt": "rcpt_1"})
        );

        let bare = CreateOrderRequest::new(100, "USD");
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"amount": 100, "currency": "USD"})
        );
    }

    #[test]
    fn test_order_lenient_parse() {
        let order: Order = serde_json::from_value(json!({"id": "order_NXhj67fGH2jk9mPq"})).unwrap();
        assert_eq!(order.id, "order_NXhj67fGH2jk9mPq");
        assert_eq!(order.status, "created");
        assert!(order.is_payable());

        let order: Order = serde_json::from_value(json!({
            "id": "order_1",
            "amount": 50000,
            "currency": "INR",
            "status": "paid",
            "created_at": "2024-01-15T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(order.amount, 50000);
        assert!(!order.is_payable());
        assert!(order.created_at.is_some());
    }
}
