//! # Inbound Messages
//!
//! Events the hosted checkout posts back to the embedding page.
//! Every message is `{ "type": ..., "data": ... }`; only three types mean
//! anything. Decoding never fails: anything unrecognised becomes `Unknown`.

use serde_json::{json, Value};

/// Payment completed inside the hosted checkout
pub const PAYMENT_SUCCESS: &str = "payment_success";

/// Payment attempt failed; the hosted checkout stays up for a retry
pub const PAYMENT_FAILED: &str = "payment_failed";

/// Customer dismissed the hosted checkout
pub const CLOSE_MODAL: &str = "close_modal";

/// A decoded message from the hosted checkout
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `payment_success` with its payload
    PaymentSuccess(Value),
    /// `payment_failed` with its payload
    PaymentFailed(Value),
    /// `close_modal`
    CloseModal,
    /// Anything else (kept for logging only)
    Unknown(Option<String>),
}

impl InboundMessage {
    /// Decode a raw message without ever failing
    pub fn decode(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return InboundMessage::Unknown(None);
        };

        let Some(kind) = obj.get("type").and_then(|v| v.as_str()) else {
            return InboundMessage::Unknown(None);
        };

        let data = obj.get("data").cloned().unwrap_or(Value::Null);

        match kind {
            PAYMENT_SUCCESS => InboundMessage::PaymentSuccess(data),
            PAYMENT_FAILED => InboundMessage::PaymentFailed(data),
            CLOSE_MODAL => InboundMessage::CloseModal,
            other => InboundMessage::Unknown(Some(other.to_string())),
        }
    }

    /// Wire name of this message type
    pub fn type_name(&self) -> Option<&str> {
        match self {
            InboundMessage::PaymentSuccess(_) => Some(PAYMENT_SUCCESS),
            InboundMessage::PaymentFailed(_) => Some(PAYMENT_FAILED),
            InboundMessage::CloseModal => Some(CLOSE_MODAL),
            InboundMessage::Unknown(kind) => kind.as_deref(),
        }
    }

    /// Encode as the hosted checkout would post it
    pub fn to_value(&self) -> Value {
        match self {
            InboundMessage::PaymentSuccess(data) => json!({ "type": PAYMENT_SUCCESS, "data": data }),
            InboundMessage::PaymentFailed(data) => json!({ "type": PAYMENT_FAILED, "data": data }),
            InboundMessage::CloseModal => json!({ "type": CLOSE_MODAL }),
            InboundMessage::Unknown(Some(kind)) => json!({ "type": kind }),
            InboundMessage::Unknown(None) => json!({}),
        }
    }

    /// True for messages that end the attempt
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InboundMessage::PaymentSuccess(_) | InboundMessage::CloseModal
        )
    }
}

impl From<&Value> for InboundMessage {
    fn from(raw: &Value) -> Self {
        InboundMessage::decode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_types() {
        assert_eq!(
            InboundMessage::decode(&json!({"type": "payment_success", "data": {"paymentId": "p1"}})),
            InboundMessage::PaymentSuccess(json!({"paymentId": "p1"}))
        );
        assert_eq!(
            InboundMessage::decode(&json!({"type": "payment_failed", "data": {"code": "card_declined"}})),
            InboundMessage::PaymentFailed(json!({"code": "card_declined"}))
        );
        assert_eq!(
            InboundMessage::decode(&json!({"type": "close_modal"})),
            InboundMessage::CloseModal
        );
    }

    #[test]
    fn test_missing_data_is_null() {
        assert_eq!(
            InboundMessage::decode(&json!({"type": "payment_success"})),
            InboundMessage::PaymentSuccess(Value::Null)
        );
    }

    #[test]
    fn test_malformed_messages_are_unknown() {
        assert_eq!(
            InboundMessage::decode(&json!("payment_success")),
            InboundMessage::Unknown(None)
        );
        assert_eq!(InboundMessage::decode(&Value::Null), InboundMessage::Unknown(None));
        assert_eq!(
            InboundMessage::decode(&json!({"type": 42, "data": {}})),
            InboundMessage::Unknown(None)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"data": {}})),
            InboundMessage::Unknown(None)
        );
        assert_eq!(
            InboundMessage::decode(&json!({"type": "webpackOk"})),
            InboundMessage::Unknown(Some("webpackOk".into()))
        );
    }

    #[test]
    fn test_encoded_messages_decode_back() {
        let msg = InboundMessage::PaymentFailed(json!({"code": "card_declined"}));
        assert_eq!(InboundMessage::decode(&msg.to_value()), msg);
        assert_eq!(
            InboundMessage::decode(&InboundMessage::CloseModal.to_value()),
            InboundMessage::CloseModal
        );
    }

    #[test]
    fn test_terminal_messages() {
        assert!(InboundMessage::PaymentSuccess(Value::Null).is_terminal());
        assert!(InboundMessage::CloseModal.is_terminal());
        assert!(!InboundMessage::PaymentFailed(Value::Null).is_terminal());
        assert!(!InboundMessage::Unknown(None).is_terminal());
    }
}
