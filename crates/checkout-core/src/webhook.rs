//! # Webhook Types
//!
//! Merchant webhook settings, delivery logs, and the event payloads the
//! gateway posts to the merchant's webhook URL.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Header carrying the hex HMAC-SHA256 of the delivered body
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Deliveries give up after this many attempts
pub const MAX_DELIVERY_ATTEMPTS: u32 = 5;

/// The authenticated merchant (`GET /api/v1/merchants/me`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Merchant {
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Where payment events are delivered
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Key used to sign deliveries
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl Merchant {
    /// Check if webhook delivery is configured
    pub fn has_webhook(&self) -> bool {
        self.webhook_url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Delivery status of one webhook log.
///
/// The gateway is inconsistent about case (`SUCCESS` vs `success`), so
/// parsing ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WebhookStatus {
    Pending,
    Success,
    Failed,
}

impl TryFrom<String> for WebhookStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Ok(WebhookStatus::Pending),
            "success" => Ok(WebhookStatus::Success),
            "failed" => Ok(WebhookStatus::Failed),
            other => Err(format!("unknown webhook status: {}", other)),
        }
    }
}

/// One webhook delivery record (`GET /api/v1/webhooks`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookLog {
    pub id: Uuid,

    /// Event name, e.g. `payment.success`
    #[serde(alias = "event")]
    pub event_type: String,

    pub status: WebhookStatus,

    /// HTTP status the merchant endpoint answered with (0 = no response)
    #[serde(default)]
    pub response_code: Option<u16>,

    #[serde(default)]
    pub duration_ms: Option<u64>,

    #[serde(default)]
    pub attempts: u32,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub last_attempt_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub next_retry_at: Option<NaiveDateTime>,
}

impl WebhookLog {
    /// Most relevant timestamp for display
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.last_attempt_at.or(self.created_at)
    }

    /// Failed deliveries can be re-queued by hand
    pub fn can_retry(&self) -> bool {
        self.status == WebhookStatus::Failed
    }

    /// When the gateway will try again, derived from the last attempt if the
    /// gateway did not report it.
    pub fn expected_retry_at(&self, schedule: RetrySchedule) -> Option<NaiveDateTime> {
        if self.status != WebhookStatus::Pending {
            return None;
        }
        self.next_retry_at.or_else(|| {
            let last = self.last_attempt_at?;
            schedule.delay_after(self.attempts).map(|delay| last + delay)
        })
    }
}

/// A page of webhook logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookLogPage {
    #[serde(default)]
    pub data: Vec<WebhookLog>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub offset: Option<u32>,
}

impl WebhookLogPage {
    /// Check if more logs exist past this page
    pub fn has_more(&self) -> bool {
        let seen = self.offset.unwrap_or(0) as u64 + self.data.len() as u64;
        seen < self.total
    }
}

/// Retry spacing used by the gateway's delivery worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrySchedule {
    /// 1 min, 5 min, 30 min, 2 h
    #[default]
    Production,
    /// 5 s, 10 s, 15 s, 20 s
    Test,
}

impl RetrySchedule {
    /// Delay before the next attempt, given how many attempts were made
    pub fn delay_after(&self, attempts: u32) -> Option<Duration> {
        match (self, attempts) {
            (RetrySchedule::Production, 1) => Some(Duration::minutes(1)),
            (RetrySchedule::Production, 2) => Some(Duration::minutes(5)),
            (RetrySchedule::Production, 3) => Some(Duration::minutes(30)),
            (RetrySchedule::Production, 4) => Some(Duration::hours(2)),
            (RetrySchedule::Test, n @ 1..=4) => Some(Duration::seconds(5 * n as i64)),
            _ => None,
        }
    }

    /// Absolute time of the next attempt
    pub fn next_retry_at(&self, attempts: u32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.delay_after(attempts).map(|delay| now + delay)
    }
}

/// Event names the gateway delivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEventType {
    PaymentSuccess,
    PaymentFailed,
    PaymentPending,
    RefundProcessed,
    /// Unknown event (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentSuccess => "payment.success",
            WebhookEventType::PaymentFailed => "payment.failed",
            WebhookEventType::PaymentPending => "payment.pending",
            WebhookEventType::RefundProcessed => "refund.processed",
            WebhookEventType::Unknown(name) => name,
        }
    }
}

impl From<String> for WebhookEventType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "payment.success" => WebhookEventType::PaymentSuccess,
            "payment.failed" => WebhookEventType::PaymentFailed,
            "payment.pending" => WebhookEventType::PaymentPending,
            "refund.processed" => WebhookEventType::RefundProcessed,
            _ => WebhookEventType::Unknown(name),
        }
    }
}

impl From<WebhookEventType> for String {
    fn from(event: WebhookEventType) -> Self {
        event.as_str().to_string()
    }
}

/// Body the gateway posts to the merchant webhook URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: WebhookEventType,

    /// Unix seconds
    #[serde(default)]
    pub timestamp: i64,

    /// `{ "payment": {...} }` or `{ "refund": {...} }`
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    /// The `payment` object, for payment events
    pub fn payment(&self) -> Option<&Value> {
        self.data.get("payment")
    }

    /// The `refund` object, for refund events
    pub fn refund(&self) -> Option<&Value> {
        self.data.get("refund")
    }

    /// Id of the payment or refund this event concerns
    pub fn subject_id(&self) -> Option<&str> {
        self.payment()
            .or_else(|| self.refund())
            .and_then(|obj| obj.get("id"))
            .and_then(|v| v.as_str())
    }
}
