//! # checkout-api
//!
//! Merchant-side HTTP server for embed-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - A session endpoint that creates the gateway order and returns the
//!   options the browser passes to `new PaymentGateway(...)`
//! - A webhook receiver that verifies gateway signatures
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/checkout/session` | Create order, return `{key, orderId, baseUrl}` |
//! | POST | `/webhook` | Gateway webhook (`X-Webhook-Signature`) |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
