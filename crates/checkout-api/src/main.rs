//! # Checkout Merchant Server
//!
//! Reference backend for pages that embed the checkout widget.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export GATEWAY_API_KEY=key_test_...
//! export GATEWAY_API_SECRET=secret_test_...
//! export GATEWAY_WEBHOOK_SECRET=whsec_...
//!
//! # Run the server
//! checkout-merchant
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!(
        "checkout-merchant v{} ({})",
        env!("CARGO_PKG_VERSION"),
        state.config.environment
    );
    info!("Hosted checkout: {}", state.gateway.checkout_base_url());
    info!("Default currency: {}", state.config.default_currency);

    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);

    if !is_prod {
        info!("Session: POST http://{}/api/v1/checkout/session", addr);
        info!("Webhook: POST http://{}/webhook", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
