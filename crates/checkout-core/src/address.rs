//! # Checkout Address
//!
//! Builds the hosted checkout URL the rendering surface points at.

use crate::config::EmbedConfig;
use crate::error::GatewayResult;
use url::Url;

/// Route of the checkout page inside the hosted application
pub const CHECKOUT_PATH: &str = "/checkout";

/// Query parameter carrying the order reference
pub const PARAM_ORDER_ID: &str = "order_id";

/// Query parameter marking the session as embedded
pub const PARAM_EMBEDDED: &str = "embedded";

/// Query parameter carrying the merchant key
pub const PARAM_KEY: &str = "key";

/// Build the target address for an embedded checkout.
///
/// `CHECKOUT_PATH` is resolved against the base address (replacing any path it
/// carries), then `order_id` (only when present), `embedded=true` and `key`
/// are appended. A missing key is still sent, empty, so the hosted checkout
/// can reject the session.
pub fn checkout_url(config: &EmbedConfig) -> GatewayResult<Url> {
    let base = Url::parse(config.base_url())?;
    let mut url = base.join(CHECKOUT_PATH)?;

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        if let Some(order_id) = config.order_id() {
            query.append_pair(PARAM_ORDER_ID, order_id);
        }
        query.append_pair(PARAM_EMBEDDED, "true");
        query.append_pair(PARAM_KEY, config.key().unwrap_or_default());
    }

    Ok(url)
}
