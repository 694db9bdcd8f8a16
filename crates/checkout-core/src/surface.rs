//! # Surface & Channel Traits
//!
//! The two host facilities an embedded checkout needs: somewhere to render
//! the hosted checkout, and a way to hear the messages it posts back.
//!
//! ```text
//! ┌──────────────────────────────┐      mount(url)      ┌───────────────┐
//! │       EmbedController        │ ───────────────────▶ │  SurfaceHost  │
//! │  attempt: surface + listener │ ◀─────────────────── │ (iframe, ...) │
//! └──────────────────────────────┘    Self::Surface     └───────────────┘
//!                │  subscribe()                            ┌───────────────┐
//!                └───────────────────────────────────────▶ │MessageChannel │
//!                      Self::Subscription                  └───────────────┘
//! ```
//!
//! Both hand back owned handles. The controller keeps them in its attempt
//! state and gives them back on teardown, so a host never has to track
//! which controller owns what.

use crate::error::GatewayResult;
use url::Url;

/// Creates and destroys the isolated rendering surface.
pub trait SurfaceHost {
    /// Handle to a mounted surface
    type Surface;

    /// Create a surface pointed at `target` and attach it to the page.
    fn mount(&mut self, target: &Url) -> GatewayResult<Self::Surface>;

    /// Detach and discard a surface previously returned by `mount`.
    fn unmount(&mut self, surface: Self::Surface);
}

/// Registers and releases the inbound message listener.
pub trait MessageChannel {
    /// Handle to a live subscription
    type Subscription;

    /// Start listening for messages from the hosted checkout.
    fn subscribe(&mut self) -> GatewayResult<Self::Subscription>;

    /// Stop listening. The subscription must not deliver afterwards.
    fn unsubscribe(&mut self, subscription: Self::Subscription);
}
