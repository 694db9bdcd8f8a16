//! # Embed Controller
//!
//! Lifecycle of one embedded checkout attempt.
//!
//! ```text
//!            open()                      payment_success / close_modal / close()
//!   ┌──────┐ ─────────────▶ ┌──────┐ ─────────────────────────────────────────┐
//!   │ Idle │                │ Open │ ◀── payment_failed, unknown (no change)  │
//!   └──────┘ ◀───────────── └──────┘                                          │
//!        ▲                                                                    │
//!        └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller is a plain state machine: transitions return the
//! notifications they produced and the caller hands them to a
//! [`CheckoutHandler`]. Teardown always happens before any notification is
//! returned, so a failing callback can never leave a surface mounted.

use crate::address::checkout_url;
use crate::config::EmbedConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::message::InboundMessage;
use crate::surface::{MessageChannel, SurfaceHost};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedState {
    /// No surface, no listener
    Idle,
    /// Surface mounted, listener registered
    Open,
}

/// Callback work produced by a transition, in the order it must run
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutNotification {
    /// Run `on_success` with the payload
    Success(Value),
    /// Run `on_failure` with the payload
    Failure(Value),
    /// Run `on_close`
    Closed,
}

/// Resources held while an attempt is open
struct Attempt<S, L> {
    surface: S,
    subscription: L,
    target: Url,
}

/// Drives one checkout attempt at a time over a surface host and a message channel.
pub struct EmbedController<H: SurfaceHost, M: MessageChannel> {
    config: EmbedConfig,
    host: H,
    channel: M,
    attempt: Option<Attempt<H::Surface, M::Subscription>>,
}

impl<H: SurfaceHost, M: MessageChannel> EmbedController<H, M> {
    /// Create an idle controller. A missing key is logged, not rejected.
    pub fn new(config: EmbedConfig, host: H, channel: M) -> Self {
        config.validate();
        Self {
            config,
            host,
            channel,
            attempt: None,
        }
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn channel(&self) -> &M {
        &self.channel
    }

    pub fn state(&self) -> EmbedState {
        if self.attempt.is_some() {
            EmbedState::Open
        } else {
            EmbedState::Idle
        }
    }

    pub fn is_open(&self) -> bool {
        self.attempt.is_some()
    }

    /// Address the open surface points at
    pub fn target(&self) -> Option<&Url> {
        self.attempt.as_ref().map(|a| &a.target)
    }

    /// Mount the surface and start listening.
    ///
    /// Returns `Ok(false)` when an attempt is already open; nothing is
    /// created in that case. If the listener cannot be registered the
    /// freshly mounted surface is taken down again.
    pub fn open(&mut self) -> GatewayResult<bool> {
        if self.attempt.is_some() {
            debug!("Checkout already open, ignoring open()");
            return Ok(false);
        }

        let target = checkout_url(&self.config)?;
        let surface = self.host.mount(&target)?;

        let subscription = match self.channel.subscribe() {
            Ok(subscription) => subscription,
            Err(e) => {
                self.host.unmount(surface);
                return Err(e);
            }
        };

        info!("Opened embedded checkout: {}", target);
        self.attempt = Some(Attempt {
            surface,
            subscription,
            target,
        });
        Ok(true)
    }

    /// Tear the attempt down. Produces `Closed` only if something was open.
    pub fn close(&mut self) -> Option<CheckoutNotification> {
        self.teardown().then_some(CheckoutNotification::Closed)
    }

    /// React to one message posted by the hosted checkout.
    pub fn handle_message(&mut self, origin: &str, raw: &Value) -> Vec<CheckoutNotification> {
        if self.attempt.is_none() {
            debug!("Message received while idle, ignoring");
            return Vec::new();
        }

        if !self.config.origin_policy.allows(origin) {
            warn!("Ignoring message from unexpected origin: {}", origin);
            return Vec::new();
        }

        match InboundMessage::decode(raw) {
            InboundMessage::PaymentSuccess(data) => {
                info!("Payment succeeded, closing checkout");
                self.teardown();
                vec![
                    CheckoutNotification::Success(data),
                    CheckoutNotification::Closed,
                ]
            }
            InboundMessage::PaymentFailed(data) => {
                info!("Payment failed, checkout stays open for retry");
                vec![CheckoutNotification::Failure(data)]
            }
            InboundMessage::CloseModal => self.close().into_iter().collect(),
            InboundMessage::Unknown(kind) => {
                debug!("Ignoring message type {:?}", kind);
                Vec::new()
            }
        }
    }

    fn teardown(&mut self) -> bool {
        let Some(attempt) = self.attempt.take() else {
            return false;
        };
        self.channel.unsubscribe(attempt.subscription);
        self.host.unmount(attempt.surface);
        debug!("Closed embedded checkout: {}", attempt.target);
        true
    }
}

impl<H: SurfaceHost, M: MessageChannel> Drop for EmbedController<H, M> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Integrator callbacks.
///
/// Every method has a logging default, so implementors override only what
/// they care about.
#[allow(unused_variables)]
pub trait CheckoutHandler {
    /// Payment completed (the checkout is already closed)
    fn on_success(&self, data: &Value) -> GatewayResult<()> {
        info!("Checkout payment succeeded: {}", data);
        Ok(())
    }

    /// Payment failed (the checkout is still open)
    fn on_failure(&self, data: &Value) -> GatewayResult<()> {
        warn!("Checkout payment failed: {}", data);
        Ok(())
    }

    /// Checkout closed
    fn on_close(&self) -> GatewayResult<()> {
        debug!("Checkout closed");
        Ok(())
    }
}

/// Default handler (just logs)
pub struct LoggingCheckoutHandler;

impl CheckoutHandler for LoggingCheckoutHandler {}

/// Run notifications in order.
///
/// A failing callback is logged and does not stop the ones after it. The
/// first failure is returned once all have run.
pub fn dispatch_notifications(
    handler: &dyn CheckoutHandler,
    notifications: impl IntoIterator<Item = CheckoutNotification>,
) -> GatewayResult<()> {
    let mut first_error: Option<GatewayError> = None;

    for notification in notifications {
        let result = match &notification {
            CheckoutNotification::Success(data) => handler.on_success(data),
            CheckoutNotification::Failure(data) => handler.on_failure(data),
            CheckoutNotification::Closed => handler.on_close(),
        };

        if let Err(e) = result {
            warn!("Checkout callback failed for {:?}: {}", notification, e);
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// A controller paired with its handler, dispatching as transitions happen.
///
/// Suitable wherever callbacks cannot re-enter the checkout while it is
/// borrowed (native hosts, tests). The browser binding keeps the two apart.
pub struct EmbeddedCheckout<H: SurfaceHost, M: MessageChannel, C: CheckoutHandler> {
    controller: EmbedController<H, M>,
    handler: C,
}

impl<H: SurfaceHost, M: MessageChannel, C: CheckoutHandler> EmbeddedCheckout<H, M, C> {
    pub fn new(config: EmbedConfig, host: H, channel: M, handler: C) -> Self {
        Self {
            controller: EmbedController::new(config, host, channel),
            handler,
        }
    }

    pub fn controller(&self) -> &EmbedController<H, M> {
        &self.controller
    }

    pub fn handler(&self) -> &C {
        &self.handler
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Open the checkout; errors are logged, never returned.
    pub fn open(&mut self) {
        if let Err(e) = self.controller.open() {
            warn!("Failed to open checkout: {}", e);
        }
    }

    /// Close the checkout, running `on_close` if it was open.
    pub fn close(&mut self) {
        let _ = dispatch_notifications(&self.handler, self.controller.close());
    }

    /// Deliver a message from the hosted checkout.
    pub fn deliver(&mut self, origin: &str, raw: &Value) {
        let notifications = self.controller.handle_message(origin, raw);
        let _ = dispatch_notifications(&self.handler, notifications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Page {
        mounted: Vec<String>,
        listeners: usize,
        mounts: usize,
        subscriptions: usize,
    }

    struct FakeHost(Rc<RefCell<Page>>);

    impl SurfaceHost for FakeHost {
        type Surface = String;

        fn mount(&mut self, target: &Url) -> GatewayResult<String> {
            let mut page = self.0.borrow_mut();
            page.mounts += 1;
            page.mounted.push(target.to_string());
            Ok(target.to_string())
        }

        fn unmount(&mut self, surface: String) {
            self.0.borrow_mut().mounted.retain(|s| *s != surface);
        }
    }

    struct FakeChannel {
        page: Rc<RefCell<Page>>,
        fail: bool,
    }

    impl MessageChannel for FakeChannel {
        type Subscription = ();

        fn subscribe(&mut self) -> GatewayResult<()> {
            if self.fail {
                return Err(GatewayError::Channel("no window".into()));
            }
            let mut page = self.page.borrow_mut();
            page.listeners += 1;
            page.subscriptions += 1;
            Ok(())
        }

        fn unsubscribe(&mut self, _subscription: ()) {
            self.page.borrow_mut().listeners -= 1;
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail_success: bool,
    }

    impl CheckoutHandler for Recorder {
        fn on_success(&self, data: &Value) -> GatewayResult<()> {
            self.calls.borrow_mut().push(format!("success:{}", data));
            if self.fail_success {
                return Err(GatewayError::Internal("callback threw".into()));
            }
            Ok(())
        }

        fn on_failure(&self, data: &Value) -> GatewayResult<()> {
            self.calls.borrow_mut().push(format!("failure:{}", data));
            Ok(())
        }

        fn on_close(&self) -> GatewayResult<()> {
            self.calls.borrow_mut().push("close".to_string());
            Ok(())
        }
    }

    type TestCheckout = EmbeddedCheckout<FakeHost, FakeChannel, Recorder>;

    fn checkout_with(config: EmbedConfig, recorder: Recorder) -> (TestCheckout, Rc<RefCell<Page>>) {
        let page = Rc::new(RefCell::new(Page::default()));
        let checkout = EmbeddedCheckout::new(
            config,
            FakeHost(page.clone()),
            FakeChannel {
                page: page.clone(),
                fail: false,
            },
            recorder,
        );
        (checkout, page)
    }

    fn checkout() -> (TestCheckout, Rc<RefCell<Page>>) {
        checkout_with(
            EmbedConfig::new("K")
                .with_order_id("O1")
                .with_base_url("https://h.example"),
            Recorder::default(),
        )
    }

    fn calls(checkout: &TestCheckout) -> Vec<String> {
        checkout.handler().calls.borrow().clone()
    }

    #[test]
    fn test_open_mounts_surface_and_listener() {
        let (mut checkout, page) = checkout();
        checkout.open();

        assert!(checkout.is_open());
        assert_eq!(checkout.controller().state(), EmbedState::Open);
        assert_eq!(
            page.borrow().mounted,
            vec!["https://h.example/checkout?order_id=O1&embedded=true&key=K".to_string()]
        );
        assert_eq!(page.borrow().listeners, 1);
    }

    #[test]
    fn test_double_open_is_noop() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.open();

        let page = page.borrow();
        assert_eq!(page.mounted.len(), 1);
        assert_eq!(page.mounts, 1);
        assert_eq!(page.listeners, 1);
        assert_eq!(page.subscriptions, 1);
    }

    #[test]
    fn test_close_while_idle_is_noop() {
        let (mut checkout, page) = checkout();
        checkout.close();

        assert!(calls(&checkout).is_empty());
        assert_eq!(page.borrow().listeners, 0);
        assert_eq!(checkout.controller().state(), EmbedState::Idle);
    }

    #[test]
    fn test_close_tears_down_once() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.close();
        checkout.close();

        assert_eq!(calls(&checkout), vec!["close"]);
        assert!(page.borrow().mounted.is_empty());
        assert_eq!(page.borrow().listeners, 0);
    }

    #[test]
    fn test_payment_success_closes() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.deliver(
            "https://h.example",
            &json!({"type": "payment_success", "data": {"paymentId": "p1"}}),
        );

        assert_eq!(calls(&checkout), vec![r#"success:{"paymentId":"p1"}"#, "close"]);
        assert!(!checkout.is_open());
        assert!(page.borrow().mounted.is_empty());
        assert_eq!(page.borrow().listeners, 0);
    }

    #[test]
    fn test_payment_failed_stays_open() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.deliver(
            "https://h.example",
            &json!({"type": "payment_failed", "data": {"code": "card_declined"}}),
        );

        assert_eq!(calls(&checkout), vec![r#"failure:{"code":"card_declined"}"#]);
        assert!(checkout.is_open());
        assert_eq!(page.borrow().mounted.len(), 1);
        assert_eq!(page.borrow().listeners, 1);
    }

    #[test]
    fn test_close_modal_closes_without_payment_callbacks() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.deliver("https://h.example", &json!({"type": "close_modal"}));

        assert_eq!(calls(&checkout), vec!["close"]);
        assert!(!checkout.is_open());
        assert!(page.borrow().mounted.is_empty());
    }

    #[test]
    fn test_unknown_message_ignored() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.deliver("https://h.example", &json!({"type": "resize", "data": {"h": 600}}));
        checkout.deliver("https://h.example", &json!("garbage"));
        checkout.deliver("https://h.example", &json!({"data": {}}));

        assert!(calls(&checkout).is_empty());
        assert!(checkout.is_open());
        assert_eq!(page.borrow().listeners, 1);
    }

    #[test]
    fn test_messages_after_close_ignored() {
        let (mut checkout, _page) = checkout();
        checkout.open();
        checkout.close();
        checkout.deliver(
            "https://h.example",
            &json!({"type": "payment_success", "data": {}}),
        );

        assert_eq!(calls(&checkout), vec!["close"]);
    }

    #[test]
    fn test_failing_success_callback_still_tears_down() {
        let recorder = Recorder {
            fail_success: true,
            ..Recorder::default()
        };
        let (mut checkout, page) = checkout_with(EmbedConfig::new("K"), recorder);
        checkout.open();
        checkout.deliver("null", &json!({"type": "payment_success", "data": {"paymentId": "p1"}}));

        assert!(!checkout.is_open());
        assert!(page.borrow().mounted.is_empty());
        assert_eq!(page.borrow().listeners, 0);
        assert_eq!(calls(&checkout), vec![r#"success:{"paymentId":"p1"}"#, "close"]);
    }

    #[test]
    fn test_origin_policy_filters_messages() {
        let config = EmbedConfig::new("K")
            .with_base_url("https://h.example")
            .with_allowed_origin("https://h.example");
        let (mut checkout, _page) = checkout_with(config, Recorder::default());
        checkout.open();

        checkout.deliver("https://evil.example", &json!({"type": "close_modal"}));
        assert!(checkout.is_open());

        checkout.deliver("https://h.example", &json!({"type": "close_modal"}));
        assert!(!checkout.is_open());
    }

    #[test]
    fn test_reopen_after_close() {
        let (mut checkout, page) = checkout();
        checkout.open();
        checkout.close();
        checkout.open();

        assert!(checkout.is_open());
        assert_eq!(page.borrow().mounts, 2);
        assert_eq!(page.borrow().mounted.len(), 1);
        assert_eq!(page.borrow().listeners, 1);
    }

    #[test]
    fn test_missing_key_still_opens() {
        let (mut checkout, page) = checkout_with(EmbedConfig::default(), Recorder::default());
        checkout.open();

        assert!(checkout.is_open());
        assert_eq!(
            page.borrow().mounted[0],
            "http://localhost:3001/checkout?embedded=true&key="
        );
    }

    #[test]
    fn test_invalid_base_url_does_not_open() {
        let (mut checkout, page) =
            checkout_with(EmbedConfig::new("K").with_base_url("::"), Recorder::default());
        checkout.open();

        assert!(!checkout.is_open());
        assert_eq!(page.borrow().mounts, 0);
    }

    #[test]
    fn test_subscribe_failure_unmounts_surface() {
        let page = Rc::new(RefCell::new(Page::default()));
        let mut controller = EmbedController::new(
            EmbedConfig::new("K"),
            FakeHost(page.clone()),
            FakeChannel {
                page: page.clone(),
                fail: true,
            },
        );

        assert!(matches!(controller.open(), Err(GatewayError::Channel(_))));
        assert!(!controller.is_open());
        assert_eq!(page.borrow().mounts, 1);
        assert!(page.borrow().mounted.is_empty());
    }

    #[test]
    fn test_controller_transitions_return_notifications() {
        let page = Rc::new(RefCell::new(Page::default()));
        let mut controller = EmbedController::new(
            EmbedConfig::new("K"),
            FakeHost(page.clone()),
            FakeChannel {
                page: page.clone(),
                fail: false,
            },
        );

        assert!(controller.open().unwrap());
        assert!(!controller.open().unwrap());
        assert!(controller.target().is_some());

        let notifications =
            controller.handle_message("x", &json!({"type": "payment_success", "data": 7}));
        assert_eq!(
            notifications,
            vec![
                CheckoutNotification::Success(json!(7)),
                CheckoutNotification::Closed
            ]
        );
        assert!(controller.target().is_none());
        assert_eq!(controller.close(), None);
    }

    #[test]
    fn test_drop_releases_attempt() {
        let page = Rc::new(RefCell::new(Page::default()));
        {
            let mut checkout = EmbeddedCheckout::new(
                EmbedConfig::new("K"),
                FakeHost(page.clone()),
                FakeChannel {
                    page: page.clone(),
                    fail: false,
                },
                Recorder::default(),
            );
            checkout.open();
            assert_eq!(page.borrow().listeners, 1);
        }
        assert_eq!(page.borrow().listeners, 0);
        assert!(page.borrow().mounted.is_empty());
    }

    #[test]
    fn test_controllers_do_not_share_listeners() {
        let (mut first, first_page) = checkout();
        let (mut second, second_page) = checkout();
        first.open();
        second.open();

        first.deliver("x", &json!({"type": "close_modal"}));

        assert!(!first.is_open());
        assert!(second.is_open());
        assert_eq!(first_page.borrow().listeners, 0);
        assert_eq!(second_page.borrow().listeners, 1);
    }

    #[test]
    fn test_dispatch_continues_after_error() {
        let recorder = Recorder {
            fail_success: true,
            ..Recorder::default()
        };
        let result = dispatch_notifications(
            &recorder,
            vec![
                CheckoutNotification::Success(json!(1)),
                CheckoutNotification::Closed,
            ],
        );

        assert!(result.is_err());
        assert_eq!(recorder.calls.borrow().clone(), vec!["success:1", "close"]);
    }
}
