//! # checkout-wasm
//!
//! Browser widget for embed-checkout-rs.
//!
//! Exposes a `PaymentGateway` class that opens the hosted checkout in a
//! modal iframe and reports the outcome through JavaScript callbacks.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PaymentGateway } from 'checkout-wasm';
//!
//! await init();
//!
//! const checkout = new PaymentGateway({
//!   key: 'key_test_abc123',
//!   orderId: 'order_NXhj9Wq2',
//!   onSuccess: (data) => console.log('paid', data.paymentId),
//!   onFailure: (data) => console.warn('failed', data),
//!   onClose: () => console.log('closed'),
//! });
//!
//! checkout.open();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

pub mod dom;

use checkout_core::{
    checkout_url, dispatch_notifications, CheckoutHandler, CheckoutNotification, EmbedConfig,
    EmbedController, GatewayError, GatewayResult, OriginPolicy, MISSING_KEY_MESSAGE,
};
use dom::{DomSurfaceHost, WindowChannel};
use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// JavaScript callbacks taken from the options object
#[derive(Default)]
struct JsCallbacks {
    on_success: Option<Function>,
    on_failure: Option<Function>,
    on_close: Option<Function>,
}

impl JsCallbacks {
    fn from_options(options: &JsValue) -> Self {
        let get = |name: &str| {
            Reflect::get(options, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.dyn_into::<Function>().ok())
        };

        Self {
            on_success: get("onSuccess"),
            on_failure: get("onFailure"),
            on_close: get("onClose"),
        }
    }

    fn call(name: &str, callback: &Option<Function>, arg: Option<JsValue>) -> GatewayResult<()> {
        let Some(callback) = callback else {
            return Ok(());
        };

        let result = match arg {
            Some(arg) => callback.call1(&JsValue::NULL, &arg),
            None => callback.call0(&JsValue::NULL),
        };

        result
            .map(|_| ())
            .map_err(|e| GatewayError::Internal(format!("{} threw: {:?}", name, e)))
    }
}

fn decode_options(options: &JsValue) -> GatewayResult<EmbedConfig> {
    if options.is_undefined() || options.is_null() {
        return Ok(EmbedConfig::default());
    }
    serde_wasm_bindgen::from_value(options.clone())
        .map_err(|e| GatewayError::Configuration(format!("invalid options: {}", e)))
}

/// Read the string options one by one, skipping any that are not strings.
///
/// Used when the options object as a whole does not decode, so one bad
/// field does not cost the caller its key and order.
fn salvage_options(options: &JsValue) -> EmbedConfig {
    let get = |name: &str| {
        Reflect::get(options, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.as_string())
    };

    EmbedConfig {
        key: get("key"),
        order_id: get("orderId"),
        base_url: get("baseUrl"),
        origin_policy: OriginPolicy::from(get("allowedOrigin")),
    }
}

fn console_error(err: &GatewayError) {
    web_sys::console::error_1(&JsValue::from_str(&format!("PaymentGateway: {}", err)));
}

fn to_js(data: &Value) -> GatewayResult<JsValue> {
    // Plain objects rather than Maps, as a JSON.parse would give
    data.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| GatewayError::Serialization(e.to_string()))
}

impl CheckoutHandler for JsCallbacks {
    fn on_success(&self, data: &Value) -> GatewayResult<()> {
        Self::call("onSuccess", &self.on_success, Some(to_js(data)?))
    }

    fn on_failure(&self, data: &Value) -> GatewayResult<()> {
        Self::call("onFailure", &self.on_failure, Some(to_js(data)?))
    }

    fn on_close(&self) -> GatewayResult<()> {
        Self::call("onClose", &self.on_close, None)
    }
}

/// State shared between the JS object and the DOM listeners.
///
/// Listeners hold a `Weak` so the page can free the widget. Callbacks run
/// only after the controller borrow is released, so they may call back in.
struct Shared {
    controller: RefCell<EmbedController<DomSurfaceHost, WindowChannel>>,
    callbacks: JsCallbacks,
}

impl Shared {
    fn new(config: EmbedConfig, callbacks: JsCallbacks) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Shared>| {
            let on_close_click = {
                let weak = weak.clone();
                Rc::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.close();
                    }
                }) as Rc<dyn Fn()>
            };
            let on_message = {
                let weak = weak.clone();
                Rc::new(move |origin: String, data: Value| {
                    if let Some(shared) = weak.upgrade() {
                        shared.deliver(&origin, &data);
                    }
                }) as Rc<dyn Fn(String, Value)>
            };

            Shared {
                controller: RefCell::new(EmbedController::new(
                    config,
                    DomSurfaceHost::new(on_close_click),
                    WindowChannel::new(on_message),
                )),
                callbacks,
            }
        })
    }

    fn open(&self) -> GatewayResult<bool> {
        self.controller.borrow_mut().open()
    }

    fn close(&self) {
        let notification = self.controller.borrow_mut().close();
        self.notify(notification);
    }

    fn deliver(&self, origin: &str, data: &Value) {
        let notifications = self.controller.borrow_mut().handle_message(origin, data);
        self.notify(notifications);
    }

    fn notify(&self, notifications: impl IntoIterator<Item = CheckoutNotification>) {
        if let Err(e) = dispatch_notifications(&self.callbacks, notifications) {
            console_error(&e);
        }
    }
}

/// Embedded checkout widget.
///
/// On `payment_success` the modal is removed before `onSuccess` runs, then
/// `onClose` follows. Inside `onSuccess`, `isOpen` is already `false` and
/// the iframe is gone from the document.
#[wasm_bindgen]
pub struct PaymentGateway {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl PaymentGateway {
    /// `options`: `{ key, orderId?, baseUrl?, allowedOrigin?, onSuccess?, onFailure?, onClose? }`
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> PaymentGateway {
        let config = decode_options(&options).unwrap_or_else(|e| {
            console_error(&e);
            salvage_options(&options)
        });

        if config.key().is_none() {
            web_sys::console::error_1(&JsValue::from_str(MISSING_KEY_MESSAGE));
        }

        Self {
            shared: Shared::new(config, JsCallbacks::from_options(&options)),
        }
    }

    /// Show the checkout. Does nothing if it is already showing.
    ///
    /// Failures (bad `baseUrl`, no document) go to the console.
    pub fn open(&self) {
        if let Err(e) = self.shared.open() {
            console_error(&e);
        }
    }

    /// Remove the checkout and run `onClose`. Does nothing if it is not showing.
    pub fn close(&self) {
        self.shared.close();
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.shared.controller.borrow().is_open()
    }

    /// Address the iframe is (or would be) pointed at
    #[wasm_bindgen(getter, js_name = checkoutUrl)]
    pub fn checkout_url(&self) -> Option<String> {
        checkout_url(self.shared.controller.borrow().config())
            .ok()
            .map(String::from)
    }
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_missing_callbacks_are_noops() {
        let callbacks = JsCallbacks::default();
        assert!(JsCallbacks::call("onClose", &callbacks.on_close, None).is_ok());
        assert!(callbacks.on_close().is_ok());
    }
}
