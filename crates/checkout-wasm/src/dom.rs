//! # DOM Host
//!
//! Browser implementations of the controller's two seams: the modal overlay
//! holding the checkout iframe, and the window `message` listener.

use checkout_core::{GatewayError, GatewayResult, MessageChannel, SurfaceHost, Url};
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement, MessageEvent, Window};

pub const MODAL_ID: &str = "payment-gateway-modal";
pub const MODAL_TEST_ID: &str = "payment-modal";
pub const CLOSE_BUTTON_TEST_ID: &str = "close-modal-button";
pub const IFRAME_TEST_ID: &str = "payment-iframe";

const TEST_ID_ATTR: &str = "data-test-id";

fn surface_error(context: &str, err: JsValue) -> GatewayError {
    GatewayError::Surface(format!("{}: {:?}", context, err))
}

fn window() -> GatewayResult<Window> {
    web_sys::window().ok_or_else(|| GatewayError::Surface("no global window".to_string()))
}

fn document() -> GatewayResult<Document> {
    window()?
        .document()
        .ok_or_else(|| GatewayError::Surface("window has no document".to_string()))
}

fn create(document: &Document, tag: &str) -> GatewayResult<Element> {
    document
        .create_element(tag)
        .map_err(|e| surface_error(&format!("create <{}>", tag), e))
}

/// A mounted overlay. The click closure lives exactly as long as the button.
pub struct ModalSurface {
    overlay: Element,
    _on_close_click: Closure<dyn FnMut()>,
}

/// Mounts the checkout as a modal overlay on `document.body`
pub struct DomSurfaceHost {
    on_close_click: Rc<dyn Fn()>,
}

impl DomSurfaceHost {
    /// `on_close_click` runs when the overlay's close button is pressed
    pub fn new(on_close_click: Rc<dyn Fn()>) -> Self {
        Self { on_close_click }
    }

    fn build(&self, document: &Document, target: &Url) -> GatewayResult<ModalSurface> {
        let overlay = create(document, "div")?;
        overlay.set_id(MODAL_ID);
        overlay.set_class_name("modal-overlay");
        overlay
            .set_attribute(TEST_ID_ATTR, MODAL_TEST_ID)
            .map_err(|e| surface_error("tag overlay", e))?;

        let content = create(document, "div")?;
        content.set_class_name("modal-content");

        let button = create(document, "button")?
            .dyn_into::<HtmlElement>()
            .map_err(|e| surface_error("close button", e.into()))?;
        button.set_class_name("close-button");
        button.set_text_content(Some("×"));
        button
            .set_attribute(TEST_ID_ATTR, CLOSE_BUTTON_TEST_ID)
            .map_err(|e| surface_error("tag close button", e))?;

        let on_close = self.on_close_click.clone();
        let on_close_click = Closure::<dyn FnMut()>::new(move || on_close());
        button.set_onclick(Some(on_close_click.as_ref().unchecked_ref()));

        let iframe = create(document, "iframe")?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|e| surface_error("iframe", e.into()))?;
        iframe
            .set_attribute(TEST_ID_ATTR, IFRAME_TEST_ID)
            .map_err(|e| surface_error("tag iframe", e))?;
        iframe.set_src(target.as_str());

        content
            .append_child(&button)
            .and_then(|_| content.append_child(&iframe))
            .and_then(|_| overlay.append_child(&content))
            .map_err(|e| surface_error("assemble overlay", e))?;

        Ok(ModalSurface {
            overlay,
            _on_close_click: on_close_click,
        })
    }
}

impl SurfaceHost for DomSurfaceHost {
    type Surface = ModalSurface;

    fn mount(&mut self, target: &Url) -> GatewayResult<ModalSurface> {
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| GatewayError::Surface("document has no body".to_string()))?;

        let surface = self.build(&document, target)?;
        body.append_child(&surface.overlay)
            .map_err(|e| surface_error("attach overlay", e))?;
        Ok(surface)
    }

    fn unmount(&mut self, surface: ModalSurface) {
        surface.overlay.remove();
    }
}

/// A registered window listener
pub struct WindowSubscription {
    window: Window,
    listener: Closure<dyn FnMut(MessageEvent)>,
}

/// Feeds window `message` events to a callback as `(origin, data)`
pub struct WindowChannel {
    on_message: Rc<dyn Fn(String, Value)>,
}

impl WindowChannel {
    pub fn new(on_message: Rc<dyn Fn(String, Value)>) -> Self {
        Self { on_message }
    }
}

impl MessageChannel for WindowChannel {
    type Subscription = WindowSubscription;

    fn subscribe(&mut self) -> GatewayResult<WindowSubscription> {
        let window = window().map_err(|e| GatewayError::Channel(e.to_string()))?;

        let on_message = self.on_message.clone();
        let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            // Payloads that are not plain JSON decode as unknown messages
            let data = serde_wasm_bindgen::from_value(event.data()).unwrap_or(Value::Null);
            on_message(event.origin(), data);
        });

        window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .map_err(|e| GatewayError::Channel(format!("add message listener: {:?}", e)))?;

        Ok(WindowSubscription { window, listener })
    }

    fn unsubscribe(&mut self, subscription: WindowSubscription) {
        let _ = subscription.window.remove_event_listener_with_callback(
            "message",
            subscription.listener.as_ref().unchecked_ref(),
        );
    }
}
