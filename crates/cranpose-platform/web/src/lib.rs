//! Web platform adapter for Cranpose pointer input.
//!
//! Listeners are registered through `addEventListener` on real DOM targets.
//! Each registration keeps its `Closure` alive inside the returned
//! [`ListenerHandle`]; releasing the handle removes the listener and frees
//! the closure.

use cranpose_core::{
    EventHandler, ListenerHandle, ListenerOptions, ListenerPlatform, PointerEventName,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget};

pub struct WebPlatform {
    document: Document,
}

impl WebPlatform {
    /// Creates a platform bound to the global window's document.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let document = window.document().ok_or("should have a document on window")?;
        Ok(Self::with_document(document))
    }

    pub fn with_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Looks up an element by id and returns it as a listener target.
    pub fn element_by_id(&self, id: &str) -> Option<EventTarget> {
        self.document
            .get_element_by_id(id)
            .map(|element| element.unchecked_into())
    }
}

impl ListenerPlatform for WebPlatform {
    type Target = EventTarget;
    type Event = Event;

    fn add_listener(
        &self,
        target: &EventTarget,
        name: PointerEventName,
        handler: EventHandler<Event>,
        options: &ListenerOptions,
    ) -> ListenerHandle {
        let restrict_to = options.restrict_to.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if passes_restriction(restrict_to.as_deref(), |selector| {
                originates_from(&event, selector)
            }) {
                handler(&event);
            }
        }) as Box<dyn FnMut(_)>);

        let add_options = AddEventListenerOptions::new();
        add_options.set_capture(options.capture);
        add_options.set_passive(options.passive);

        if let Err(err) = target.add_event_listener_with_callback_and_add_event_listener_options(
            name.as_str(),
            closure.as_ref().unchecked_ref(),
            &add_options,
        ) {
            log::warn!("failed to attach {} listener: {:?}", name, err);
            return ListenerHandle::inert();
        }

        let target = target.clone();
        let capture = options.capture;
        ListenerHandle::new(move || {
            if let Err(err) = target.remove_event_listener_with_callback_and_bool(
                name.as_str(),
                closure.as_ref().unchecked_ref(),
                capture,
            ) {
                log::warn!("failed to detach {} listener: {:?}", name, err);
            }
            drop(closure);
        })
    }

    fn document_root(&self) -> EventTarget {
        self.document.clone().unchecked_into()
    }
}

/// True when no restriction is set or `matches` accepts the selector.
fn passes_restriction(restrict_to: Option<&str>, matches: impl FnOnce(&str) -> bool) -> bool {
    match restrict_to {
        Some(selector) => matches(selector),
        None => true,
    }
}

/// True when the event target, or one of its ancestors, matches `selector`.
fn originates_from(event: &Event, selector: &str) -> bool {
    let Some(element) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return false;
    };
    match element.closest(selector) {
        Ok(found) => found.is_some(),
        Err(err) => {
            log::warn!("invalid target restriction {:?}: {:?}", selector, err);
            false
        }
    }
}
