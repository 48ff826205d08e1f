//! Scripted listener platform.
//!
//! `FakePlatform` stands in for the DOM: it records every listener that is
//! attached, delivers synthetic events synchronously in registration order
//! and forgets a listener as soon as its handle is released.

use cranpose_core::{
    EventHandler, ListenerHandle, ListenerOptions, ListenerPlatform, PointerEventName,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Something listeners can be attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FakeTarget {
    /// A surface identified by name.
    Element(String),
    /// The document root.
    Document,
}

impl FakeTarget {
    pub fn element(name: impl Into<String>) -> Self {
        FakeTarget::Element(name.into())
    }
}

/// Synthetic event payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeEvent {
    /// Caller-chosen sequence number so recordings can be matched up.
    pub seq: u32,
    /// Nested element the event originated from, checked against
    /// [`ListenerOptions::restrict_to`].
    pub origin: Option<String>,
}

impl FakeEvent {
    pub fn new(seq: u32) -> Self {
        Self { seq, origin: None }
    }

    pub fn from_element(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

struct Registration {
    id: u64,
    target: FakeTarget,
    name: PointerEventName,
    handler: EventHandler<FakeEvent>,
    options: ListenerOptions,
}

impl Registration {
    fn accepts(&self, event: &FakeEvent) -> bool {
        match &self.options.restrict_to {
            Some(selector) => event.origin.as_deref() == Some(selector.as_str()),
            None => true,
        }
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
    attached_total: usize,
    released_total: usize,
}

/// In-memory [`ListenerPlatform`]. Clones share the same registry.
#[derive(Clone, Default)]
pub struct FakePlatform {
    registry: Rc<RefCell<Registry>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every matching listener and returns how many ran.
    ///
    /// Listeners removed by an earlier handler during the same dispatch are
    /// skipped, matching DOM behaviour.
    pub fn dispatch(
        &self,
        target: &FakeTarget,
        name: PointerEventName,
        event: &FakeEvent,
    ) -> usize {
        let candidates: Vec<(u64, EventHandler<FakeEvent>)> = self
            .registry
            .borrow()
            .registrations
            .iter()
            .filter(|reg| &reg.target == target && reg.name == name && reg.accepts(event))
            .map(|reg| (reg.id, reg.handler.clone()))
            .collect();

        let mut delivered = 0;
        for (id, handler) in candidates {
            if !self.is_registered(id) {
                continue;
            }
            handler(event);
            delivered += 1;
        }
        delivered
    }

    /// Number of live listeners for `name` on `target`.
    pub fn listener_count(&self, target: &FakeTarget, name: PointerEventName) -> usize {
        self.registry
            .borrow()
            .registrations
            .iter()
            .filter(|reg| &reg.target == target && reg.name == name)
            .count()
    }

    /// Number of live listeners across all targets.
    pub fn live_listeners(&self) -> usize {
        self.registry.borrow().registrations.len()
    }

    /// Total attach calls seen so far.
    pub fn attached_total(&self) -> usize {
        self.registry.borrow().attached_total
    }

    /// Total listeners released so far.
    pub fn released_total(&self) -> usize {
        self.registry.borrow().released_total
    }

    /// Options the first live listener for `name` on `target` was attached with.
    pub fn options_for(
        &self,
        target: &FakeTarget,
        name: PointerEventName,
    ) -> Option<ListenerOptions> {
        self.registry
            .borrow()
            .registrations
            .iter()
            .find(|reg| &reg.target == target && reg.name == name)
            .map(|reg| reg.options.clone())
    }

    /// True when the first live listeners for `a` and `b` on `target` are
    /// the same handler.
    pub fn shares_handler(
        &self,
        target: &FakeTarget,
        a: PointerEventName,
        b: PointerEventName,
    ) -> bool {
        let registry = self.registry.borrow();
        let find = |name| {
            registry
                .registrations
                .iter()
                .find(|reg| &reg.target == target && reg.name == name)
                .map(|reg| reg.handler.clone())
        };
        match (find(a), find(b)) {
            (Some(first), Some(second)) => Rc::ptr_eq(&first, &second),
            _ => false,
        }
    }

    fn is_registered(&self, id: u64) -> bool {
        self.registry
            .borrow()
            .registrations
            .iter()
            .any(|reg| reg.id == id)
    }
}

impl ListenerPlatform for FakePlatform {
    type Target = FakeTarget;
    type Event = FakeEvent;

    fn add_listener(
        &self,
        target: &FakeTarget,
        name: PointerEventName,
        handler: EventHandler<FakeEvent>,
        options: &ListenerOptions,
    ) -> ListenerHandle {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.attached_total += 1;
            registry.registrations.push(Registration {
                id,
                target: target.clone(),
                name,
                handler,
                options: options.clone(),
            });
            id
        };

        let registry = Rc::downgrade(&self.registry);
        ListenerHandle::new(move || {
            if let Some(registry) = registry.upgrade() {
                let mut registry = registry.borrow_mut();
                let before = registry.registrations.len();
                registry.registrations.retain(|reg| reg.id != id);
                if registry.registrations.len() != before {
                    registry.released_total += 1;
                }
            }
        })
    }

    fn document_root(&self) -> FakeTarget {
        FakeTarget::Document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handler(count: &Rc<Cell<u32>>) -> EventHandler<FakeEvent> {
        let count = count.clone();
        Rc::new(move |_: &FakeEvent| count.set(count.get() + 1))
    }

    #[test]
    fn released_listener_stops_receiving() {
        let platform = FakePlatform::new();
        let surface = FakeTarget::element("surface");
        let count = Rc::new(Cell::new(0));
        let handle = platform.add_listener(
            &surface,
            PointerEventName::TouchStart,
            counting_handler(&count),
            &ListenerOptions::default(),
        );

        let start = PointerEventName::TouchStart;
        assert_eq!(platform.dispatch(&surface, start, &FakeEvent::new(1)), 1);
        handle.release();
        assert_eq!(platform.dispatch(&surface, start, &FakeEvent::new(2)), 0);
        assert_eq!(count.get(), 1);
        assert_eq!(platform.released_total(), 1);
        assert_eq!(platform.live_listeners(), 0);
    }

    #[test]
    fn restricted_listener_filters_by_origin() {
        let platform = FakePlatform::new();
        let surface = FakeTarget::element("surface");
        let count = Rc::new(Cell::new(0));
        let options = ListenerOptions {
            restrict_to: Some("handle".into()),
            ..ListenerOptions::default()
        };
        let _handle = platform.add_listener(
            &surface,
            PointerEventName::MouseDown,
            counting_handler(&count),
            &options,
        );

        platform.dispatch(&surface, PointerEventName::MouseDown, &FakeEvent::new(1));
        platform.dispatch(
            &surface,
            PointerEventName::MouseDown,
            &FakeEvent::new(2).from_element("handle"),
        );
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn targets_are_isolated() {
        let platform = FakePlatform::new();
        let count = Rc::new(Cell::new(0));
        let _handle = platform.add_listener(
            &FakeTarget::Document,
            PointerEventName::MouseUp,
            counting_handler(&count),
            &ListenerOptions::default(),
        );

        let surface = FakeTarget::element("surface");
        platform.dispatch(&surface, PointerEventName::MouseUp, &FakeEvent::new(1));
        assert_eq!(count.get(), 0);
        assert_eq!(
            platform.listener_count(&FakeTarget::Document, PointerEventName::MouseUp),
            1
        );
    }
}
