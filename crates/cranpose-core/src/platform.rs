//! Platform abstraction traits for pointer input plumbing.
//!
//! These traits allow Cranpose to delegate listener registration and clock
//! responsibilities to the host platform, so input sources can run against
//! the DOM, a native windowing backend, or a scripted test double without
//! depending on any of them directly.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Shared event callback.
///
/// Handlers are reference counted so one closure can be registered for
/// several event names (touch end and touch cancel share a handler).
pub type EventHandler<E> = Rc<dyn Fn(&E)>;

/// Native event names a pointer source listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventName {
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    MouseDown,
    MouseMove,
    MouseUp,
}

impl PointerEventName {
    /// Returns the DOM event type string for this name.
    pub fn as_str(self) -> &'static str {
        match self {
            PointerEventName::TouchStart => "touchstart",
            PointerEventName::TouchMove => "touchmove",
            PointerEventName::TouchEnd => "touchend",
            PointerEventName::TouchCancel => "touchcancel",
            PointerEventName::MouseDown => "mousedown",
            PointerEventName::MouseMove => "mousemove",
            PointerEventName::MouseUp => "mouseup",
        }
    }
}

impl fmt::Display for PointerEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options forwarded untouched to the platform when a listener is attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Dispatch during the capture phase instead of the bubble phase.
    pub capture: bool,
    /// The handler promises never to cancel the native default action.
    pub passive: bool,
    /// Only events originating from matching nested elements are delivered.
    ///
    /// The meaning of the string is up to the platform; the web platform
    /// treats it as a CSS selector.
    pub restrict_to: Option<String>,
}

/// Owned disposer for an attached listener.
///
/// Releasing consumes the handle, so a listener can only ever be detached
/// once. A handle that is dropped without an explicit release detaches its
/// listener as well.
pub struct ListenerHandle {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to detach.
    ///
    /// Platforms return this when the host refused the registration so that
    /// callers can keep treating "handle present" as "listener active".
    pub fn inert() -> Self {
        Self { release: None }
    }

    /// Detaches the listener.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Attaches native event listeners on behalf of input sources.
///
/// All calls happen on the thread that dispatches UI events. Handlers may
/// attach or detach other listeners while they run, so implementations must
/// not hold internal borrows across a handler invocation.
pub trait ListenerPlatform {
    /// Something listeners can be attached to (an element, the document).
    type Target: Clone;
    /// Native event payload handed to handlers.
    type Event;

    /// Attaches `handler` for `name` on `target` and returns its disposer.
    fn add_listener(
        &self,
        target: &Self::Target,
        name: PointerEventName,
        handler: EventHandler<Self::Event>,
        options: &ListenerOptions,
    ) -> ListenerHandle;

    /// Root target that keeps receiving events after the pointer leaves the
    /// original surface.
    fn document_root(&self) -> Self::Target;
}

impl<P: ListenerPlatform + ?Sized> ListenerPlatform for Rc<P> {
    type Target = P::Target;
    type Event = P::Event;

    fn add_listener(
        &self,
        target: &Self::Target,
        name: PointerEventName,
        handler: EventHandler<Self::Event>,
        options: &ListenerOptions,
    ) -> ListenerHandle {
        (**self).add_listener(target, name, handler, options)
    }

    fn document_root(&self) -> Self::Target {
        (**self).document_root()
    }
}

/// Provides timing information for input sources.
pub trait Clock {
    /// Monotonic instant type produced by this clock implementation.
    type Instant: Copy + Ord;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the instant `after` from now, or `None` when it cannot be
    /// represented.
    fn deadline(&self, after: Duration) -> Option<Self::Instant>;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn deadline(&self, after: Duration) -> Option<Self::Instant> {
        (**self).deadline(after)
    }
}

/// Monotonic wall clock that works on native targets and in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn deadline(&self, after: Duration) -> Option<Self::Instant> {
        web_time::Instant::now().checked_add(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn release_runs_disposer_once() {
        let count = Rc::new(Cell::new(0));
        let handle = {
            let count = count.clone();
            ListenerHandle::new(move || count.set(count.get() + 1))
        };
        handle.release();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dropping_handle_releases_listener() {
        let count = Rc::new(Cell::new(0));
        {
            let count = count.clone();
            let _handle = ListenerHandle::new(move || count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn inert_handle_release_is_noop() {
        ListenerHandle::inert().release();
    }

    #[test]
    fn event_names_match_dom() {
        assert_eq!(PointerEventName::TouchCancel.as_str(), "touchcancel");
        assert_eq!(PointerEventName::MouseDown.to_string(), "mousedown");
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn system_clock_deadline_lies_ahead() {
        let clock = SystemClock;
        let before = clock.now();
        let deadline = clock
            .deadline(Duration::from_millis(1))
            .expect("representable deadline");
        assert!(deadline > before);
    }

    #[test]
    fn system_clock_deadline_overflow_is_none() {
        assert!(SystemClock.deadline(Duration::MAX).is_none());
    }
}
