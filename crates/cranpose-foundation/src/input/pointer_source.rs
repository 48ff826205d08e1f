//! Unified touch and mouse pointer source.
//!
//! `PointerEventSource` turns the touch and mouse listener families of a
//! surface into a single down/move/up stream for gesture recognisers. Only
//! the two start listeners stay attached for the lifetime of the source;
//! move/end/cancel/up listeners exist only while an interaction of their
//! modality is in progress.
//!
//! Hybrid devices emit a compatibility `mousedown` shortly after
//! `touchstart`. Mouse downs arriving inside the suppression window that
//! follows a touch start are dropped so recognisers never see the same
//! contact twice.

use super::config::PointerSourceConfig;
use super::types::{InputModality, PointerCallback, PointerDownCallback};
use cranpose_core::{
    Clock, EventHandler, ListenerHandle, ListenerOptions, ListenerPlatform, PointerEventName,
    SystemClock,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Construction failures for [`PointerEventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSourceError {
    /// No surface was supplied.
    MissingTarget,
    /// No pointer-down callback was supplied.
    MissingPointerDown,
}

impl fmt::Display for PointerSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PointerSourceError::MissingTarget => "pointer source requires a target surface",
            PointerSourceError::MissingPointerDown => {
                "pointer source requires a pointer-down callback"
            }
        };
        f.write_str(message)
    }
}

impl std::error::Error for PointerSourceError {}

struct Callbacks<E> {
    down: Option<PointerDownCallback<E>>,
    moved: Option<PointerCallback<E>>,
    up: Option<PointerCallback<E>>,
}

impl<E> Callbacks<E> {
    fn clear(&mut self) {
        self.down = None;
        self.moved = None;
        self.up = None;
    }
}

#[derive(Default)]
struct TouchListeners {
    moved: Option<ListenerHandle>,
    end: Option<ListenerHandle>,
    cancel: Option<ListenerHandle>,
}

impl TouchListeners {
    fn is_active(&self) -> bool {
        self.moved.is_some() || self.end.is_some() || self.cancel.is_some()
    }

    fn take(&mut self) -> [Option<ListenerHandle>; 3] {
        [self.moved.take(), self.end.take(), self.cancel.take()]
    }
}

#[derive(Default)]
struct MouseListeners {
    moved: Option<ListenerHandle>,
    up: Option<ListenerHandle>,
}

impl MouseListeners {
    fn is_active(&self) -> bool {
        self.moved.is_some() || self.up.is_some()
    }

    fn take(&mut self) -> [Option<ListenerHandle>; 2] {
        [self.moved.take(), self.up.take()]
    }
}

/// End of the mouse suppression window opened by a touch start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TouchDeadline<I> {
    Until(I),
    /// The window reaches past anything the clock can represent.
    Unbounded,
}

impl<I: Ord> TouchDeadline<I> {
    fn suppresses(&self, now: &I) -> bool {
        match self {
            TouchDeadline::Until(deadline) => deadline > now,
            TouchDeadline::Unbounded => true,
        }
    }
}

struct SourceState<T, E, I> {
    target: Option<T>,
    callbacks: Callbacks<E>,
    options: ListenerOptions,
    suppression_window: Duration,
    touch_deadline: Option<TouchDeadline<I>>,
    last_modality: InputModality,
    touch_start: Option<ListenerHandle>,
    mouse_down: Option<ListenerHandle>,
    touch: TouchListeners,
    mouse: MouseListeners,
    destroyed: bool,
}

/// Shared handlers, built once so the same closure is attached for touch
/// end and touch cancel.
struct Handlers<E> {
    touch_move: EventHandler<E>,
    touch_end: EventHandler<E>,
    mouse_move: EventHandler<E>,
    mouse_up: EventHandler<E>,
}

struct Inner<P: ListenerPlatform, C: Clock> {
    platform: P,
    clock: C,
    handlers: Handlers<P::Event>,
    state: RefCell<SourceState<P::Target, P::Event, C::Instant>>,
}

/// Merges touch and mouse listeners on a surface into one pointer stream.
///
/// Dropping the source destroys it.
pub struct PointerEventSource<P, C = SystemClock>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    inner: Rc<Inner<P, C>>,
}

impl<P> PointerEventSource<P, SystemClock>
where
    P: ListenerPlatform + 'static,
{
    pub fn builder(platform: P) -> PointerEventSourceBuilder<P, SystemClock> {
        PointerEventSourceBuilder::new(platform)
    }
}

impl<P, C> PointerEventSource<P, C>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    /// Modality of the most recently accepted interaction start.
    pub fn last_modality(&self) -> InputModality {
        self.inner.state.borrow().last_modality
    }

    pub fn suppression_window(&self) -> Duration {
        self.inner.state.borrow().suppression_window
    }

    /// Changes the suppression window for subsequent touch starts.
    pub fn set_suppression_window(&self, window: Duration) {
        self.inner.state.borrow_mut().suppression_window = window;
    }

    /// Returns true while secondary listeners of `modality` are attached.
    pub fn is_tracking(&self, modality: InputModality) -> bool {
        let state = self.inner.state.borrow();
        match modality {
            InputModality::Touch => state.touch.is_active(),
            InputModality::Mouse => state.mouse.is_active(),
            InputModality::Undefined => false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// Detaches every secondary listener without reporting pointer-up.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Detaches all listeners and drops the surface and callbacks.
    ///
    /// The source stays inert afterwards; calling this again does nothing.
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

impl<P, C> Drop for PointerEventSource<P, C>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

impl<P, C> fmt::Debug for PointerEventSource<P, C>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("PointerEventSource")
            .field("last_modality", &state.last_modality)
            .field("suppression_window", &state.suppression_window)
            .field("touch_active", &state.touch.is_active())
            .field("mouse_active", &state.mouse.is_active())
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

impl<P, C> Inner<P, C>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    fn attach(
        &self,
        target: &P::Target,
        name: PointerEventName,
        handler: EventHandler<P::Event>,
        options: &ListenerOptions,
    ) -> ListenerHandle {
        log::trace!("attaching {} listener", name);
        self.platform.add_listener(target, name, handler, options)
    }

    fn handle_touch_start(&self, event: &P::Event) {
        let down = {
            let mut state = self.state.borrow_mut();
            let Some(down) = state.callbacks.down.clone() else {
                return;
            };
            let deadline = match self.clock.deadline(state.suppression_window) {
                Some(instant) => TouchDeadline::Until(instant),
                None => TouchDeadline::Unbounded,
            };
            state.touch_deadline = Some(deadline);
            state.last_modality = InputModality::Touch;
            down
        };

        if !down(event, InputModality::Touch) {
            return;
        }

        let mut state = self.state.borrow_mut();
        let Some(target) = state.target.clone() else {
            return;
        };
        let options = state.options.clone();

        if state.touch.moved.is_none() && state.callbacks.moved.is_some() {
            let handle = self.attach(
                &target,
                PointerEventName::TouchMove,
                self.handlers.touch_move.clone(),
                &options,
            );
            state.touch.moved = Some(handle);
        }
        if state.touch.end.is_none() {
            let handle = self.attach(
                &target,
                PointerEventName::TouchEnd,
                self.handlers.touch_end.clone(),
                &options,
            );
            state.touch.end = Some(handle);
        }
        if state.touch.cancel.is_none() {
            let handle = self.attach(
                &target,
                PointerEventName::TouchCancel,
                self.handlers.touch_end.clone(),
                &options,
            );
            state.touch.cancel = Some(handle);
        }
    }

    fn handle_mouse_down(&self, event: &P::Event) {
        let down = {
            let mut state = self.state.borrow_mut();
            let Some(down) = state.callbacks.down.clone() else {
                return;
            };
            if let Some(deadline) = state.touch_deadline {
                if deadline.suppresses(&self.clock.now()) {
                    log::debug!("mousedown event dropped because of previous touch");
                    return;
                }
            }
            state.last_modality = InputModality::Mouse;
            down
        };

        if !down(event, InputModality::Mouse) {
            return;
        }

        let mut state = self.state.borrow_mut();
        if state.target.is_none() {
            return;
        }
        let options = state.options.clone();
        let needs_move = state.mouse.moved.is_none() && state.callbacks.moved.is_some();
        let needs_up = state.mouse.up.is_none();
        if !needs_move && !needs_up {
            return;
        }

        // Drags routinely leave the surface, so follow them on the document.
        let document = self.platform.document_root();
        if needs_move {
            let handle = self.attach(
                &document,
                PointerEventName::MouseMove,
                self.handlers.mouse_move.clone(),
                &options,
            );
            state.mouse.moved = Some(handle);
        }
        if needs_up {
            let handle = self.attach(
                &document,
                PointerEventName::MouseUp,
                self.handlers.mouse_up.clone(),
                &options,
            );
            state.mouse.up = Some(handle);
        }
    }

    fn handle_move(&self, event: &P::Event, modality: InputModality) {
        let moved = self.state.borrow().callbacks.moved.clone();
        if let Some(moved) = moved {
            moved(event, modality);
        }
    }

    fn handle_touch_end(&self, event: &P::Event) {
        self.stop_touch();
        self.report_up(event, InputModality::Touch);
    }

    fn handle_mouse_up(&self, event: &P::Event) {
        self.stop_mouse();
        self.report_up(event, InputModality::Mouse);
    }

    fn report_up(&self, event: &P::Event, modality: InputModality) {
        let up = self.state.borrow().callbacks.up.clone();
        if let Some(up) = up {
            up(event, modality);
        }
    }

    fn stop_touch(&self) {
        let handles = self.state.borrow_mut().touch.take();
        release_all(handles);
    }

    fn stop_mouse(&self) {
        let handles = self.state.borrow_mut().mouse.take();
        release_all(handles);
    }

    fn stop(&self) {
        self.stop_touch();
        self.stop_mouse();
    }

    fn destroy(&self) {
        let starts = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            [state.touch_start.take(), state.mouse_down.take()]
        };
        release_all(starts);
        self.stop();

        let mut state = self.state.borrow_mut();
        state.target = None;
        state.callbacks.clear();
    }
}

fn release_all<const N: usize>(handles: [Option<ListenerHandle>; N]) {
    for handle in handles.into_iter().flatten() {
        handle.release();
    }
}

fn forward<P, C>(
    inner: &Weak<Inner<P, C>>,
    handle: impl Fn(&Inner<P, C>, &P::Event) + 'static,
) -> EventHandler<P::Event>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    let inner = inner.clone();
    Rc::new(move |event: &P::Event| {
        if let Some(inner) = inner.upgrade() {
            handle(&inner, event);
        }
    })
}

/// Builder for [`PointerEventSource`].
pub struct PointerEventSourceBuilder<P, C = SystemClock>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    platform: P,
    clock: C,
    target: Option<P::Target>,
    on_down: Option<PointerDownCallback<P::Event>>,
    on_move: Option<PointerCallback<P::Event>>,
    on_up: Option<PointerCallback<P::Event>>,
    config: PointerSourceConfig,
}

impl<P> PointerEventSourceBuilder<P, SystemClock>
where
    P: ListenerPlatform + 'static,
{
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            clock: SystemClock,
            target: None,
            on_down: None,
            on_move: None,
            on_up: None,
            config: PointerSourceConfig::default(),
        }
    }
}

impl<P, C> PointerEventSourceBuilder<P, C>
where
    P: ListenerPlatform + 'static,
    C: Clock + 'static,
{
    /// Surface whose touch and mouse start events are observed.
    pub fn target(mut self, target: P::Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Required. Returning `false` ignores the interaction.
    pub fn on_down(
        mut self,
        callback: impl Fn(&P::Event, InputModality) -> bool + 'static,
    ) -> Self {
        self.on_down = Some(Rc::new(callback));
        self
    }

    pub fn on_move(mut self, callback: impl Fn(&P::Event, InputModality) + 'static) -> Self {
        self.on_move = Some(Rc::new(callback));
        self
    }

    pub fn on_up(mut self, callback: impl Fn(&P::Event, InputModality) + 'static) -> Self {
        self.on_up = Some(Rc::new(callback));
        self
    }

    pub fn config(mut self, config: PointerSourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the clock used for the suppression window.
    pub fn clock<C2: Clock + 'static>(self, clock: C2) -> PointerEventSourceBuilder<P, C2> {
        PointerEventSourceBuilder {
            platform: self.platform,
            clock,
            target: self.target,
            on_down: self.on_down,
            on_move: self.on_move,
            on_up: self.on_up,
            config: self.config,
        }
    }

    /// Validates the inputs and attaches the touch and mouse start listeners.
    pub fn build(self) -> Result<PointerEventSource<P, C>, PointerSourceError> {
        let target = self.target.ok_or(PointerSourceError::MissingTarget)?;
        let down = self.on_down.ok_or(PointerSourceError::MissingPointerDown)?;
        let PointerSourceConfig {
            listener: options,
            suppression_window,
        } = self.config;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner<P, C>>| {
            Inner {
                platform: self.platform,
                clock: self.clock,
                handlers: Handlers {
                    touch_move: forward(weak, |inner, event| {
                        inner.handle_move(event, InputModality::Touch)
                    }),
                    touch_end: forward(weak, |inner, event| inner.handle_touch_end(event)),
                    mouse_move: forward(weak, |inner, event| {
                        inner.handle_move(event, InputModality::Mouse)
                    }),
                    mouse_up: forward(weak, |inner, event| inner.handle_mouse_up(event)),
                },
                state: RefCell::new(SourceState {
                    target: Some(target.clone()),
                    callbacks: Callbacks {
                        down: Some(down),
                        moved: self.on_move,
                        up: self.on_up,
                    },
                    options: options.clone(),
                    suppression_window,
                    touch_deadline: None,
                    last_modality: InputModality::Undefined,
                    touch_start: None,
                    mouse_down: None,
                    touch: TouchListeners::default(),
                    mouse: MouseListeners::default(),
                    destroyed: false,
                }),
            }
        });

        let weak = Rc::downgrade(&inner);
        let touch_start = inner.attach(
            &target,
            PointerEventName::TouchStart,
            forward(&weak, |inner, event| inner.handle_touch_start(event)),
            &options,
        );
        let mouse_down = inner.attach(
            &target,
            PointerEventName::MouseDown,
            forward(&weak, |inner, event| inner.handle_mouse_down(event)),
            &options,
        );
        {
            let mut state = inner.state.borrow_mut();
            state.touch_start = Some(touch_start);
            state.mouse_down = Some(mouse_down);
        }

        Ok(PointerEventSource { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Minimal platform that keeps handlers in a list and never detaches.
    #[derive(Default)]
    struct ListPlatform {
        attached: RefCell<Vec<(PointerEventName, EventHandler<u32>)>>,
        released: Rc<Cell<usize>>,
    }

    impl ListPlatform {
        fn fire(&self, name: PointerEventName, event: u32) {
            let handlers: Vec<_> = self
                .attached
                .borrow()
                .iter()
                .filter(|(n, _)| *n == name)
                .map(|(_, h)| h.clone())
                .collect();
            for handler in handlers {
                handler(&event);
            }
        }
    }

    impl ListenerPlatform for ListPlatform {
        type Target = ();
        type Event = u32;

        fn add_listener(
            &self,
            _target: &(),
            name: PointerEventName,
            handler: EventHandler<u32>,
            _options: &ListenerOptions,
        ) -> ListenerHandle {
            self.attached.borrow_mut().push((name, handler));
            let released = self.released.clone();
            ListenerHandle::new(move || released.set(released.get() + 1))
        }

        fn document_root(&self) -> Self::Target {}
    }

    #[test]
    fn unbounded_deadline_always_suppresses() {
        assert!(TouchDeadline::<u64>::Unbounded.suppresses(&u64::MAX));
        assert!(TouchDeadline::Until(10u64).suppresses(&9));
        assert!(!TouchDeadline::Until(10u64).suppresses(&10));
    }

    #[test]
    fn build_requires_target() {
        let result = PointerEventSource::builder(Rc::new(ListPlatform::default()))
            .on_down(|_, _| true)
            .build();
        assert_eq!(result.err(), Some(PointerSourceError::MissingTarget));
    }

    #[test]
    fn build_requires_pointer_down() {
        let result = PointerEventSource::builder(Rc::new(ListPlatform::default()))
            .target(())
            .build();
        assert_eq!(result.err(), Some(PointerSourceError::MissingPointerDown));
    }

    #[test]
    fn error_messages_name_the_missing_input() {
        assert_eq!(
            PointerSourceError::MissingTarget.to_string(),
            "pointer source requires a target surface"
        );
        assert_eq!(
            PointerSourceError::MissingPointerDown.to_string(),
            "pointer source requires a pointer-down callback"
        );
    }

    #[test]
    fn dropped_source_ignores_stale_handlers() {
        let platform = Rc::new(ListPlatform::default());
        let downs = Rc::new(Cell::new(0));
        let source = {
            let downs = downs.clone();
            PointerEventSource::builder(platform.clone())
                .target(())
                .on_down(move |_, _| {
                    downs.set(downs.get() + 1);
                    true
                })
                .build()
                .expect("source builds")
        };

        platform.fire(PointerEventName::MouseDown, 1);
        assert_eq!(downs.get(), 1);

        drop(source);
        // Both start listeners plus the pending mouse-up listener.
        assert_eq!(platform.released.get(), 3);

        platform.fire(PointerEventName::MouseDown, 2);
        platform.fire(PointerEventName::TouchStart, 3);
        assert_eq!(downs.get(), 1);
    }

    #[test]
    fn mouse_interaction_tracks_until_up() {
        let platform = Rc::new(ListPlatform::default());
        let source = PointerEventSource::builder(platform.clone())
            .target(())
            .on_down(|_, _| true)
            .build()
            .expect("source builds");

        assert!(!source.is_tracking(InputModality::Mouse));
        platform.fire(PointerEventName::MouseDown, 1);
        assert!(source.is_tracking(InputModality::Mouse));
        assert_eq!(source.last_modality(), InputModality::Mouse);

        platform.fire(PointerEventName::MouseUp, 2);
        assert!(!source.is_tracking(InputModality::Mouse));
    }
}
