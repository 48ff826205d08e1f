//! Robot-style driver for pointer source tests
//!
//! `PointerRobot` owns a [`FakePlatform`], a [`ManualClock`] and a surface,
//! and fires numbered touch and mouse events at them the way a browser would:
//! start events go to the surface, mouse move/up go to the document.
//!
//! # Example
//!
//! ```
//! use cranpose_testing::{CallbackRecorder, PointerCall, PointerRobot};
//!
//! let mut robot = PointerRobot::new();
//! let recorder = CallbackRecorder::new();
//! let _source = robot
//!     .source_builder()
//!     .on_down(recorder.down_callback())
//!     .build()
//!     .expect("source builds");
//!
//! robot.touch_start();
//! robot.advance_millis(500);
//! robot.mouse_down();
//! assert_eq!(recorder.count(PointerCall::Down), 1);
//! ```

use crate::clock::ManualClock;
use crate::platform::{FakeEvent, FakePlatform, FakeTarget};
use cranpose_core::PointerEventName;
use cranpose_foundation::{PointerEventSource, PointerEventSourceBuilder};

/// Name of the surface a robot creates by default.
pub const DEFAULT_SURFACE: &str = "surface";

pub struct PointerRobot {
    platform: FakePlatform,
    clock: ManualClock,
    surface: FakeTarget,
    next_seq: u32,
}

impl Default for PointerRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerRobot {
    pub fn new() -> Self {
        Self::with_surface(DEFAULT_SURFACE)
    }

    pub fn with_surface(name: impl Into<String>) -> Self {
        Self {
            platform: FakePlatform::new(),
            clock: ManualClock::new(),
            surface: FakeTarget::Element(name.into()),
            next_seq: 1,
        }
    }

    pub fn platform(&self) -> &FakePlatform {
        &self.platform
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn surface(&self) -> &FakeTarget {
        &self.surface
    }

    /// A source builder wired to this robot's platform, clock and surface.
    pub fn source_builder(&self) -> PointerEventSourceBuilder<FakePlatform, ManualClock> {
        PointerEventSource::builder(self.platform.clone())
            .clock(self.clock.clone())
            .target(self.surface.clone())
    }

    /// Advance time by the given number of milliseconds.
    pub fn advance_millis(&mut self, millis: u64) {
        self.clock.advance_millis(millis);
    }

    /// Each firing method returns the sequence number of the event it sent.
    pub fn touch_start(&mut self) -> u32 {
        let target = self.surface.clone();
        self.fire(&target, PointerEventName::TouchStart, None)
    }

    pub fn touch_move(&mut self) -> u32 {
        let target = self.surface.clone();
        self.fire(&target, PointerEventName::TouchMove, None)
    }

    pub fn touch_end(&mut self) -> u32 {
        let target = self.surface.clone();
        self.fire(&target, PointerEventName::TouchEnd, None)
    }

    pub fn touch_cancel(&mut self) -> u32 {
        let target = self.surface.clone();
        self.fire(&target, PointerEventName::TouchCancel, None)
    }

    pub fn mouse_down(&mut self) -> u32 {
        let target = self.surface.clone();
        self.fire(&target, PointerEventName::MouseDown, None)
    }

    /// Mouse move on the document, as when a drag leaves the surface.
    pub fn mouse_move(&mut self) -> u32 {
        self.fire(&FakeTarget::Document, PointerEventName::MouseMove, None)
    }

    pub fn mouse_up(&mut self) -> u32 {
        self.fire(&FakeTarget::Document, PointerEventName::MouseUp, None)
    }

    /// Fire `name` at `target` as if it originated from the nested element
    /// `origin`.
    pub fn fire_from(
        &mut self,
        target: &FakeTarget,
        name: PointerEventName,
        origin: &str,
    ) -> u32 {
        self.fire(target, name, Some(origin))
    }

    pub fn fire(
        &mut self,
        target: &FakeTarget,
        name: PointerEventName,
        origin: Option<&str>,
    ) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let mut event = FakeEvent::new(seq);
        if let Some(origin) = origin {
            event = event.from_element(origin);
        }
        self.platform.dispatch(target, name, &event);
        seq
    }
}
