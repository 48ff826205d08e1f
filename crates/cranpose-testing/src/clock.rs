//! Hand-driven clock for time-dependent input tests.

use cranpose_core::Clock;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `millis` milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.now.set(self.now.get() + Duration::from_millis(millis));
    }

    /// Jump to an absolute time since the clock's origin.
    pub fn set_millis(&self, millis: u64) {
        self.now.set(Duration::from_millis(millis));
    }

    pub fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

impl Clock for ManualClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.now.get()
    }

    fn deadline(&self, after: Duration) -> Option<Duration> {
        self.now.get().checked_add(after)
    }
}
