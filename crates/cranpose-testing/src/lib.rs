//! Testing utilities and harness for Cranpose pointer input

pub mod clock;
pub mod platform;
pub mod recorder;
pub mod robot;
pub mod robot_assertions;

pub use clock::ManualClock;
pub use platform::{FakeEvent, FakePlatform, FakeTarget};
pub use recorder::{CallbackRecorder, PointerCall, RecordedCall};
pub use robot::{PointerRobot, DEFAULT_SURFACE};
