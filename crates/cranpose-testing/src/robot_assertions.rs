//! Assertion utilities for pointer source tests.

use crate::platform::{FakePlatform, FakeTarget};
use crate::recorder::{CallbackRecorder, PointerCall};
use cranpose_core::PointerEventName;
use cranpose_foundation::InputModality;

const TOUCH_SECONDARY: [PointerEventName; 3] = [
    PointerEventName::TouchMove,
    PointerEventName::TouchEnd,
    PointerEventName::TouchCancel,
];

const MOUSE_SECONDARY: [PointerEventName; 2] =
    [PointerEventName::MouseMove, PointerEventName::MouseUp];

/// Assert that the recorded calls are exactly `expected`, in order.
pub fn assert_calls(
    recorder: &CallbackRecorder,
    expected: &[(PointerCall, InputModality)],
    msg: &str,
) {
    let actual: Vec<(PointerCall, InputModality)> = recorder
        .calls()
        .into_iter()
        .map(|c| (c.call, c.modality))
        .collect();
    assert_eq!(actual, expected, "{}: unexpected callback sequence", msg);
}

/// Assert that no touch move/end/cancel listener is attached to `surface`.
pub fn assert_touch_idle(platform: &FakePlatform, surface: &FakeTarget, msg: &str) {
    for name in TOUCH_SECONDARY {
        assert_eq!(
            platform.listener_count(surface, name),
            0,
            "{}: {} listener still attached",
            msg,
            name
        );
    }
}

/// Assert that no mouse move/up listener is attached to the document.
pub fn assert_mouse_idle(platform: &FakePlatform, msg: &str) {
    for name in MOUSE_SECONDARY {
        assert_eq!(
            platform.listener_count(&FakeTarget::Document, name),
            0,
            "{}: {} listener still attached",
            msg,
            name
        );
    }
}

/// Assert that exactly one listener is attached for each of `names`.
pub fn assert_attached_once(
    platform: &FakePlatform,
    target: &FakeTarget,
    names: &[PointerEventName],
    msg: &str,
) {
    for &name in names {
        assert_eq!(
            platform.listener_count(target, name),
            1,
            "{}: expected one {} listener on {:?}",
            msg,
            name,
            target
        );
    }
}
