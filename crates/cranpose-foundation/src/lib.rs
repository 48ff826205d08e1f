//! Input foundation for Cranpose gesture recognisers.
//!
//! Recognisers such as drag, swipe and pan consume a single pointer stream
//! from [`PointerEventSource`] and never need to know whether a touchscreen
//! or a mouse produced it.

pub mod gesture_constants;
pub mod input;

pub use cranpose_core::{ListenerOptions, ListenerPlatform, PointerEventName};
pub use gesture_constants::DEFAULT_MOUSE_SUPPRESSION;
pub use input::{
    InputModality, PointerCallback, PointerDownCallback, PointerEventSource,
    PointerEventSourceBuilder, PointerSourceConfig, PointerSourceError,
};
