//! Core runtime services shared by Cranpose crates.

pub mod platform;

pub use platform::{
    Clock, EventHandler, ListenerHandle, ListenerOptions, ListenerPlatform, PointerEventName,
    SystemClock,
};
