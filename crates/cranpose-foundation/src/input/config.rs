//! Configuration for pointer event sources.

use crate::gesture_constants::DEFAULT_MOUSE_SUPPRESSION;
use cranpose_core::ListenerOptions;
use std::time::Duration;

/// Settings applied when a [`PointerEventSource`](super::PointerEventSource)
/// attaches its listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerSourceConfig {
    /// Forwarded to every listener registration.
    pub listener: ListenerOptions,
    /// Mouse-down events closer than this to a touch start are dropped.
    pub suppression_window: Duration,
}

impl Default for PointerSourceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerOptions::default(),
            suppression_window: DEFAULT_MOUSE_SUPPRESSION,
        }
    }
}

impl PointerSourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register listeners for the capture phase.
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.listener.capture = capture;
        self
    }

    /// Declare that handlers never cancel the native default action.
    pub fn with_passive(mut self, passive: bool) -> Self {
        self.listener.passive = passive;
        self
    }

    /// Only accept events that originate from elements matching `selector`.
    pub fn with_restrict_to(mut self, selector: impl Into<String>) -> Self {
        self.listener.restrict_to = Some(selector.into());
        self
    }

    /// Set the touch-to-mouse suppression window.
    pub fn with_suppression_window(mut self, window: Duration) -> Self {
        self.suppression_window = window;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_two_seconds() {
        let config = PointerSourceConfig::default();
        assert_eq!(config.suppression_window, Duration::from_secs(2));
        assert!(!config.listener.capture);
        assert!(!config.listener.passive);
        assert_eq!(config.listener.restrict_to, None);
    }

    #[test]
    fn setters_fill_listener_options() {
        let config = PointerSourceConfig::new()
            .with_capture(true)
            .with_passive(true)
            .with_restrict_to(".handle")
            .with_suppression_window(Duration::from_millis(500));

        assert!(config.listener.capture);
        assert!(config.listener.passive);
        assert_eq!(config.listener.restrict_to.as_deref(), Some(".handle"));
        assert_eq!(config.suppression_window, Duration::from_millis(500));
    }
}
