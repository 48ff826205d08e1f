//! Shared gesture constants for consistent touch/pointer handling.

use std::time::Duration;

/// How long mouse-down events are ignored after a touch start.
///
/// Hybrid touch/mouse browsers emit a compatibility `mousedown` shortly
/// after `touchstart` for the same contact. Anything arriving inside this
/// window is treated as that synthetic duplicate. The value is a heuristic;
/// sources expose it through `PointerSourceConfig` so hosts with different
/// emulation latency can tune it.
pub const DEFAULT_MOUSE_SUPPRESSION: Duration = Duration::from_millis(2_000);
