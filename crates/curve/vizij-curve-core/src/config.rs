//! Core configuration for vizij-curve-core.

use serde::{Deserialize, Serialize};

/// Handle distance given to new keys, as a fraction of the neighbouring interval.
pub const DEFAULT_HANDLE_PERCENT: f64 = 0.4;

/// Bezier subdivisions per frame of segment span.
pub const DEFAULT_SAMPLES_PER_FRAME: u32 = 10;

/// Per-curve editing and sampling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Handle percent used for new keys and by `Curve::smooth`.
    pub default_handle_percent: f64,
    /// Uniform `t` steps per frame when sampling a segment.
    pub samples_per_frame: u32,
    /// Whether keys created by `add_key` start with their handles slope-locked.
    pub lock_new_keys: bool,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            default_handle_percent: DEFAULT_HANDLE_PERCENT,
            samples_per_frame: DEFAULT_SAMPLES_PER_FRAME,
            lock_new_keys: true,
        }
    }
}

impl CurveConfig {
    /// Clamp out-of-range settings to usable values.
    pub fn sanitized(mut self) -> Self {
        self.default_handle_percent = if self.default_handle_percent.is_finite() {
            self.default_handle_percent.clamp(0.0, 1.0)
        } else {
            DEFAULT_HANDLE_PERCENT
        };
        self.samples_per_frame = self.samples_per_frame.max(1);
        self
    }
}
