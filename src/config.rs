//! Pipeline tuning configuration.
//!
//! Collects the timing and geometry constants of the capture/render
//! pipeline in one serializable struct. The defaults reproduce the
//! shipped behavior: 30 ms capture cadence, 16 ms frame pacing, 40 px
//! capture padding with a 20 px hysteresis margin.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning parameters for the liquid-glass pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassConfig {
    /// Interval between background capture ticks, in milliseconds.
    pub capture_interval_ms: u64,
    /// Render loop frame pacing, in milliseconds. This is a pacing
    /// choice, not a vsync guarantee.
    pub frame_interval_ms: u64,
    /// Interval between element position samples, in milliseconds.
    pub tracker_interval_ms: u64,
    /// Padding added on each side of the element when a capture region
    /// is (re)computed, in pixels.
    pub capture_padding: i32,
    /// Minimum buffer the element must keep to every edge of the cached
    /// capture region before a recompute is forced, in pixels.
    pub hysteresis_margin: i32,
    /// Radius of the 5x5 Gaussian kernel in texels, scaled per sample.
    pub blur_intensity: f32,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            capture_interval_ms: 30,
            frame_interval_ms: 16,
            tracker_interval_ms: 16,
            capture_padding: 40,
            hysteresis_margin: 20,
            blur_intensity: 0.1,
        }
    }
}

impl GlassConfig {
    /// Capture tick interval as a `Duration`.
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }

    /// Render frame pacing as a `Duration`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Position tracker interval as a `Duration`.
    pub fn tracker_interval(&self) -> Duration {
        Duration::from_millis(self.tracker_interval_ms)
    }
}
