//! Per-frame element position tracking.
//!
//! Host position queries return integer-rounded screen coordinates
//! while the element's translation transform carries sub-pixel
//! precision. The tracker reconstructs the true position as
//! `integer position + fract(translation)` and writes it into the
//! shared view state for the render thread to pick up.

use std::sync::Arc;

use crate::config::GlassConfig;
use crate::host::PositionSource;
use crate::state::SharedViewState;
use crate::task::RecurringTask;

/// Samples the element's absolute screen position once per frame.
pub struct PositionTracker {
    source: Arc<dyn PositionSource>,
    state: Arc<SharedViewState>,
}

impl PositionTracker {
    pub fn new(source: Arc<dyn PositionSource>, state: Arc<SharedViewState>) -> Self {
        Self { source, state }
    }

    /// Spawn the tracker on a recurring worker at the configured
    /// tracker interval.
    pub fn spawn(
        source: Arc<dyn PositionSource>,
        state: Arc<SharedViewState>,
        config: &GlassConfig,
    ) -> RecurringTask {
        let tracker = Self::new(source, state);
        RecurringTask::spawn("glass-tracker", config.tracker_interval(), move || {
            tracker.tick()
        })
    }

    /// Sample the position once and publish it.
    pub fn tick(&self) {
        let (x, y) = self.source.screen_position();
        let (tx, ty) = self.source.translation_offset();
        self.state
            .set_position(x as f32 + fract(tx), y as f32 + fract(ty));
    }
}

/// Fractional part with the sign of the input, matching the truncation
/// the host applies when rounding positions to integers.
fn fract(v: f32) -> f32 {
    v - v.trunc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct MockPosition {
        position: Mutex<(i32, i32)>,
        translation: Mutex<(f32, f32)>,
    }

    impl PositionSource for MockPosition {
        fn screen_position(&self) -> (i32, i32) {
            *self.position.lock()
        }

        fn translation_offset(&self) -> (f32, f32) {
            *self.translation.lock()
        }
    }

    fn tracker(pos: (i32, i32), trans: (f32, f32)) -> (PositionTracker, Arc<SharedViewState>) {
        let source = Arc::new(MockPosition {
            position: Mutex::new(pos),
            translation: Mutex::new(trans),
        });
        let state = Arc::new(SharedViewState::new());
        (
            PositionTracker::new(source, Arc::clone(&state)),
            state,
        )
    }

    #[test]
    fn test_integer_position_passthrough() {
        let (tracker, state) = tracker((100, 200), (0.0, 0.0));
        tracker.tick();

        let snap = state.snapshot();
        assert_eq!(snap.view_x, 100.0);
        assert_eq!(snap.view_y, 200.0);
    }

    #[test]
    fn test_subpixel_reconstruction() {
        let (tracker, state) = tracker((100, 200), (3.75, 12.25));
        tracker.tick();

        let snap = state.snapshot();
        assert!((snap.view_x - 100.75).abs() < 1e-6);
        assert!((snap.view_y - 200.25).abs() < 1e-6);
    }

    #[test]
    fn test_negative_translation_fraction() {
        // trunc-based fraction: -2.25 contributes -0.25, as the host's
        // integer rounding truncates toward zero.
        let (tracker, state) = tracker((100, 200), (-2.25, -0.5));
        tracker.tick();

        let snap = state.snapshot();
        assert!((snap.view_x - 99.75).abs() < 1e-6);
        assert!((snap.view_y - 199.5).abs() < 1e-6);
    }

    #[test]
    fn test_fract() {
        assert_eq!(fract(3.75), 0.75);
        assert_eq!(fract(-2.25), -0.25);
        assert_eq!(fract(5.0), 0.0);
    }
}
