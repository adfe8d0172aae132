//! Periodic background capture with hysteresis.
//!
//! Every tick the scheduler resolves the element's bounding box and
//! decides whether the cached capture region is still usable: as long
//! as the element keeps the configured margin to every edge of the
//! region, the region is reused and only the pixels are refreshed.
//! When the margin collapses (or a forced refresh is pending) a new
//! padded region is computed and clamped to the root surface.
//!
//! Tick failures are logged and skipped; the previous region and the
//! previously uploaded texture stay authoritative.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::GlassConfig;
use crate::error::{GlassError, GlassResult};
use crate::geometry::{padded_capture_region, Rect};
use crate::host::SnapshotSource;
use crate::scene::{CapturedScene, SceneSlot};
use crate::task::RecurringTask;

/// Decides capture regions and publishes captured scenes.
pub struct CaptureScheduler {
    source: Arc<dyn SnapshotSource>,
    slot: Arc<SceneSlot>,
    /// Set externally (visibility return) to invalidate the cached
    /// region; cleared only once a fresh region has been computed.
    force_refresh: Arc<AtomicBool>,
    region: Option<Rect>,
    padding: i32,
    margin: i32,
}

impl CaptureScheduler {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        slot: Arc<SceneSlot>,
        force_refresh: Arc<AtomicBool>,
        config: &GlassConfig,
    ) -> Self {
        Self {
            source,
            slot,
            force_refresh,
            region: None,
            padding: config.capture_padding,
            margin: config.hysteresis_margin,
        }
    }

    /// Spawn the scheduler on a recurring worker at the configured
    /// capture interval.
    pub fn spawn(
        source: Arc<dyn SnapshotSource>,
        slot: Arc<SceneSlot>,
        force_refresh: Arc<AtomicBool>,
        config: &GlassConfig,
    ) -> RecurringTask {
        let mut scheduler = Self::new(source, slot, force_refresh, config);
        RecurringTask::spawn("glass-capture", config.capture_interval(), move || {
            scheduler.tick()
        })
    }

    /// Run one capture tick. Never propagates failures.
    pub fn tick(&mut self) {
        if let Err(e) = self.try_capture() {
            log::warn!("[CAPTURE] tick skipped: {}", e);
        }
    }

    /// The cached capture region, if any.
    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    fn try_capture(&mut self) -> GlassResult<()> {
        let Some(element) = self.source.element_bounds() else {
            // Element detached; nothing to capture.
            return Ok(());
        };

        let region = self.resolve_region(element)?;

        // Hide the element so the snapshot cannot contain its own
        // rendered output, restore it no matter how the snapshot went.
        self.source.set_element_visible(false);
        let shot = self.source.snapshot(region);
        self.source.set_element_visible(true);

        let image = shot?;
        self.slot.publish(CapturedScene {
            image,
            origin_x: region.left,
            origin_y: region.top,
        });
        Ok(())
    }

    /// Reuse the cached region when the hysteresis test passes,
    /// otherwise compute a fresh padded region.
    fn resolve_region(&mut self, element: Rect) -> GlassResult<Rect> {
        let forced = self.force_refresh.load(Ordering::Relaxed);

        if !forced {
            if let Some(existing) = self.region {
                if existing.contains_with_margin(element, self.margin) {
                    return Ok(existing);
                }
            }
        }

        let (root_w, root_h) = self.source.root_bounds();
        let region = padded_capture_region(element, self.padding, root_w, root_h)
            .ok_or_else(|| {
                GlassError::InvalidGeometry(format!(
                    "element {:?} yields empty region in {}x{} root",
                    element, root_w, root_h
                ))
            })?;

        self.region = Some(region);
        // Only a successful recompute satisfies a pending forced refresh.
        self.force_refresh.store(false, Ordering::Relaxed);
        log::debug!("[CAPTURE] new region {:?}", region);
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use parking_lot::Mutex;

    /// Scripted host: adjustable element bounds, failure injection, and
    /// a log of element visibility at snapshot time.
    struct MockSource {
        root: (i32, i32),
        element: Mutex<Option<Rect>>,
        fail_snapshot: AtomicBool,
        visible: AtomicBool,
        visible_during_snapshot: Mutex<Vec<bool>>,
        snapshots: Mutex<Vec<Rect>>,
    }

    impl MockSource {
        fn new(element: Rect) -> Self {
            Self {
                root: (1080, 1920),
                element: Mutex::new(Some(element)),
                fail_snapshot: AtomicBool::new(false),
                visible: AtomicBool::new(true),
                visible_during_snapshot: Mutex::new(Vec::new()),
                snapshots: Mutex::new(Vec::new()),
            }
        }

        fn move_element(&self, rect: Rect) {
            *self.element.lock() = Some(rect);
        }
    }

    impl SnapshotSource for MockSource {
        fn root_bounds(&self) -> (i32, i32) {
            self.root
        }

        fn element_bounds(&self) -> Option<Rect> {
            *self.element.lock()
        }

        fn set_element_visible(&self, visible: bool) {
            self.visible.store(visible, Ordering::SeqCst);
        }

        fn snapshot(&self, region: Rect) -> GlassResult<RgbaImage> {
            self.visible_during_snapshot
                .lock()
                .push(self.visible.load(Ordering::SeqCst));
            if self.fail_snapshot.load(Ordering::SeqCst) {
                return Err(GlassError::CaptureError("offscreen render failed".into()));
            }
            self.snapshots.lock().push(region);
            Ok(RgbaImage::new(region.width as u32, region.height as u32))
        }
    }

    fn scheduler(source: &Arc<MockSource>) -> (CaptureScheduler, Arc<SceneSlot>, Arc<AtomicBool>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let slot = Arc::new(SceneSlot::new());
        let force = Arc::new(AtomicBool::new(false));
        let sched = CaptureScheduler::new(
            Arc::clone(source) as Arc<dyn SnapshotSource>,
            Arc::clone(&slot),
            Arc::clone(&force),
            &GlassConfig::default(),
        );
        (sched, slot, force)
    }

    #[test]
    fn test_first_tick_pads_and_publishes() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, slot, _) = scheduler(&source);

        sched.tick();

        assert_eq!(sched.region(), Some(Rect::new(60, 160, 140, 120)));
        let scene = slot.take().unwrap();
        assert_eq!((scene.origin_x, scene.origin_y), (60, 160));
        assert_eq!(scene.image.dimensions(), (140, 120));
    }

    #[test]
    fn test_small_move_reuses_region() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, slot, _) = scheduler(&source);

        sched.tick();
        let first = sched.region().unwrap();

        // 10px right, 5px down: the padded region keeps at least 30px
        // of buffer on every side, comfortably above the 20px margin.
        source.move_element(Rect::new(110, 205, 60, 40));
        sched.tick();

        assert_eq!(sched.region(), Some(first));
        // Pixels are still refreshed on every tick.
        assert!(slot.take().is_some());
    }

    #[test]
    fn test_margin_violation_repads() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, _slot, _) = scheduler(&source);

        sched.tick();
        source.move_element(Rect::new(170, 200, 60, 40));
        sched.tick();

        assert_eq!(sched.region(), Some(Rect::new(130, 160, 140, 120)));
    }

    #[test]
    fn test_visibility_return_forces_recompute() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, _slot, force) = scheduler(&source);

        sched.tick();
        let first = sched.region().unwrap();

        // A tiny move that passes the margin test, but a forced refresh
        // is pending (element became visible again).
        source.move_element(Rect::new(102, 200, 60, 40));
        force.store(true, Ordering::Relaxed);
        sched.tick();

        let refreshed = sched.region().unwrap();
        assert_ne!(refreshed, first);
        assert_eq!(refreshed, Rect::new(62, 160, 140, 120));
        assert!(!force.load(Ordering::Relaxed));
    }

    #[test]
    fn test_element_hidden_only_during_snapshot() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, _slot, _) = scheduler(&source);

        sched.tick();

        assert_eq!(*source.visible_during_snapshot.lock(), vec![false]);
        assert!(source.visible.load(Ordering::SeqCst));
    }

    #[test]
    fn test_snapshot_failure_skips_tick_and_restores_element() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, slot, _) = scheduler(&source);

        source.fail_snapshot.store(true, Ordering::SeqCst);
        sched.tick();

        assert!(slot.is_empty());
        // Element restored to visible even on the failure path.
        assert!(source.visible.load(Ordering::SeqCst));
        // The computed region stays cached for the next tick.
        assert_eq!(sched.region(), Some(Rect::new(60, 160, 140, 120)));

        source.fail_snapshot.store(false, Ordering::SeqCst);
        sched.tick();
        assert!(slot.take().is_some());
    }

    #[test]
    fn test_detached_element_is_noop() {
        let source = Arc::new(MockSource::new(Rect::new(100, 200, 60, 40)));
        let (mut sched, slot, _) = scheduler(&source);

        *source.element.lock() = None;
        sched.tick();

        assert!(sched.region().is_none());
        assert!(slot.is_empty());
        assert!(source.visible_during_snapshot.lock().is_empty());
    }

    #[test]
    fn test_degenerate_geometry_keeps_forced_refresh_pending() {
        let source = Arc::new(MockSource::new(Rect::new(2000, 200, 60, 40)));
        let (mut sched, slot, force) = scheduler(&source);

        force.store(true, Ordering::Relaxed);
        sched.tick();

        // Off-root element: no region, no scene, and the forced refresh
        // is still pending for when geometry becomes valid again.
        assert!(sched.region().is_none());
        assert!(slot.is_empty());
        assert!(force.load(Ordering::Relaxed));
    }
}
