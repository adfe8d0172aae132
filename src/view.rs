//! Host-facing entry point.
//!
//! `LiquidGlassView` ties the pipeline together: it owns the shared
//! view state, the scene handoff slot, and (while a surface exists)
//! the capture, tracker, and render workers. The host drives it with
//! surface lifecycle callbacks and parameter setters; everything else
//! runs on the background workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::capture::CaptureScheduler;
use crate::config::GlassConfig;
use crate::host::{PositionSource, SnapshotSource};
use crate::rendering::RenderLoop;
use crate::scene::SceneSlot;
use crate::state::SharedViewState;
use crate::task::RecurringTask;
use crate::tracking::PositionTracker;

/// Workers that exist only while a surface is attached.
struct ActivePipeline {
    render: RenderLoop,
    capture: RecurringTask,
    tracker: RecurringTask,
}

enum PipelineState {
    Idle,
    Running(ActivePipeline),
}

/// One glass element. Parameter setters are valid in any state; the
/// worker pipeline starts on `surface_ready` and stops on
/// `surface_destroyed`, and may be restarted with a new surface.
pub struct LiquidGlassView {
    snapshot_source: Arc<dyn SnapshotSource>,
    position_source: Arc<dyn PositionSource>,
    state: Arc<SharedViewState>,
    slot: Arc<SceneSlot>,
    force_recapture: Arc<AtomicBool>,
    config: GlassConfig,
    pipeline: Mutex<PipelineState>,
}

impl LiquidGlassView {
    pub fn new(
        snapshot_source: Arc<dyn SnapshotSource>,
        position_source: Arc<dyn PositionSource>,
        config: GlassConfig,
    ) -> Self {
        Self {
            snapshot_source,
            position_source,
            state: Arc::new(SharedViewState::new()),
            slot: Arc::new(SceneSlot::new()),
            force_recapture: Arc::new(AtomicBool::new(false)),
            config,
            pipeline: Mutex::new(PipelineState::Idle),
        }
    }

    /// Start the pipeline against a freshly created host drawable.
    /// Calling this while a pipeline is already running tears the old
    /// one down first.
    pub fn surface_ready(
        &self,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) {
        let mut pipeline = self.pipeline.lock();
        if let PipelineState::Running(old) = std::mem::replace(&mut *pipeline, PipelineState::Idle)
        {
            log::warn!("[VIEW] surface replaced while pipeline running; restarting");
            stop_pipeline(old);
        }

        self.state.set_resolution(width as f32, height as f32);

        let render = RenderLoop::start(
            target.into(),
            width,
            height,
            Arc::clone(&self.slot),
            Arc::clone(&self.state),
            self.config.clone(),
        );
        let capture = CaptureScheduler::spawn(
            Arc::clone(&self.snapshot_source),
            Arc::clone(&self.slot),
            Arc::clone(&self.force_recapture),
            &self.config,
        );
        let tracker = PositionTracker::spawn(
            Arc::clone(&self.position_source),
            Arc::clone(&self.state),
            &self.config,
        );

        *pipeline = PipelineState::Running(ActivePipeline {
            render,
            capture,
            tracker,
        });
        log::info!("[VIEW] pipeline started ({}x{})", width, height);
    }

    /// The host drawable changed size.
    pub fn surface_resized(&self, width: u32, height: u32) {
        self.state.set_resolution(width as f32, height as f32);
        if let PipelineState::Running(active) = &*self.pipeline.lock() {
            active.render.resize(width, height);
        }
    }

    /// Stop all workers and release GPU resources. Must complete before
    /// the host invalidates the drawable; a later `surface_ready`
    /// restarts the pipeline.
    pub fn surface_destroyed(&self) {
        let mut pipeline = self.pipeline.lock();
        if let PipelineState::Running(active) =
            std::mem::replace(&mut *pipeline, PipelineState::Idle)
        {
            stop_pipeline(active);
            log::info!("[VIEW] pipeline stopped");
        }
    }

    /// The element left or re-entered the visible viewport. Returning
    /// to visibility invalidates the cached capture region, since the
    /// background may have changed arbitrarily while hidden.
    pub fn visibility_changed(&self, visible: bool) {
        if visible {
            self.force_recapture.store(true, Ordering::Relaxed);
        }
    }

    pub fn set_refraction(&self, value: f32) {
        self.state.set_refraction(value);
    }

    pub fn set_magnification(&self, value: f32) {
        self.state.set_magnification(value);
    }

    pub fn set_offset_x(&self, value: f32) {
        self.state.set_offset_x(value);
    }

    pub fn set_offset_y(&self, value: f32) {
        self.state.set_offset_y(value);
    }

    /// Whether the worker pipeline is currently running.
    pub fn is_running(&self) -> bool {
        matches!(&*self.pipeline.lock(), PipelineState::Running(_))
    }
}

impl Drop for LiquidGlassView {
    fn drop(&mut self) {
        self.surface_destroyed();
    }
}

/// Teardown order: capture and tracker first so no new scenes or
/// positions are published, then the render loop (joins the render
/// thread, dropping the GPU session).
fn stop_pipeline(mut active: ActivePipeline) {
    active.capture.cancel();
    active.tracker.cancel();
    active.render.stop();
}
