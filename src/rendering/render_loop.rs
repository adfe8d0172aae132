//! Dedicated render thread.
//!
//! The loop owns the `GpuSession` outright: the session is acquired on
//! the render thread after spawn and never crosses a thread boundary.
//! Each iteration drains pending surface commands, takes at most one
//! captured scene from the handoff slot, draws a frame from the latest
//! view state snapshot, then sleeps out the remainder of the frame
//! interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::config::GlassConfig;
use crate::scene::SceneSlot;
use crate::state::SharedViewState;

use super::session::GpuSession;

enum SurfaceCommand {
    Resize { width: u32, height: u32 },
}

/// Handle to the running render thread.
pub struct RenderLoop {
    stop: Arc<AtomicBool>,
    commands: Sender<SurfaceCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Spawn the render thread against a host drawable. GPU acquisition
    /// happens on the spawned thread; if it fails the thread logs the
    /// error and exits, leaving the surface untouched.
    pub fn start(
        target: wgpu::SurfaceTarget<'static>,
        width: u32,
        height: u32,
        slot: Arc<SceneSlot>,
        state: Arc<SharedViewState>,
        config: GlassConfig,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::unbounded();

        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("glass-render".into())
            .spawn(move || {
                let session = match GpuSession::acquire(target, width, height) {
                    Ok(session) => session,
                    Err(e) => {
                        log::error!("[RENDER] failed to start GPU session: {}", e);
                        return;
                    }
                };
                run(session, rx, slot, state, config, thread_stop);
            })
            .unwrap_or_else(|e| panic!("failed to spawn render thread: {e}"));

        Self {
            stop,
            commands: tx,
            handle: Some(handle),
        }
    }

    /// Forward a surface resize to the render thread.
    pub fn resize(&self, width: u32, height: u32) {
        if let Err(TrySendError::Disconnected(_)) =
            self.commands.try_send(SurfaceCommand::Resize { width, height })
        {
            log::warn!("[RENDER] resize ignored: render thread has exited");
        }
    }

    /// Stop the loop and block until the render thread has released all
    /// GPU resources. The host drawable must stay valid until this
    /// returns.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[RENDER] render thread panicked");
            }
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(
    mut session: GpuSession,
    commands: Receiver<SurfaceCommand>,
    slot: Arc<SceneSlot>,
    state: Arc<SharedViewState>,
    config: GlassConfig,
    stop: Arc<AtomicBool>,
) {
    log::info!("[RENDER] render loop started");
    let frame_interval = config.frame_interval();

    while !stop.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        while let Ok(command) = commands.try_recv() {
            match command {
                SurfaceCommand::Resize { width, height } => session.resize(width, height),
            }
        }

        if let Some(scene) = slot.take() {
            session.upload_scene(&scene);
        }

        let snapshot = state.snapshot();
        if let Err(e) = session.render(&snapshot, &config) {
            log::warn!("[RENDER] frame skipped: {}", e);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
    }

    log::info!("[RENDER] render loop stopped");
}
