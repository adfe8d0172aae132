//! Captured scene handoff between the capture tick and the render thread.
//!
//! `SceneSlot` is a single-slot, last-write-wins mailbox: the capture
//! scheduler publishes the newest background snapshot, the render thread
//! drains it before drawing. Scenes overwritten before a drain are
//! dropped on purpose; this bounds memory and avoids a frame backlog
//! when capture outpaces rendering.

use image::RgbaImage;
use parking_lot::Mutex;

/// One captured background image plus the root-surface coordinate of
/// the region it represents.
#[derive(Debug)]
pub struct CapturedScene {
    /// RGBA pixels of the capture region, row 0 at the top.
    pub image: RgbaImage,
    /// Left edge of the captured region in root-surface pixels.
    pub origin_x: i32,
    /// Top edge of the captured region in root-surface pixels.
    pub origin_y: i32,
}

/// Single-slot producer/consumer handoff for the latest captured scene.
#[derive(Default)]
pub struct SceneSlot {
    pending: Mutex<Option<CapturedScene>>,
}

impl SceneSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a scene, replacing any unconsumed prior one.
    pub fn publish(&self, scene: CapturedScene) {
        let mut slot = self.pending.lock();
        if slot.is_some() {
            log::trace!("[CAPTURE] overwriting unconsumed scene");
        }
        *slot = Some(scene);
    }

    /// Take the pending scene, leaving the slot empty.
    pub fn take(&self) -> Option<CapturedScene> {
        self.pending.lock().take()
    }

    /// True when no scene is waiting for upload.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_none()
    }
}
