//! Shared view/transform state between the UI-owning side and the
//! render thread.
//!
//! `ViewState` is an immutable snapshot record: writers replace whole
//! fields under a short `parking_lot::RwLock` write lock, the render
//! thread copies the entire record once per frame. Latest write wins;
//! a one-frame lag in applying updates is acceptable.

use parking_lot::RwLock;

/// Snapshot of everything the shader needs from the UI side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Element's absolute on-screen X, sub-pixel precise.
    pub view_x: f32,
    /// Element's absolute on-screen Y, sub-pixel precise.
    pub view_y: f32,
    /// Element width in pixels.
    pub width: f32,
    /// Element height in pixels.
    pub height: f32,
    /// Refraction strength at the lens edge.
    pub refraction: f32,
    /// Magnification factor toward the capture center (1.0 = none).
    pub magnification: f32,
    /// Absolute pixel pan applied after magnification, X.
    pub offset_x: f32,
    /// Absolute pixel pan applied after magnification, Y.
    pub offset_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_x: 0.0,
            view_y: 0.0,
            width: 0.0,
            height: 0.0,
            refraction: 0.5,
            magnification: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Thread-safe holder for the latest `ViewState`.
#[derive(Default)]
pub struct SharedViewState {
    inner: RwLock<ViewState>,
}

impl SharedViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current snapshot.
    pub fn snapshot(&self) -> ViewState {
        *self.inner.read()
    }

    /// Update the element's on-screen position.
    pub fn set_position(&self, x: f32, y: f32) {
        let mut state = self.inner.write();
        state.view_x = x;
        state.view_y = y;
    }

    /// Update the element's dimensions.
    pub fn set_resolution(&self, width: f32, height: f32) {
        let mut state = self.inner.write();
        state.width = width;
        state.height = height;
    }

    pub fn set_refraction(&self, value: f32) {
        self.inner.write().refraction = value;
    }

    pub fn set_magnification(&self, value: f32) {
        self.inner.write().magnification = value;
    }

    pub fn set_offset_x(&self, value: f32) {
        self.inner.write().offset_x = value;
    }

    pub fn set_offset_y(&self, value: f32) {
        self.inner.write().offset_y = value;
    }
}
