//! Host integration traits.
//!
//! The pipeline never talks to a UI toolkit directly; the embedding
//! host supplies these capabilities. Implementations must be cheap to
//! call from worker threads: the snapshot source is hit every capture
//! tick (30 ms), the position source every tracked frame.

use crate::error::GlassResult;
use crate::geometry::Rect;
use image::RgbaImage;

/// Renders the root surface's visual tree into pixel buffers and
/// controls the glass element's visibility during capture.
pub trait SnapshotSource: Send + Sync {
    /// Extent of the root surface in pixels (width, height).
    fn root_bounds(&self) -> (i32, i32);

    /// The glass element's current bounding box in root-surface
    /// coordinates, or `None` while the element is detached.
    fn element_bounds(&self) -> Option<Rect>;

    /// Show or hide the glass element. The scheduler hides the element
    /// immediately before each snapshot so the capture cannot contain
    /// the element's own output, and restores it immediately after.
    fn set_element_visible(&self, visible: bool);

    /// Synchronously render the current visual tree, clipped and
    /// translated to `region`, into an RGBA buffer of `region`'s size.
    fn snapshot(&self, region: Rect) -> GlassResult<RgbaImage>;
}

/// Reports the glass element's absolute on-screen position.
///
/// Host position queries commonly return integer-rounded coordinates
/// while the element's translation transform carries sub-pixel
/// precision; the tracker recombines the two.
pub trait PositionSource: Send + Sync {
    /// Integer-rounded absolute screen position (x, y).
    fn screen_position(&self) -> (i32, i32);

    /// Current translation transform of the element (x, y), sub-pixel
    /// precise.
    fn translation_offset(&self) -> (f32, f32);
}
