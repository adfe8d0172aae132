//! Capture-region rectangle math.
//!
//! All coordinates are root-surface pixels with a top-left origin.
//! The capture region is always padded around the element and clamped
//! to the root surface; the hysteresis test decides when a cached
//! region can be reused after the element moves.

/// Axis-aligned rectangle in root-surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// True when the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Hysteresis test: does `inner` still fit inside this rectangle
    /// with at least `margin` pixels of buffer on all four sides?
    pub fn contains_with_margin(&self, inner: Rect, margin: i32) -> bool {
        inner.left >= self.left + margin
            && inner.top >= self.top + margin
            && inner.right() <= self.right() - margin
            && inner.bottom() <= self.bottom() - margin
    }
}

/// Compute a fresh capture region for an element: pad the element's box
/// by `padding` on each side, clamp the origin to non-negative
/// coordinates and the extent to the root surface.
///
/// Returns `None` when the clamped region has no positive area (element
/// fully outside the root surface, or a degenerate root).
pub fn padded_capture_region(
    element: Rect,
    padding: i32,
    root_width: i32,
    root_height: i32,
) -> Option<Rect> {
    let left = (element.left - padding).max(0);
    let top = (element.top - padding).max(0);
    let width = (element.width + padding * 2).min(root_width - left);
    let height = (element.height + padding * 2).min(root_height - top);

    let region = Rect::new(left, top, width, height);
    region.is_valid().then_some(region)
}
