//! CPU model of the glass lens.
//!
//! The WGSL fragment shader in `shader.rs` and this module implement
//! the same math: a horizontal capsule SDF for the lens shape, an
//! edge-concentrated refraction offset, per-channel chromatic
//! dispersion, and a magnification pull toward the capture center.
//! Keeping the transform chain on the CPU makes the sampling contract
//! testable without a GPU.

use crate::state::ViewState;

/// Lens radius in aspect-corrected local space.
pub const LENS_RADIUS: f32 = 0.5;
/// Refraction falloff exponent; concentrates distortion at the edge.
pub const REFRACTION_FALLOFF: f32 = 6.0;
/// Fraction of the refraction vector applied as chromatic dispersion.
pub const DISPERSION_FACTOR: f32 = 0.05;
/// Below this distance from the capsule spine the refraction direction
/// is numerically unstable and treated as zero.
pub const SPINE_EPSILON: f32 = 1e-4;

/// XY coordinate pair for lens-space calculations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XY {
    pub x: f32,
    pub y: f32,
}

impl XY {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for XY {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        XY::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for XY {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        XY::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Mul<f32> for XY {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        XY::new(self.x * scalar, self.y * scalar)
    }
}

/// Capture rectangle as seen by the shader (root-surface pixels).
#[derive(Debug, Clone, Copy)]
pub struct CaptureRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CaptureRect {
    pub fn center(&self) -> XY {
        XY::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Per-channel absolute screen sample positions for one fragment.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSamples {
    pub r: XY,
    pub g: XY,
    pub b: XY,
}

/// Map a fragment's normalized position within the element into
/// aspect-corrected local space, centered on the element.
pub fn local_point(uv: XY, resolution: XY) -> XY {
    let aspect_x = resolution.x / resolution.y;
    XY::new((uv.x - 0.5) * aspect_x, uv.y - 0.5)
}

/// Half-length of the capsule's straight spine for a given aspect.
pub fn spine_half_length(resolution: XY) -> f32 {
    ((resolution.x / resolution.y - 1.0) * 0.5).max(0.0)
}

/// Nearest point on the capsule spine to `p`.
pub fn nearest_on_spine(p: XY, half_length: f32) -> XY {
    XY::new(p.x.clamp(-half_length, half_length), 0.0)
}

/// Signed distance from `p` to the capsule spine (the capsule surface
/// sits at distance `LENS_RADIUS`).
pub fn capsule_distance(p: XY, half_length: f32) -> f32 {
    (p - nearest_on_spine(p, half_length)).length()
}

/// Anti-aliased edge coverage: 1 inside the lens, 0 outside, with a
/// smooth band of width `2 * edge` at the boundary. The shader derives
/// `edge` from the screen-space derivative of the distance.
pub fn edge_coverage(distance: f32, edge: f32) -> f32 {
    1.0 - smoothstep(LENS_RADIUS - edge, LENS_RADIUS + edge, distance)
}

/// Refraction offset in local space: a unit vector from `p` toward the
/// spine, scaled by `(d / R)^6 * refraction`. Zero at the spine.
pub fn refraction_offset(p: XY, half_length: f32, refraction: f32) -> XY {
    let nearest = nearest_on_spine(p, half_length);
    let d = (p - nearest).length();
    if d < SPINE_EPSILON {
        return XY::new(0.0, 0.0);
    }
    let magnitude = (d / LENS_RADIUS).powf(REFRACTION_FALLOFF) * refraction;
    (nearest - p) * (magnitude / d)
}

/// Compute the per-channel absolute screen positions sampled for a
/// fragment at `uv`, before blur.
pub fn sample_positions(uv: XY, state: &ViewState, capture: CaptureRect) -> ChannelSamples {
    let resolution = XY::new(state.width, state.height);
    let p = local_point(uv, resolution);
    let h = spine_half_length(resolution);

    let refract_local = refraction_offset(p, h, state.refraction);
    let dispersion_local = refract_local * DISPERSION_FACTOR;

    // Local offsets are normalized to the element height; convert to
    // absolute screen pixels.
    let frag_screen = XY::new(
        state.view_x + uv.x * resolution.x,
        state.view_y + uv.y * resolution.y,
    );
    let offset_px = refract_local * resolution.y;
    let dispersion_px = dispersion_local * resolution.y;

    let center = capture.center();
    let pan = XY::new(state.offset_x, state.offset_y);
    let magnify = |pos: XY| -> XY {
        center + (pos - center) * (1.0 / state.magnification) + pan
    };

    ChannelSamples {
        r: magnify(frag_screen + offset_px - dispersion_px),
        g: magnify(frag_screen + offset_px),
        b: magnify(frag_screen + offset_px + dispersion_px),
    }
}

/// Convert an absolute screen position into a normalized texture
/// coordinate within the captured region, flipping the vertical axis
/// to match the capture's top-down row order.
pub fn capture_uv(pos: XY, capture: CaptureRect) -> XY {
    XY::new(
        (pos.x - capture.x) / capture.width,
        1.0 - (pos.y - capture.y) / capture.height,
    )
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ViewState {
        ViewState {
            view_x: 100.0,
            view_y: 200.0,
            width: 60.0,
            height: 40.0,
            refraction: 0.5,
            magnification: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    fn capture() -> CaptureRect {
        CaptureRect {
            x: 40.0,
            y: 140.0,
            width: 200.0,
            height: 160.0,
        }
    }

    #[test]
    fn test_capsule_reduces_to_circle_for_square_aspect() {
        let resolution = XY::new(40.0, 40.0);
        assert_eq!(spine_half_length(resolution), 0.0);

        let p = XY::new(0.3, 0.4);
        assert!((capsule_distance(p, 0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_capsule_distance_on_wide_element() {
        // 2:1 aspect: spine half-length 0.5.
        let h = spine_half_length(XY::new(80.0, 40.0));
        assert!((h - 0.5).abs() < 1e-6);

        // Points above the spine measure straight vertical distance.
        assert!((capsule_distance(XY::new(0.25, 0.3), h) - 0.3).abs() < 1e-6);
        // Beyond the spine end the distance is radial from the cap.
        let d = capsule_distance(XY::new(0.8, 0.4), h);
        assert!((d - (0.3f32 * 0.3 + 0.4 * 0.4).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_edge_coverage_discards_outside() {
        // Fragments beyond the lens surface get zero coverage.
        assert_eq!(edge_coverage(LENS_RADIUS + 0.05, 0.01), 0.0);
        // Fragments well inside are fully covered.
        assert_eq!(edge_coverage(0.1, 0.01), 1.0);
        // The boundary band is partial.
        let c = edge_coverage(LENS_RADIUS, 0.01);
        assert!(c > 0.0 && c < 1.0);
    }

    #[test]
    fn test_refraction_zero_at_spine() {
        let offset = refraction_offset(XY::new(0.0, 0.0), 0.25, 1.0);
        assert_eq!(offset, XY::new(0.0, 0.0));
    }

    #[test]
    fn test_refraction_points_toward_spine_and_falls_off() {
        let h = 0.25;
        let near = refraction_offset(XY::new(0.0, 0.1), h, 1.0);
        let far = refraction_offset(XY::new(0.0, 0.45), h, 1.0);

        // Offsets point back toward the spine (negative y here).
        assert!(near.y < 0.0 && far.y < 0.0);
        assert_eq!(near.x, 0.0);
        // The sixth-power falloff makes the edge offset dominate.
        assert!(far.length() > near.length() * 100.0);
    }

    #[test]
    fn test_passthrough_identity() {
        // refraction 0, magnification 1, offsets 0: the green channel
        // samples exactly the fragment's own screen position.
        let mut s = state();
        s.refraction = 0.0;

        for &(u, v) in &[(0.5, 0.5), (0.1, 0.9), (0.95, 0.2)] {
            let uv = XY::new(u, v);
            let samples = sample_positions(uv, &s, capture());
            let expected = XY::new(s.view_x + u * s.width, s.view_y + v * s.height);
            assert!((samples.g.x - expected.x).abs() < 1e-4);
            assert!((samples.g.y - expected.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_dispersion_straddles_green() {
        let s = state();
        // Off-center fragment so the refraction vector is non-zero.
        let samples = sample_positions(XY::new(0.5, 0.05), &s, capture());

        let rg = samples.g - samples.r;
        let gb = samples.b - samples.g;
        // Red and blue sit symmetrically around green.
        assert!((rg.x - gb.x).abs() < 1e-4);
        assert!((rg.y - gb.y).abs() < 1e-4);
        assert!(rg.length() > 0.0);
    }

    #[test]
    fn test_magnification_fixed_point_at_capture_center() {
        // A fragment whose unmagnified sample position is exactly the
        // capture center must stay there under any magnification.
        let mut s = state();
        s.refraction = 0.0;
        s.magnification = 2.0;

        let cap = capture();
        let center = cap.center();
        // Choose uv so view_pos + uv * resolution == capture center.
        let uv = XY::new(
            (center.x - s.view_x) / s.width,
            (center.y - s.view_y) / s.height,
        );

        let samples = sample_positions(uv, &s, cap);
        assert!((samples.g.x - center.x).abs() < 1e-4);
        assert!((samples.g.y - center.y).abs() < 1e-4);
    }

    #[test]
    fn test_magnification_pulls_toward_center() {
        let mut s = state();
        s.refraction = 0.0;
        s.magnification = 2.0;

        let cap = capture();
        let center = cap.center();
        let samples = sample_positions(XY::new(0.9, 0.9), &s, cap);
        let unmagnified = XY::new(s.view_x + 0.9 * s.width, s.view_y + 0.9 * s.height);

        let before = (unmagnified - center).length();
        let after = (samples.g - center).length();
        assert!((after - before * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_offset_pans_after_magnification() {
        let mut s = state();
        s.refraction = 0.0;
        s.offset_x = 7.0;
        s.offset_y = -3.0;

        let samples = sample_positions(XY::new(0.5, 0.5), &s, capture());
        let base = XY::new(s.view_x + 0.5 * s.width, s.view_y + 0.5 * s.height);
        assert!((samples.g.x - (base.x + 7.0)).abs() < 1e-4);
        assert!((samples.g.y - (base.y - 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_capture_uv_flips_vertically() {
        let cap = capture();
        let top_left = capture_uv(XY::new(40.0, 140.0), cap);
        assert!((top_left.x - 0.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = capture_uv(XY::new(240.0, 300.0), cap);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - 0.0).abs() < 1e-6);
    }
}
