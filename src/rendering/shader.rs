//! WGSL shader source and GPU-facing data layouts.
//!
//! The fragment shader is the GPU twin of `lens.rs`: capsule SDF mask,
//! edge-concentrated refraction, chromatic dispersion, magnification
//! toward the capture center, a 5x5 Gaussian-weighted sample per
//! channel, and the cosmetic outline / inner shadow / specular layers.

use crate::config::GlassConfig;
use crate::state::ViewState;

/// Glass shader: unit quad vertex stage plus the refraction fragment stage.
pub const GLASS_SHADER: &str = r#"
struct GlassUniforms {
    resolution: vec4<f32>,    // element width, height, 0, 0
    view_pos: vec4<f32>,      // element screen x, y, 0, 0
    capture_rect: vec4<f32>,  // capture x, y, width, height
    lens: vec4<f32>,          // refraction, magnification, offset_x, offset_y
    effect: vec4<f32>,        // blur_intensity, 0, 0, 0
}

@group(0) @binding(0) var<uniform> uniforms: GlassUniforms;
@group(0) @binding(1) var scene_texture: texture_2d<f32>;
@group(0) @binding(2) var scene_sampler: sampler;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.position = vec4<f32>(input.position, 0.0, 1.0);
    output.uv = input.uv;
    return output;
}

// 5x5 Gaussian-weighted sample around screen_uv; offsets are scaled by
// the blur radius and the captured texture's texel size.
fn blurred_sample(screen_uv: vec2<f32>, pixel_size: vec2<f32>, blur_radius: f32) -> vec3<f32> {
    var color = vec3<f32>(0.0);
    var total_weight = 0.0;

    for (var x: i32 = -2; x <= 2; x = x + 1) {
        for (var y: i32 = -2; y <= 2; y = y + 1) {
            let offset = vec2<f32>(f32(x), f32(y)) * blur_radius * pixel_size;
            let weight = exp(-0.5 * f32(x * x + y * y) / 2.0);
            color += textureSample(scene_texture, scene_sampler, screen_uv + offset).rgb * weight;
            total_weight += weight;
        }
    }
    return color / total_weight;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let lens_radius = 0.5;
    let resolution = uniforms.resolution.xy;
    let refraction_strength = uniforms.lens.x;
    let magnification = uniforms.lens.y;

    // Aspect-corrected local space centered on the element.
    let aspect = vec2<f32>(resolution.x / resolution.y, 1.0);
    let p = (input.uv - vec2<f32>(0.5)) * aspect;

    // Horizontal capsule: distance to the straight spine segment.
    let h = max(0.0, (aspect.x - 1.0) * 0.5);
    let nearest = vec2<f32>(clamp(p.x, -h, h), 0.0);
    let dist = length(p - nearest);

    // Anti-aliased alpha mask at the capsule surface.
    let edge = fwidth(dist);
    let alpha = 1.0 - smoothstep(lens_radius - edge, lens_radius + edge, dist);
    if (alpha <= 0.0) {
        discard;
    }

    // Refraction concentrated at the lens edge.
    let refraction = pow(dist / lens_radius, 6.0) * refraction_strength;
    var refract_local = vec2<f32>(0.0);
    if (dist >= 0.0001) {
        refract_local = normalize(nearest - p) * refraction;
    }
    let dispersion_local = refract_local * 0.05;

    // Local offsets are normalized to element height; convert to
    // absolute screen pixels at the fragment's screen position.
    let frag_screen = uniforms.view_pos.xy + input.uv * resolution;
    let offset_px = refract_local * resolution.y;
    let dispersion_px = dispersion_local * resolution.y;

    var pos_r = frag_screen + offset_px - dispersion_px;
    var pos_g = frag_screen + offset_px;
    var pos_b = frag_screen + offset_px + dispersion_px;

    // Magnify by pulling sample positions toward the capture center,
    // then pan by the absolute pixel offset.
    let capture_origin = uniforms.capture_rect.xy;
    let capture_size = uniforms.capture_rect.zw;
    let capture_center = capture_origin + capture_size * 0.5;
    let pan = uniforms.lens.zw;

    pos_r = capture_center + (pos_r - capture_center) / magnification + pan;
    pos_g = capture_center + (pos_g - capture_center) / magnification + pan;
    pos_b = capture_center + (pos_b - capture_center) / magnification + pan;

    // Into capture-texture UVs, flipping Y to match top-down rows.
    var uv_r = (pos_r - capture_origin) / capture_size;
    var uv_g = (pos_g - capture_origin) / capture_size;
    var uv_b = (pos_b - capture_origin) / capture_size;
    uv_r.y = 1.0 - uv_r.y;
    uv_g.y = 1.0 - uv_g.y;
    uv_b.y = 1.0 - uv_b.y;

    let pixel_size = vec2<f32>(1.0) / capture_size;
    let blur_radius = uniforms.effect.x;

    let r = blurred_sample(uv_r, pixel_size, blur_radius).r;
    let g = blurred_sample(uv_g, pixel_size, blur_radius).g;
    let b = blurred_sample(uv_b, pixel_size, blur_radius).b;
    var final_color = vec3<f32>(r, g, b);

    // Thin bright outline just inside the mask edge.
    let outline_width = 0.01;
    let outline = smoothstep(lens_radius - outline_width - edge, lens_radius - outline_width, dist)
        * (1.0 - smoothstep(lens_radius - edge, lens_radius, dist));
    final_color += outline * 0.3;

    // Soft inner shadow darkening toward the edge.
    let inner_shadow = smoothstep(lens_radius - 0.15, lens_radius, dist);
    final_color *= 1.0 - inner_shadow * 0.08;

    // Top-left specular highlight from the capsule surface normal.
    let light_dir = normalize(vec2<f32>(-1.0, 1.0));
    var normal = vec2<f32>(0.0);
    if (dist >= 0.0001) {
        normal = normalize(p - nearest);
    }
    let spec = pow(max(dot(normal, light_dir), 0.0), 4.0);
    final_color += spec * 0.1;

    return vec4<f32>(final_color, alpha);
}
"#;

/// Uniform block for the glass shader. Fields are vec4-packed to match
/// WGSL's 16-byte alignment rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlassUniforms {
    pub resolution: [f32; 4],
    pub view_pos: [f32; 4],
    pub capture_rect: [f32; 4],
    pub lens: [f32; 4],
    pub effect: [f32; 4],
}

impl GlassUniforms {
    /// Pack the current view state and capture geometry for upload.
    pub fn pack(
        state: &ViewState,
        capture_origin: (i32, i32),
        capture_size: (u32, u32),
        config: &GlassConfig,
    ) -> Self {
        Self {
            resolution: [state.width, state.height, 0.0, 0.0],
            view_pos: [state.view_x, state.view_y, 0.0, 0.0],
            capture_rect: [
                capture_origin.0 as f32,
                capture_origin.1 as f32,
                capture_size.0 as f32,
                capture_size.1 as f32,
            ],
            lens: [
                state.refraction,
                state.magnification,
                state.offset_x,
                state.offset_y,
            ],
            effect: [config.blur_intensity, 0.0, 0.0, 0.0],
        }
    }
}

/// One vertex of the unit quad: clip-space position plus element UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Unit quad as a 4-vertex triangle strip. UVs put (0,0) at the
/// element's top-left corner.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 0.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        // Five vec4s, 16-byte aligned.
        assert_eq!(std::mem::size_of::<GlassUniforms>(), 80);
        assert_eq!(std::mem::size_of::<GlassUniforms>() % 16, 0);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
        assert_eq!(std::mem::size_of_val(&QUAD_VERTICES), 64);
    }

    #[test]
    fn test_uniform_pack() {
        let state = ViewState {
            view_x: 100.5,
            view_y: 200.25,
            width: 60.0,
            height: 40.0,
            refraction: 0.8,
            magnification: 2.0,
            offset_x: 5.0,
            offset_y: -3.0,
        };
        let uniforms = GlassUniforms::pack(&state, (40, 140), (200, 160), &GlassConfig::default());

        assert_eq!(uniforms.resolution[..2], [60.0, 40.0]);
        assert_eq!(uniforms.view_pos[..2], [100.5, 200.25]);
        assert_eq!(uniforms.capture_rect, [40.0, 140.0, 200.0, 160.0]);
        assert_eq!(uniforms.lens, [0.8, 2.0, 5.0, -3.0]);
        assert!((uniforms.effect[0] - 0.1).abs() < f32::EPSILON);
    }
}
