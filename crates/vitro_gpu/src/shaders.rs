//! WGSL shader sources
//!
//! Shaders are embedded as string constants and compiled once per
//! [`GpuContext`](crate::GpuContext). The `ShaderUniforms` and
//! `BlurUniforms` structs here must stay byte-compatible with their Rust
//! mirrors in `uniforms.rs` and `blur.rs`.

/// Liquid glass shading: fullscreen quad vertex stage plus the fragment
/// model (superellipse rounded-rect SDF, smooth-min rectangle merging,
/// edge refraction with RGB dispersion, Fresnel rim, directional glare,
/// material tint, touch highlight).
pub const GLASS_SHADER: &str = r#"
// ============================================================================
// Vitro Liquid Glass Shader
// ============================================================================
// Shades a translucent glass material over a captured backdrop texture.
// All distances are in points (top-left origin); the uniform block carries
// the device scale for pixel conversions.

struct ShaderUniforms {
    resolution: vec2<f32>,
    contents_scale: f32,
    shape_merge_smoothness: f32,
    touch_point: vec2<f32>,
    corner_radius: f32,
    corner_roundness_exponent: f32,
    material_tint: vec4<f32>,
    glass_thickness: f32,
    refractive_index: f32,
    dispersion_strength: f32,
    fresnel_distance_range: f32,
    fresnel_intensity: f32,
    fresnel_edge_sharpness: f32,
    glare_distance_range: f32,
    glare_angle_convergence: f32,
    glare_opposite_side_bias: f32,
    glare_intensity: f32,
    glare_edge_sharpness: f32,
    glare_direction_offset: f32,
    rectangle_count: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
    rectangles: array<vec4<f32>, 16>,
}

@group(0) @binding(0) var<uniform> uniforms: ShaderUniforms;
@group(0) @binding(1) var backdrop_texture: texture_2d<f32>;
@group(0) @binding(2) var backdrop_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

// ============================================================================
// Vertex Shader
// ============================================================================

@vertex
fn vs_fullscreen(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // Triangle-strip quad generated from the vertex index; uv has a
    // top-left origin to match point coordinates.
    var out: VertexOutput;
    let x = f32(vertex_index & 1u);
    let y = f32(vertex_index >> 1u);
    out.uv = vec2<f32>(x, y);
    out.position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
    return out;
}

// ============================================================================
// Distance Field
// ============================================================================

// Rounded rectangle whose corners follow the superellipse |x|^n + |y|^n = r^n.
// n = 2 is a circular corner, n = 4 the softer "continuous" squircle.
fn sd_glass_rect(p: vec2<f32>, rect: vec4<f32>, radius: f32, exponent: f32) -> f32 {
    let half_size = rect.zw * 0.5;
    let center = rect.xy + half_size;
    let r = min(radius, min(half_size.x, half_size.y));
    let q = abs(p - center) - half_size + vec2<f32>(r);
    let qc = max(q, vec2<f32>(0.0));
    let n = max(exponent, 1.0);
    let corner = pow(pow(qc.x, n) + pow(qc.y, n), 1.0 / n);
    return corner + min(max(q.x, q.y), 0.0) - r;
}

// Polynomial smooth minimum; k is the distance at which shapes begin to
// merge.
fn smin(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return min(a, b);
    }
    let h = clamp(0.5 + 0.5 * (b - a) / k, 0.0, 1.0);
    return mix(b, a, h) - k * h * (1.0 - h);
}

fn scene_distance(p: vec2<f32>) -> f32 {
    var d = 1e6;
    let count = min(uniforms.rectangle_count, 16u);
    for (var i = 0u; i < count; i++) {
        let d_i = sd_glass_rect(
            p,
            uniforms.rectangles[i],
            uniforms.corner_radius,
            uniforms.corner_roundness_exponent,
        );
        d = smin(d, d_i, uniforms.shape_merge_smoothness);
    }
    return d;
}

// Direction toward the nearest silhouette edge (central differences).
fn scene_gradient(p: vec2<f32>) -> vec2<f32> {
    let e = 0.5;
    let dx = scene_distance(p + vec2<f32>(e, 0.0)) - scene_distance(p - vec2<f32>(e, 0.0));
    let dy = scene_distance(p + vec2<f32>(0.0, e)) - scene_distance(p - vec2<f32>(0.0, e));
    let g = vec2<f32>(dx, dy);
    let len = length(g);
    if len < 1e-5 {
        return vec2<f32>(0.0, 0.0);
    }
    return g / len;
}

// ============================================================================
// Fragment Shader
// ============================================================================

@fragment
fn fs_liquid_glass(in: VertexOutput) -> @location(0) vec4<f32> {
    // Work in points so style parameters keep their units.
    let view_points = uniforms.resolution / max(uniforms.contents_scale, 1e-3);
    let p = in.uv * view_points;

    let d = scene_distance(p);
    let aa = 1.0 / max(uniforms.contents_scale, 1.0);
    let coverage = 1.0 - smoothstep(-aa, aa, d);
    if coverage <= 0.0 {
        return vec4<f32>(0.0);
    }

    let toward_edge = scene_gradient(p);
    let edge_distance = max(-d, 0.0);

    // Refraction: lens-like displacement toward the nearest edge. The
    // parallax depth is set by the thickness, the bend strength by how far
    // the index departs from air; the effect dies off within three
    // thicknesses of the edge.
    let bend = (uniforms.refractive_index - 1.0) * uniforms.glass_thickness;
    let reach = max(uniforms.glass_thickness * 3.0, 1e-3);
    let edge_t = 1.0 - clamp(edge_distance / reach, 0.0, 1.0);
    let shift = toward_edge * bend * edge_t * edge_t;

    // Touch interaction: a soft bulge pulling content toward the contact
    // point.
    var touch_shift = vec2<f32>(0.0);
    if uniforms.touch_point.x > 0.0 || uniforms.touch_point.y > 0.0 {
        let delta = p - uniforms.touch_point;
        let influence = exp(-dot(delta, delta) / 900.0);
        touch_shift = -delta * influence * 0.12;
    }

    // Dispersion: sample the channels at slightly different refraction
    // strengths for a prismatic split along edges.
    let spread = uniforms.dispersion_strength * 0.004;
    let uv_r = (p + shift * (1.0 + spread) + touch_shift) / view_points;
    let uv_g = (p + shift + touch_shift) / view_points;
    let uv_b = (p + shift * (1.0 - spread) + touch_shift) / view_points;
    var color = vec3<f32>(
        textureSampleLevel(backdrop_texture, backdrop_sampler, uv_r, 0.0).r,
        textureSampleLevel(backdrop_texture, backdrop_sampler, uv_g, 0.0).g,
        textureSampleLevel(backdrop_texture, backdrop_sampler, uv_b, 0.0).b,
    );

    // Material tint.
    color = mix(color, uniforms.material_tint.rgb, uniforms.material_tint.a);

    // Fresnel rim: brightening that grows toward the silhouette.
    let fresnel_t = 1.0 - clamp(edge_distance / max(uniforms.fresnel_distance_range, 1e-3), 0.0, 1.0);
    let fresnel_power = max(1.0 + uniforms.fresnel_edge_sharpness, 0.1);
    let fresnel = uniforms.fresnel_intensity * pow(fresnel_t, fresnel_power);
    color += vec3<f32>(fresnel);

    // Glare: specular streaks on silhouette segments facing the light
    // direction, optionally echoed on the opposite side.
    let glare_t = 1.0 - clamp(edge_distance / max(uniforms.glare_distance_range, 1e-3), 0.0, 1.0);
    let edge_angle = atan2(toward_edge.y, toward_edge.x);
    let alignment = cos(edge_angle - uniforms.glare_direction_offset);
    let focus = 1.0 + uniforms.glare_angle_convergence * 8.0;
    let front = pow(max(alignment, 0.0), focus);
    let back = pow(max(-alignment, 0.0), focus) * max(uniforms.glare_opposite_side_bias, 0.0);
    let glare_power = max(1.0 + uniforms.glare_edge_sharpness, 0.1);
    let glare = uniforms.glare_intensity * (front + back) * pow(glare_t, glare_power);
    color += vec3<f32>(glare);

    return vec4<f32>(color, coverage);
}
"#;

/// Separable Gaussian blur, one direction per draw. Horizontal and
/// vertical invocations differ only in the uniform block's `texel_step`.
pub const BLUR_SHADER: &str = r#"
// ============================================================================
// Vitro Backdrop Blur Shader
// ============================================================================
// One axis of a separable Gaussian. Weights are evaluated in-shader from
// sigma; edge handling is clamp-to-edge via the sampler.

struct BlurUniforms {
    texel_step: vec2<f32>,
    sigma: f32,
    taps: i32,
}

@group(0) @binding(0) var<uniform> blur: BlurUniforms;
@group(0) @binding(1) var source_texture: texture_2d<f32>;
@group(0) @binding(2) var source_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_fullscreen(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var out: VertexOutput;
    let x = f32(vertex_index & 1u);
    let y = f32(vertex_index >> 1u);
    out.uv = vec2<f32>(x, y);
    out.position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
    return out;
}

@fragment
fn fs_blur(in: VertexOutput) -> @location(0) vec4<f32> {
    let denom = 2.0 * blur.sigma * blur.sigma;
    var color = vec4<f32>(0.0);
    var total = 0.0;
    for (var i = -blur.taps; i <= blur.taps; i++) {
        let x = f32(i);
        let w = exp(-x * x / denom);
        let uv = in.uv + blur.texel_step * x;
        color += textureSampleLevel(source_texture, source_sampler, uv, 0.0) * w;
        total += w;
    }
    return color / total;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(source: &str, label: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{label} failed to parse: {e}"));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .unwrap_or_else(|e| panic!("{label} failed validation: {e:?}"));
    }

    #[test]
    fn glass_shader_is_valid_wgsl() {
        validate(GLASS_SHADER, "GLASS_SHADER");
    }

    #[test]
    fn blur_shader_is_valid_wgsl() {
        validate(BLUR_SHADER, "BLUR_SHADER");
    }

    #[test]
    fn glass_shader_entry_points() {
        let module = naga::front::wgsl::parse_str(GLASS_SHADER).unwrap();
        let names: Vec<_> = module
            .entry_points
            .iter()
            .map(|ep| ep.name.as_str())
            .collect();
        assert!(names.contains(&"vs_fullscreen"));
        assert!(names.contains(&"fs_liquid_glass"));
    }

    #[test]
    fn glass_uniform_block_matches_rust_layout() {
        // The WGSL block and the Rust Pod struct must agree on total size.
        let module = naga::front::wgsl::parse_str(GLASS_SHADER).unwrap();
        let (handle, _) = module
            .global_variables
            .iter()
            .find(|(_, var)| var.name.as_deref() == Some("uniforms"))
            .expect("uniform block present");
        let ty = module.global_variables[handle].ty;
        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();
        assert_eq!(
            layouter[ty].size as usize,
            std::mem::size_of::<crate::uniforms::ShaderUniforms>()
        );
    }
}
