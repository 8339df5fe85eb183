//! Shader uniform model
//!
//! [`ShaderUniforms`] is the fixed-layout parameter block read by the glass
//! fragment shader. Its byte layout must match the WGSL `ShaderUniforms`
//! struct exactly; field order, vector alignment, and the trailing padding
//! before the rectangle array are all load-bearing.
//!
//! The block is recomputed from surface state every frame and never
//! persisted.

use tracing::debug;
use vitro_core::{ColorScheme, CornerCurve, GlassStyle, Point, Rect};

/// Maximum number of rectangles the shader supports in one merged pass.
pub const MAX_RECTANGLES: usize = 16;

/// Per-frame geometry snapshot of a glass surface.
///
/// Corner radius and curve are read fresh from host layout each frame
/// rather than cached, so shading always matches current layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    /// Surface bounds in points, local origin.
    pub bounds: Rect,
    /// Base corner rounding in points.
    pub corner_radius: f32,
    /// Corner curve class (drives the roundness exponent).
    pub corner_curve: CornerCurve,
}

/// GPU uniform block for the glass shader (matches WGSL `ShaderUniforms`).
///
/// Memory layout (total 368 bytes):
/// - resolution: `vec2<f32>`                  (offset   0)
/// - contents_scale: `f32`                    (offset   8)
/// - shape_merge_smoothness: `f32`            (offset  12)
/// - touch_point: `vec2<f32>`                 (offset  16)
/// - corner_radius: `f32`                     (offset  24)
/// - corner_roundness_exponent: `f32`         (offset  28)
/// - material_tint: `vec4<f32>`               (offset  32)
/// - 12 shading scalars: `f32`                (offset  48..96)
/// - rectangle_count: `u32`                   (offset  96)
/// - padding to 16-byte array alignment       (offset 100)
/// - rectangles: `array<vec4<f32>, 16>`       (offset 112)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    /// Frame size in device pixels.
    pub resolution: [f32; 2],
    /// Device scale factor (2 for Retina-class displays).
    pub contents_scale: f32,
    /// Distance in points at which merged elements begin to blend.
    pub shape_merge_smoothness: f32,
    /// Touch position in points, top-left origin; zeroed when none.
    pub touch_point: [f32; 2],
    /// Base corner rounding in points.
    pub corner_radius: f32,
    /// 1 = diamond, 2 = circle, 4 = squircle.
    pub corner_roundness_exponent: f32,
    /// Material tint, RGBA.
    pub material_tint: [f32; 4],
    pub glass_thickness: f32,
    pub refractive_index: f32,
    pub dispersion_strength: f32,
    pub fresnel_distance_range: f32,
    pub fresnel_intensity: f32,
    pub fresnel_edge_sharpness: f32,
    pub glare_distance_range: f32,
    pub glare_angle_convergence: f32,
    pub glare_opposite_side_bias: f32,
    pub glare_intensity: f32,
    pub glare_edge_sharpness: f32,
    pub glare_direction_offset: f32,
    /// Number of populated rectangle slots.
    pub rectangle_count: u32,
    pub _pad: [u32; 3],
    /// (x, y, width, height) in points, top-left origin; unused slots zeroed.
    pub rectangles: [[f32; 4]; MAX_RECTANGLES],
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        let mut uniforms: Self = bytemuck::Zeroable::zeroed();
        uniforms.corner_roundness_exponent = 2.0;
        uniforms
    }
}

impl ShaderUniforms {
    /// Build a complete uniform block from a surface's current state.
    ///
    /// Total function: every input combination produces a valid (possibly
    /// degenerate) block. An empty `merged_rects` falls back to the surface
    /// bounds; more than [`MAX_RECTANGLES`] entries are truncated to the
    /// first sixteen.
    pub fn compose(
        style: &GlassStyle,
        geometry: SurfaceGeometry,
        contents_scale: f32,
        touch_point: Option<Point>,
        shape_merge_smoothness: f32,
        merged_rects: &[Rect],
        scheme: ColorScheme,
    ) -> Self {
        let shading = &style.shading;
        let mut uniforms = Self {
            resolution: [
                geometry.bounds.width() * contents_scale,
                geometry.bounds.height() * contents_scale,
            ],
            contents_scale,
            shape_merge_smoothness,
            touch_point: match touch_point {
                Some(point) => [point.x, point.y],
                None => [0.0, 0.0],
            },
            corner_radius: geometry.corner_radius,
            corner_roundness_exponent: geometry.corner_curve.roundness_exponent(),
            material_tint: style.resolved_tint(scheme).to_array(),
            glass_thickness: shading.glass_thickness,
            refractive_index: shading.refractive_index,
            dispersion_strength: shading.dispersion_strength,
            fresnel_distance_range: shading.fresnel_distance_range,
            fresnel_intensity: shading.fresnel_intensity,
            fresnel_edge_sharpness: shading.fresnel_edge_sharpness,
            glare_distance_range: shading.glare_distance_range,
            glare_angle_convergence: shading.glare_angle_convergence,
            glare_opposite_side_bias: shading.glare_opposite_side_bias,
            glare_intensity: shading.glare_intensity,
            glare_edge_sharpness: shading.glare_edge_sharpness,
            glare_direction_offset: shading.glare_direction_offset,
            rectangle_count: 0,
            _pad: [0; 3],
            rectangles: [[0.0; 4]; MAX_RECTANGLES],
        };

        // A surface with no explicit merge group is its own single rect.
        let bounds_rect = [geometry.bounds];
        let effective: &[Rect] = if merged_rects.is_empty() {
            &bounds_rect
        } else {
            merged_rects
        };

        if effective.len() > MAX_RECTANGLES {
            debug!(
                dropped = effective.len() - MAX_RECTANGLES,
                "merged rectangle list exceeds shader capacity; truncating"
            );
        }

        let count = effective.len().min(MAX_RECTANGLES);
        for (slot, rect) in uniforms.rectangles.iter_mut().zip(&effective[..count]) {
            *slot = [rect.x(), rect.y(), rect.width(), rect.height()];
        }
        uniforms.rectangle_count = count as u32;

        uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitro_core::{GlassStyle, Point, Rect};

    fn geometry(width: f32, height: f32, radius: f32) -> SurfaceGeometry {
        SurfaceGeometry {
            bounds: Rect::new(0.0, 0.0, width, height),
            corner_radius: radius,
            corner_curve: CornerCurve::Circular,
        }
    }

    #[test]
    fn layout_is_368_bytes() {
        assert_eq!(std::mem::size_of::<ShaderUniforms>(), 368);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, touch_point), 16);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, material_tint), 32);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, glass_thickness), 48);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, rectangle_count), 96);
        assert_eq!(std::mem::offset_of!(ShaderUniforms, rectangles), 112);
    }

    #[test]
    fn regular_56pt_button() {
        let uniforms = ShaderUniforms::compose(
            &GlassStyle::regular(),
            geometry(56.0, 56.0, 27.0),
            2.0,
            None,
            0.2,
            &[],
            ColorScheme::Light,
        );
        assert_eq!(uniforms.corner_radius, 27.0);
        assert_eq!(uniforms.resolution, [112.0, 112.0]);
        assert_eq!(uniforms.rectangle_count, 1);
        assert_eq!(uniforms.rectangles[0], [0.0, 0.0, 56.0, 56.0]);
        assert_eq!(uniforms.rectangles[1], [0.0; 4]);
    }

    #[test]
    fn overflow_truncates_to_capacity() {
        let rects: Vec<Rect> = (0..40)
            .map(|i| Rect::new(i as f32 * 10.0, 0.0, 8.0, 8.0))
            .collect();
        let uniforms = ShaderUniforms::compose(
            &GlassStyle::lens(),
            geometry(400.0, 20.0, 4.0),
            3.0,
            None,
            0.2,
            &rects,
            ColorScheme::Light,
        );
        assert_eq!(uniforms.rectangle_count as usize, MAX_RECTANGLES);
        // First sixteen kept in order, none synthesized.
        assert_eq!(uniforms.rectangles[0], [0.0, 0.0, 8.0, 8.0]);
        assert_eq!(uniforms.rectangles[15], [150.0, 0.0, 8.0, 8.0]);
    }

    #[test]
    fn populated_slots_match_count_remainder_zeroed() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 10.0, 10.0),
            Rect::new(40.0, 0.0, 10.0, 10.0),
        ];
        let uniforms = ShaderUniforms::compose(
            &GlassStyle::regular(),
            geometry(60.0, 10.0, 2.0),
            2.0,
            None,
            10.0,
            &rects,
            ColorScheme::Dark,
        );
        assert_eq!(uniforms.rectangle_count, 3);
        for slot in &uniforms.rectangles[..3] {
            assert_ne!(*slot, [0.0; 4]);
        }
        for slot in &uniforms.rectangles[3..] {
            assert_eq!(*slot, [0.0; 4]);
        }
    }

    #[test]
    fn touch_point_zeroed_when_absent() {
        let style = GlassStyle::thumb(1.0);
        let with_touch = ShaderUniforms::compose(
            &style,
            geometry(56.0, 56.0, 28.0),
            2.0,
            Some(Point::new(12.0, 34.0)),
            0.2,
            &[],
            ColorScheme::Light,
        );
        let without = ShaderUniforms::compose(
            &style,
            geometry(56.0, 56.0, 28.0),
            2.0,
            None,
            0.2,
            &[],
            ColorScheme::Light,
        );
        assert_eq!(with_touch.touch_point, [12.0, 34.0]);
        assert_eq!(without.touch_point, [0.0, 0.0]);
    }

    #[test]
    fn zero_size_bounds_degenerate_but_valid() {
        let uniforms = ShaderUniforms::compose(
            &GlassStyle::regular(),
            geometry(0.0, 0.0, 0.0),
            2.0,
            None,
            0.2,
            &[],
            ColorScheme::Light,
        );
        assert_eq!(uniforms.resolution, [0.0, 0.0]);
        assert_eq!(uniforms.rectangle_count, 1);
    }

    #[test]
    fn continuous_corners_use_squircle_exponent() {
        let uniforms = ShaderUniforms::compose(
            &GlassStyle::regular(),
            SurfaceGeometry {
                bounds: Rect::new(0.0, 0.0, 100.0, 40.0),
                corner_radius: 12.0,
                corner_curve: CornerCurve::Continuous,
            },
            2.0,
            None,
            0.2,
            &[],
            ColorScheme::Light,
        );
        assert_eq!(uniforms.corner_roundness_exponent, 4.0);
    }
}
