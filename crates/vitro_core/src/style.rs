//! Glass style presets
//!
//! A [`GlassStyle`] bundles every shading and capture parameter for one
//! glass material. Presets are art-directed constants chosen at surface
//! creation time and never mutated afterward; per-frame state (geometry,
//! touch point) lives on the surface, not the style.

use std::f32::consts::PI;

use crate::color::{AdaptiveColor, Color};

/// Physical shading parameters for the glass fragment model.
///
/// All distances are in points; angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassShading {
    /// Material tint (RGBA); overridden by [`GlassStyle::tint`] when set.
    pub material_tint: Color,
    /// Fake parallax depth driving edge refraction (8-16 px typical).
    pub glass_thickness: f32,
    /// 1.45-1.52 gives a borosilicate feel; closer to 1.0 is subtler.
    pub refractive_index: f32,
    /// Prismatic color split on edges.
    pub dispersion_strength: f32,
    /// Pixel falloff from the silhouette for rim lighting.
    pub fresnel_distance_range: f32,
    /// Rim lighting boost, 0.0-1.0.
    pub fresnel_intensity: f32,
    /// Power shaping the rim falloff: 1.0 = linear, 8.0 = crisp.
    pub fresnel_edge_sharpness: f32,
    /// Like the fresnel range, but for specular streaks.
    pub glare_distance_range: f32,
    /// 0.0-PI; focuses streaks toward the light direction.
    pub glare_angle_convergence: f32,
    /// Values above 1.0 amplify back-side highlights.
    pub glare_opposite_side_bias: f32,
    /// Bloom-like edge fire, 1.0-4.0.
    pub glare_intensity: f32,
    /// Falloff power matching the fresnel term.
    pub glare_edge_sharpness: f32,
    /// Radians; tilts streak asymmetry.
    pub glare_direction_offset: f32,
}

impl Default for GlassShading {
    fn default() -> Self {
        Self {
            material_tint: Color::TRANSPARENT,
            glass_thickness: 10.0,
            refractive_index: 1.5,
            dispersion_strength: 0.0,
            fresnel_distance_range: 70.0,
            fresnel_intensity: 0.0,
            fresnel_edge_sharpness: 0.0,
            glare_distance_range: 30.0,
            glare_angle_convergence: 0.0,
            glare_opposite_side_bias: 1.0,
            glare_intensity: 0.0,
            glare_edge_sharpness: 0.0,
            glare_direction_offset: 0.0,
        }
    }
}

/// Complete configuration of one glass material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassStyle {
    pub shading: GlassShading,
    /// Capture area as a multiple of the surface size (1.0 = exact bounds).
    pub backdrop_size_coefficient: f32,
    /// Capture resolution as a multiple of device scale (below 1.0 is a
    /// cheap implicit blur).
    pub backdrop_scale_coefficient: f32,
    /// Gaussian blur radius in points applied to the capture; 0 disables
    /// the blur pass entirely.
    pub backdrop_blur_radius: f32,
    /// Appearance-aware tint overriding `shading.material_tint`.
    pub tint: Option<AdaptiveColor>,
    /// Whether the host should accompany the surface with a drop-shadow
    /// overlay. Pure style data; the overlay is host-side chrome.
    pub shadow_overlay: bool,
}

impl GlassStyle {
    /// Standard glass: strong refraction, heavily downscaled and blurred
    /// backdrop, appearance-aware frost tint.
    pub const fn regular() -> Self {
        Self {
            shading: GlassShading {
                material_tint: Color::TRANSPARENT,
                glass_thickness: 10.0,
                refractive_index: 1.5,
                dispersion_strength: 5.0,
                fresnel_distance_range: 70.0,
                fresnel_intensity: 0.0,
                fresnel_edge_sharpness: 0.0,
                glare_distance_range: 30.0,
                glare_angle_convergence: 0.1,
                glare_opposite_side_bias: 1.0,
                glare_intensity: 0.1,
                glare_edge_sharpness: -0.15,
                glare_direction_offset: -PI / 4.0,
            },
            backdrop_size_coefficient: 1.0,
            backdrop_scale_coefficient: 0.2,
            backdrop_blur_radius: 0.3,
            tint: Some(AdaptiveColor::new(
                Color::rgba(0.9024, 0.9509, 1.0, 0.8003),
                Color::rgba(0.0, 0.0496, 0.0995, 0.7981),
            )),
            shadow_overlay: false,
        }
    }

    /// Clear magnifying lens: low index, pronounced dispersion, slightly
    /// over-scanned capture sampled under full resolution.
    pub const fn lens() -> Self {
        Self {
            shading: GlassShading {
                material_tint: Color::TRANSPARENT,
                glass_thickness: 6.0,
                refractive_index: 1.1,
                dispersion_strength: 15.0,
                fresnel_distance_range: 70.0,
                fresnel_intensity: 0.0,
                fresnel_edge_sharpness: 0.0,
                glare_distance_range: 30.0,
                glare_angle_convergence: 0.1,
                glare_opposite_side_bias: 1.0,
                glare_intensity: 0.1,
                glare_edge_sharpness: -0.1,
                glare_direction_offset: -PI / 4.0,
            },
            backdrop_size_coefficient: 1.1,
            backdrop_scale_coefficient: 0.8,
            backdrop_blur_radius: 0.0,
            tint: None,
            shadow_overlay: true,
        }
    }

    /// Near-clear slider-thumb glass. `magnification` above 1.0 shrinks the
    /// captured area while raising its resolution, magnifying the content
    /// under the thumb.
    pub fn thumb(magnification: f32) -> Self {
        Self {
            shading: GlassShading {
                material_tint: Color::rgba(0.9, 0.95, 1.0, 0.15),
                glass_thickness: 10.0,
                refractive_index: 1.11,
                dispersion_strength: 5.0,
                fresnel_distance_range: 70.0,
                fresnel_intensity: 0.0,
                fresnel_edge_sharpness: 0.0,
                glare_distance_range: 30.0,
                glare_angle_convergence: 0.0,
                glare_opposite_side_bias: 0.0,
                glare_intensity: 0.01,
                glare_edge_sharpness: -0.2,
                glare_direction_offset: PI * 0.9,
            },
            backdrop_size_coefficient: 1.0 / magnification,
            backdrop_scale_coefficient: magnification,
            backdrop_blur_radius: 0.0,
            tint: None,
            shadow_overlay: true,
        }
    }

    /// Tint actually shaded, after resolving the adaptive override.
    pub fn resolved_tint(&self, scheme: crate::ColorScheme) -> Color {
        match self.tint {
            Some(adaptive) => adaptive.resolve(scheme),
            None => self.shading.material_tint,
        }
    }
}

impl Default for GlassStyle {
    fn default() -> Self {
        Self::regular()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorScheme;

    #[test]
    fn regular_resolves_adaptive_tint() {
        let style = GlassStyle::regular();
        let light = style.resolved_tint(ColorScheme::Light);
        let dark = style.resolved_tint(ColorScheme::Dark);
        assert_ne!(light, dark);
        assert!(light.r > 0.5, "light frost should be bright");
        assert!(dark.r < 0.1, "dark slate should be near-black");
    }

    #[test]
    fn thumb_magnification_feeds_coefficients() {
        let style = GlassStyle::thumb(2.0);
        assert_eq!(style.backdrop_size_coefficient, 0.5);
        assert_eq!(style.backdrop_scale_coefficient, 2.0);
    }

    #[test]
    fn lens_keeps_material_tint() {
        let style = GlassStyle::lens();
        assert_eq!(
            style.resolved_tint(ColorScheme::Dark),
            style.shading.material_tint
        );
    }

    #[test]
    fn blur_only_on_regular_preset() {
        assert!(GlassStyle::regular().backdrop_blur_radius > 0.0);
        assert_eq!(GlassStyle::lens().backdrop_blur_radius, 0.0);
        assert_eq!(GlassStyle::thumb(1.0).backdrop_blur_radius, 0.0);
    }
}
