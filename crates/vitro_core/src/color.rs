//! Color types

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Host interface appearance, used to resolve adaptive tints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// A color with light and dark appearance variants.
///
/// Material tints for the `regular` glass preset shift between a bright
/// frost in light mode and a deep translucent slate in dark mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptiveColor {
    pub light: Color,
    pub dark: Color,
}

impl AdaptiveColor {
    pub const fn new(light: Color, dark: Color) -> Self {
        Self { light, dark }
    }

    /// A tint that is the same in both appearances.
    pub const fn fixed(color: Color) -> Self {
        Self {
            light: color,
            dark: color,
        }
    }

    pub fn resolve(&self, scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Light => self.light,
            ColorScheme::Dark => self.dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_resolves_per_scheme() {
        let tint = AdaptiveColor::new(Color::WHITE, Color::BLACK);
        assert_eq!(tint.resolve(ColorScheme::Light), Color::WHITE);
        assert_eq!(tint.resolve(ColorScheme::Dark), Color::BLACK);
    }

    #[test]
    fn fixed_ignores_scheme() {
        let tint = AdaptiveColor::fixed(Color::rgba(0.2, 0.8, 1.0, 1.0));
        assert_eq!(tint.resolve(ColorScheme::Light), tint.resolve(ColorScheme::Dark));
    }
}
