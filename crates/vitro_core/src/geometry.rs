//! Core geometry types
//!
//! Points, sizes, and rectangles are in logical points with a top-left
//! origin; device-pixel conversion happens at the GPU boundary.

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

impl From<Size> for Rect {
    fn from(size: Size) -> Self {
        size.to_rect()
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// A rect with the same center whose size is scaled by `factor`.
    ///
    /// Backdrop capture regions expand around the glass surface's center,
    /// so the shader can refract content just outside the bounds.
    pub fn scaled_about_center(&self, factor: f32) -> Self {
        let center = self.center();
        let width = self.size.width * factor;
        let height = self.size.height * factor;
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

/// Corner curve classification for a glass surface.
///
/// Determines the exponent of the superellipse used for corner shading:
/// circular corners follow `x^2 + y^2 = r^2`, continuous ("squircle")
/// corners use a 4th-power curve for a softer transition into the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CornerCurve {
    #[default]
    Circular,
    Continuous,
}

impl CornerCurve {
    /// Shader-facing roundness exponent (1 = diamond, 2 = circle, 4 = squircle).
    pub fn roundness_exponent(self) -> f32 {
        match self {
            CornerCurve::Circular => 2.0,
            CornerCurve::Continuous => 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_about_center_preserves_center() {
        let rect = Rect::new(10.0, 20.0, 40.0, 60.0);
        let scaled = rect.scaled_about_center(1.5);
        assert_eq!(scaled.center(), rect.center());
        assert_eq!(scaled.width(), 60.0);
        assert_eq!(scaled.height(), 90.0);
    }

    #[test]
    fn scaled_about_center_identity() {
        let rect = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(rect.scaled_about_center(1.0), rect);
    }

    #[test]
    fn corner_curve_exponents() {
        assert_eq!(CornerCurve::Circular.roundness_exponent(), 2.0);
        assert_eq!(CornerCurve::Continuous.roundness_exponent(), 4.0);
    }

    #[test]
    fn contains_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(!rect.contains(Point::new(10.1, 5.0)));
    }
}
