//! Host scene contracts
//!
//! The renderer never walks the host's view tree itself. Instead the host
//! implements [`BackdropScene`] so capture strategies can ask two things:
//! where a glass element currently *appears* on screen (including any
//! in-flight animation), and to rasterize the content behind it.
//!
//! Hosts that retain the previously presented frame can additionally
//! implement [`CompositedSnapshot`], unlocking the cheaper probe-based
//! capture strategy.

use crate::geometry::Rect;

/// Opaque identifier for an element in the host's tree.
///
/// The host assigns these; the renderer only passes them back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneNode(pub u64);

/// CPU raster target backed directly by GPU-visible memory.
///
/// Rows may be wider than the logical capture width (GPU row-pitch
/// alignment); pixels beyond the logical width are never sampled.
pub type Canvas<'a> = tiny_skia::PixmapMut<'a>;

/// Uniform-scale-plus-translate mapping from root coordinates (points)
/// into capture pixels.
///
/// Capture applies `scale` first, then offsets so `origin` lands at the
/// canvas origin, mirroring how a capture context is set up before the
/// root content is drawn through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureTransform {
    /// Device scale x backdrop scale coefficient.
    pub scale: f32,
    /// Top-left corner of the capture region, in root coordinates.
    pub origin_x: f32,
    pub origin_y: f32,
}

impl CaptureTransform {
    /// Map the capture region `region` (root points) to pixels at `scale`.
    pub fn for_region(region: Rect, scale: f32) -> Self {
        Self {
            scale,
            origin_x: region.x(),
            origin_y: region.y(),
        }
    }

    /// Transform as applied to host drawing: scale, then translate.
    pub fn to_tiny_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_scale(self.scale, self.scale)
            .pre_translate(-self.origin_x, -self.origin_y)
    }

    /// Map a point in root coordinates to capture-pixel coordinates.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.origin_x) * self.scale, (y - self.origin_y) * self.scale)
    }
}

/// What the renderer needs from the host view tree to capture a backdrop.
pub trait BackdropScene {
    /// Bounds of the root content, in root coordinates.
    fn root_bounds(&self) -> Rect;

    /// The element's frame in root coordinates as it is *currently
    /// presented*, reading any in-flight animation's interpolated
    /// transform rather than the committed target.
    ///
    /// Returns `None` while the element is detached from the tree; the
    /// caller treats that as a skipped capture, never an error.
    fn presented_frame(&self, node: SceneNode) -> Option<Rect>;

    /// Rasterize the root content into `canvas` under `transform`,
    /// omitting `hidden` (the capturing surface must not see itself).
    fn draw_root(&self, canvas: &mut Canvas<'_>, transform: CaptureTransform, hidden: SceneNode);

    /// Capability query for [`CompositedSnapshot`]. Hosts that implement
    /// the snapshot trait override this with `Some(self)`; capture
    /// strategy selection keys off it once at startup.
    fn composited_snapshot(&self) -> Option<&dyn CompositedSnapshot> {
        None
    }
}

/// Optional host capability: access to already-composited pixels.
///
/// Implemented by hosts that keep the last presented frame addressable.
/// Capture through this path is at least one frame stale but avoids
/// re-rasterizing the tree.
pub trait CompositedSnapshot: BackdropScene {
    /// Copy the already-presented content under `region` (root points)
    /// into `canvas` at `scale` pixels per point.
    fn snapshot_region(&self, canvas: &mut Canvas<'_>, region: Rect, scale: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_region_origin_to_zero() {
        let region = Rect::new(30.0, 40.0, 100.0, 50.0);
        let t = CaptureTransform::for_region(region, 2.0);
        assert_eq!(t.apply(30.0, 40.0), (0.0, 0.0));
        assert_eq!(t.apply(130.0, 90.0), (200.0, 100.0));
    }

    #[test]
    fn tiny_skia_transform_agrees_with_apply() {
        let region = Rect::new(-10.0, 5.0, 20.0, 20.0);
        let t = CaptureTransform::for_region(region, 3.0);
        let ts = t.to_tiny_skia();
        let mut points = [tiny_skia::Point::from_xy(4.0, 9.0)];
        ts.map_points(&mut points);
        let (x, y) = t.apply(4.0, 9.0);
        assert!((points[0].x - x).abs() < 1e-4);
        assert!((points[0].y - y).abs() < 1e-4);
    }
}
