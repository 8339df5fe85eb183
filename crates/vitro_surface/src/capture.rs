//! Backdrop capture strategies
//!
//! Two ways of getting the pixels behind a glass surface into its bridge
//! texture. [`HierarchyCapture`] re-rasterizes the host's tree with the
//! surface hidden and always works. [`ProbeCapture`] copies pixels the
//! compositor already presented, which is cheaper but at least one frame
//! stale and only available when the scene implements
//! [`CompositedSnapshot`].
//!
//! The strategy is resolved once, when the host is created; call sites
//! never branch on capability.

use tracing::trace;
use vitro_core::{BackdropScene, GlassStyle, Rect, SceneNode};
use vitro_core::{CaptureTransform, Color};
use vitro_gpu::{BridgeError, GpuContext, ZeroCopyBridge};

/// Why a capture produced no new pixels this frame.
///
/// Every variant is a frame-skip, not a failure: the bridge keeps its
/// previous contents and the next frame retries.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The surface's element is not in the presented tree right now.
    #[error("element is detached from the presented tree")]
    Detached,
    /// The probe strategy's snapshot capability disappeared.
    #[error("composited snapshot capability unavailable")]
    SnapshotUnavailable,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// The region of root space a capture covers: the presented frame grown
/// about its center by the style's size coefficient.
pub fn capture_region(presented: Rect, style: &GlassStyle) -> Rect {
    presented.scaled_about_center(style.backdrop_size_coefficient)
}

/// The presented frame of `node`, as a capture region for `style`.
fn presented_region(
    scene: &dyn BackdropScene,
    node: SceneNode,
    style: &GlassStyle,
) -> Result<Rect, CaptureError> {
    let presented = scene.presented_frame(node).ok_or(CaptureError::Detached)?;
    Ok(capture_region(presented, style))
}

fn capture_pixels(region: Rect, scale: f32) -> (u32, u32) {
    let width = (region.width() * scale).ceil().max(1.0) as u32;
    let height = (region.height() * scale).ceil().max(1.0) as u32;
    (width, height)
}

/// One way of filling a bridge with the pixels behind a surface.
pub trait BackdropSource {
    fn name(&self) -> &'static str;

    /// Capture the backdrop of `node` into `bridge`, reallocating it to
    /// the capture size as needed.
    fn capture(
        &mut self,
        ctx: &GpuContext,
        bridge: &mut ZeroCopyBridge,
        scene: &dyn BackdropScene,
        node: SceneNode,
        style: &GlassStyle,
        device_scale: f32,
    ) -> Result<(), CaptureError>;
}

/// Pick the capture strategy for a scene. Probe when the scene exposes
/// composited pixels, hierarchy re-rasterization otherwise.
pub fn detect_strategy(scene: &dyn BackdropScene) -> Box<dyn BackdropSource> {
    if scene.composited_snapshot().is_some() {
        Box::new(ProbeCapture::new())
    } else {
        Box::new(HierarchyCapture)
    }
}

/// Re-rasterizes the host tree behind the surface every capture.
///
/// Reads the presented (animation-interpolated) frame, so the capture
/// tracks elements mid-flight rather than jumping to their committed
/// targets.
pub struct HierarchyCapture;

impl BackdropSource for HierarchyCapture {
    fn name(&self) -> &'static str {
        "hierarchy"
    }

    fn capture(
        &mut self,
        ctx: &GpuContext,
        bridge: &mut ZeroCopyBridge,
        scene: &dyn BackdropScene,
        node: SceneNode,
        style: &GlassStyle,
        device_scale: f32,
    ) -> Result<(), CaptureError> {
        let region = presented_region(scene, node, style)?;
        let scale = device_scale * style.backdrop_scale_coefficient;
        let (width, height) = capture_pixels(region, scale);
        bridge.resize(ctx, width, height)?;

        let transform = CaptureTransform::for_region(region, scale);
        bridge.render_into(ctx, |canvas| {
            canvas.fill(tiny_skia_color(Color::TRANSPARENT));
            scene.draw_root(canvas, transform, node);
        })?;
        Ok(())
    }
}

/// Copies already-composited pixels from behind a persistent probe region.
///
/// The probe is repositioned to the current capture region each frame;
/// the pixels it reads were presented at least one frame ago.
pub struct ProbeCapture {
    probe_region: Option<Rect>,
}

impl ProbeCapture {
    pub fn new() -> Self {
        Self { probe_region: None }
    }

    /// Where the probe sat after the last successful capture.
    pub fn probe_region(&self) -> Option<Rect> {
        self.probe_region
    }
}

impl Default for ProbeCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl BackdropSource for ProbeCapture {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn capture(
        &mut self,
        ctx: &GpuContext,
        bridge: &mut ZeroCopyBridge,
        scene: &dyn BackdropScene,
        node: SceneNode,
        style: &GlassStyle,
        device_scale: f32,
    ) -> Result<(), CaptureError> {
        let snapshot = scene
            .composited_snapshot()
            .ok_or(CaptureError::SnapshotUnavailable)?;

        let region = presented_region(scene, node, style)?;
        let scale = device_scale * style.backdrop_scale_coefficient;
        let (width, height) = capture_pixels(region, scale);
        bridge.resize(ctx, width, height)?;

        if self.probe_region != Some(region) {
            trace!(?region, "probe repositioned");
            self.probe_region = Some(region);
        }

        bridge.render_into(ctx, |canvas| {
            canvas.fill(tiny_skia_color(Color::TRANSPARENT));
            snapshot.snapshot_region(canvas, region, scale);
        })?;
        Ok(())
    }
}

fn tiny_skia_color(color: Color) -> vitro_core::tiny_skia::Color {
    vitro_core::tiny_skia::Color::from_rgba(color.r, color.g, color.b, color.a)
        .unwrap_or(vitro_core::tiny_skia::Color::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitro_core::{Canvas, CompositedSnapshot};

    struct PlainScene {
        presented: Option<Rect>,
    }

    impl BackdropScene for PlainScene {
        fn root_bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 400.0, 300.0)
        }

        fn presented_frame(&self, _node: SceneNode) -> Option<Rect> {
            self.presented
        }

        fn draw_root(&self, _canvas: &mut Canvas<'_>, _t: CaptureTransform, _hidden: SceneNode) {}
    }

    struct SnapshotScene(PlainScene);

    impl BackdropScene for SnapshotScene {
        fn root_bounds(&self) -> Rect {
            self.0.root_bounds()
        }

        fn presented_frame(&self, node: SceneNode) -> Option<Rect> {
            self.0.presented_frame(node)
        }

        fn draw_root(&self, canvas: &mut Canvas<'_>, t: CaptureTransform, hidden: SceneNode) {
            self.0.draw_root(canvas, t, hidden);
        }

        fn composited_snapshot(&self) -> Option<&dyn CompositedSnapshot> {
            Some(self)
        }
    }

    impl CompositedSnapshot for SnapshotScene {
        fn snapshot_region(&self, _canvas: &mut Canvas<'_>, _region: Rect, _scale: f32) {}
    }

    #[test]
    fn capture_region_grows_about_the_center() {
        let presented = Rect::new(10.0, 10.0, 80.0, 40.0);
        let mut style = GlassStyle::regular();
        style.backdrop_size_coefficient = 1.5;
        let region = capture_region(presented, &style);
        assert_eq!(region, Rect::new(-10.0, 0.0, 120.0, 60.0));
    }

    #[test]
    fn unit_coefficient_keeps_the_presented_frame() {
        let presented = Rect::new(5.0, 7.0, 50.0, 30.0);
        let mut style = GlassStyle::regular();
        style.backdrop_size_coefficient = 1.0;
        assert_eq!(capture_region(presented, &style), presented);
    }

    #[test]
    fn detached_element_is_a_skip_not_a_panic() {
        let scene = PlainScene { presented: None };
        let result = presented_region(&scene, SceneNode(1), &GlassStyle::regular());
        assert!(matches!(result, Err(CaptureError::Detached)));
    }

    #[test]
    fn region_follows_the_presented_frame_not_the_committed_one() {
        // Mid-animation the presented frame differs from the layout frame;
        // the capture must follow the former.
        let scene = PlainScene {
            presented: Some(Rect::new(42.0, 17.0, 56.0, 56.0)),
        };
        let region = presented_region(&scene, SceneNode(1), &GlassStyle::regular()).unwrap();
        assert_eq!(region, Rect::new(42.0, 17.0, 56.0, 56.0));
    }

    #[test]
    fn strategy_detection_prefers_snapshot_capability() {
        let plain = PlainScene {
            presented: Some(Rect::ZERO),
        };
        assert_eq!(detect_strategy(&plain).name(), "hierarchy");

        let snapshot = SnapshotScene(PlainScene {
            presented: Some(Rect::ZERO),
        });
        assert_eq!(detect_strategy(&snapshot).name(), "probe");
    }

    #[test]
    fn capture_pixel_size_never_collapses_to_zero() {
        let region = Rect::new(0.0, 0.0, 0.4, 0.4);
        assert_eq!(capture_pixels(region, 0.2), (1, 1));
        assert_eq!(capture_pixels(Rect::new(0.0, 0.0, 100.0, 50.0), 0.4), (40, 20));
    }
}
