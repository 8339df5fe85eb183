//! Per-surface state and lifecycle

use smallvec::SmallVec;
use vitro_core::{GlassStyle, Point, Rect, SceneNode};
use vitro_gpu::{BlurPass, GlassPass, GpuContext, SurfaceGeometry, ZeroCopyBridge};

/// Merge falloff for a lone surface, in points.
pub const DEFAULT_MERGE_SMOOTHNESS: f32 = 0.2;

/// Merge falloff between grouped elements rendered as one surface, in
/// points.
pub const DEFAULT_CONTAINER_SPACING: f32 = 10.0;

/// Lifecycle of a glass surface.
///
/// Transitions only move forward out of `Destroyed`: a destroyed surface
/// never renders or reattaches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceState {
    /// Created but not yet bound to a scene element; nothing renders.
    #[default]
    Detached,
    /// Bound to a scene element and participating in frames.
    Active,
    /// Torn down; all operations are no-ops.
    Destroyed,
}

impl SurfaceState {
    pub fn on_attach(self) -> Self {
        match self {
            SurfaceState::Destroyed => SurfaceState::Destroyed,
            _ => SurfaceState::Active,
        }
    }

    pub fn on_detach(self) -> Self {
        match self {
            SurfaceState::Destroyed => SurfaceState::Destroyed,
            _ => SurfaceState::Detached,
        }
    }

    pub fn on_destroy(self) -> Self {
        SurfaceState::Destroyed
    }

    pub fn is_renderable(self) -> bool {
        self == SurfaceState::Active
    }
}

/// One glass element: its style, current host-fed state, and the GPU
/// resources it owns (bridge, blur scratch, draw state).
///
/// The style is fixed at creation; everything else is mutated through
/// [`GlassHost`](crate::GlassHost) between frames.
pub(crate) struct GlassSurface {
    pub(crate) style: GlassStyle,
    pub(crate) state: SurfaceState,
    pub(crate) node: Option<SceneNode>,
    pub(crate) geometry: SurfaceGeometry,
    pub(crate) device_scale: f32,
    pub(crate) touch_point: Option<Point>,
    pub(crate) merged_rects: SmallVec<[Rect; 16]>,
    pub(crate) merge_smoothness: f32,
    pub(crate) auto_capture: bool,
    pub(crate) bridge: ZeroCopyBridge,
    pub(crate) blur: BlurPass,
    pub(crate) pass: GlassPass,
}

impl GlassSurface {
    pub(crate) fn new(ctx: &GpuContext, style: GlassStyle) -> Self {
        Self {
            style,
            state: SurfaceState::Detached,
            node: None,
            geometry: SurfaceGeometry {
                bounds: Rect::ZERO,
                corner_radius: 0.0,
                corner_curve: Default::default(),
            },
            device_scale: 1.0,
            touch_point: None,
            merged_rects: SmallVec::new(),
            merge_smoothness: DEFAULT_MERGE_SMOOTHNESS,
            auto_capture: true,
            bridge: ZeroCopyBridge::new(),
            blur: BlurPass::new(ctx),
            pass: GlassPass::new(ctx),
        }
    }

    pub(crate) fn attach(&mut self, node: SceneNode) {
        if self.state == SurfaceState::Destroyed {
            return;
        }
        self.node = Some(node);
        self.state = self.state.on_attach();
    }

    pub(crate) fn detach(&mut self) {
        self.node = None;
        self.state = self.state.on_detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_moves_forward_only() {
        let s = SurfaceState::Detached;
        assert!(!s.is_renderable());

        let s = s.on_attach();
        assert_eq!(s, SurfaceState::Active);
        assert!(s.is_renderable());

        let s = s.on_detach();
        assert_eq!(s, SurfaceState::Detached);

        let s = s.on_attach().on_destroy();
        assert_eq!(s, SurfaceState::Destroyed);
    }

    #[test]
    fn destroyed_is_terminal() {
        let s = SurfaceState::Destroyed;
        assert_eq!(s.on_attach(), SurfaceState::Destroyed);
        assert_eq!(s.on_detach(), SurfaceState::Destroyed);
        assert!(!s.is_renderable());
    }
}
