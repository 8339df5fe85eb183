//! Surface registry and frame orchestration
//!
//! [`GlassHost`] owns every glass surface in a window and drives the
//! per-frame sequence for each: recompose uniforms, capture the backdrop
//! (when auto-capture is on), blur it, upload, draw. Handles are slotmap
//! keys, so a destroyed surface's id can never alias a new one and stale
//! ids degrade to no-ops.
//!
//! Anything that goes wrong mid-frame for one surface drops that
//! surface's frame and moves on; the previous presented pixels stay on
//! screen and the next frame retries.

use std::sync::Arc;

use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, info};
use vitro_core::{BackdropScene, ColorScheme, GlassStyle, Point, Rect, SceneNode};
use vitro_gpu::{GpuContext, ShaderUniforms, SurfaceGeometry};

use crate::capture::{detect_strategy, BackdropSource, CaptureError};
use crate::surface::{GlassSurface, DEFAULT_CONTAINER_SPACING};

slotmap::new_key_type! {
    /// Generational handle to a glass surface.
    pub struct SurfaceId;
}

/// Registry and frame driver for every glass surface sharing one GPU
/// context.
///
/// All methods taking a [`SurfaceId`] are no-ops for stale ids.
pub struct GlassHost {
    ctx: Arc<GpuContext>,
    surfaces: SlotMap<SurfaceId, GlassSurface>,
    strategy: Box<dyn BackdropSource>,
    scheme: ColorScheme,
}

impl GlassHost {
    /// Create a host for a scene, resolving the capture strategy once.
    pub fn new(ctx: Arc<GpuContext>, scene: &dyn BackdropScene) -> Self {
        let strategy = detect_strategy(scene);
        info!(strategy = strategy.name(), "glass host created");
        Self {
            ctx,
            surfaces: SlotMap::with_key(),
            strategy,
            scheme: ColorScheme::default(),
        }
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }

    /// Appearance used to resolve adaptive tints, fed by the host UI.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn create_surface(&mut self, style: GlassStyle) -> SurfaceId {
        self.surfaces.insert(GlassSurface::new(&self.ctx, style))
    }

    /// Bind a surface to the scene element whose backdrop it shades.
    pub fn attach(&mut self, id: SurfaceId, node: SceneNode) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.attach(node);
        }
    }

    pub fn detach(&mut self, id: SurfaceId) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.detach();
        }
    }

    /// Update bounds, corner shape, and device scale from host layout.
    /// Read fresh every frame on the host side; never cached here beyond
    /// the frame.
    pub fn update_geometry(&mut self, id: SurfaceId, geometry: SurfaceGeometry, device_scale: f32) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.geometry = geometry;
            surface.device_scale = device_scale;
        }
    }

    pub fn update_touch_point(&mut self, id: SurfaceId, touch: Option<Point>) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.touch_point = touch;
        }
    }

    /// Replace the merged shape group. More than one rect switches the
    /// merge falloff to the container spacing unless one was set
    /// explicitly.
    pub fn set_merged_rectangles(&mut self, id: SurfaceId, rects: &[Rect]) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.merged_rects = SmallVec::from_slice(rects);
            if rects.len() > 1 {
                surface.merge_smoothness = DEFAULT_CONTAINER_SPACING;
            }
        }
    }

    /// Distance in points at which grouped shapes begin to blend.
    pub fn set_merge_spacing(&mut self, id: SurfaceId, spacing: f32) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.merge_smoothness = spacing.max(0.0);
        }
    }

    /// When off, the bridge keeps whatever [`capture_backdrop`]
    /// (or an earlier auto capture) last put in it.
    ///
    /// [`capture_backdrop`]: GlassHost::capture_backdrop
    pub fn set_auto_capture(&mut self, id: SurfaceId, auto: bool) {
        if let Some(surface) = self.surfaces.get_mut(id) {
            surface.auto_capture = auto;
        }
    }

    /// Destroy a surface and free its GPU resources. The id goes stale
    /// immediately; any in-flight frame for it is simply dropped.
    pub fn destroy_surface(&mut self, id: SurfaceId) {
        if let Some(mut surface) = self.surfaces.remove(id) {
            surface.state = surface.state.on_destroy();
        }
    }

    /// Manually capture (and blur) the backdrop of one surface, for
    /// hosts driving capture themselves with auto-capture off.
    pub fn capture_backdrop(&mut self, id: SurfaceId, scene: &dyn BackdropScene) {
        let Some(surface) = self.surfaces.get_mut(id) else {
            return;
        };
        Self::capture_and_blur(&self.ctx, self.strategy.as_mut(), surface, scene);
    }

    fn capture_and_blur(
        ctx: &GpuContext,
        strategy: &mut dyn BackdropSource,
        surface: &mut GlassSurface,
        scene: &dyn BackdropScene,
    ) -> bool {
        let Some(node) = surface.node else {
            return false;
        };
        match strategy.capture(
            ctx,
            &mut surface.bridge,
            scene,
            node,
            &surface.style,
            surface.device_scale,
        ) {
            Ok(()) => {
                let sigma = surface.style.backdrop_blur_radius * surface.device_scale;
                surface.blur.run(ctx, &surface.bridge, sigma);
                true
            }
            Err(CaptureError::Detached) => {
                debug!("capture skipped: element detached");
                false
            }
            Err(err) => {
                debug!(error = %err, "capture skipped");
                false
            }
        }
    }

    /// Render one surface into `target` following the frame sequence:
    /// compose uniforms, capture + blur (if auto), upload, draw.
    ///
    /// Frames that cannot complete are dropped silently; previous target
    /// contents are preserved.
    pub fn render_surface(
        &mut self,
        id: SurfaceId,
        scene: &dyn BackdropScene,
        target: &wgpu::TextureView,
    ) {
        let Some(surface) = self.surfaces.get_mut(id) else {
            return;
        };
        if !surface.state.is_renderable() {
            return;
        }

        let uniforms = ShaderUniforms::compose(
            &surface.style,
            surface.geometry,
            surface.device_scale,
            surface.touch_point,
            surface.merge_smoothness,
            &surface.merged_rects,
            self.scheme,
        );

        if surface.auto_capture {
            Self::capture_and_blur(&self.ctx, self.strategy.as_mut(), surface, scene);
        }
        // A capture miss with an older capture still in the bridge draws
        // stale pixels; with nothing captured yet the draw is skipped
        // inside the pass.
        surface.pass.upload(&self.ctx, &uniforms);
        surface.pass.draw(&self.ctx, &surface.bridge, target);
    }

    /// Render every active surface. `target_for` maps each surface to
    /// its destination view; `None` skips that surface this frame.
    pub fn render_frame<F>(&mut self, scene: &dyn BackdropScene, mut target_for: F)
    where
        F: FnMut(SurfaceId) -> Option<wgpu::TextureView>,
    {
        let ids: Vec<SurfaceId> = self.surfaces.keys().collect();
        for id in ids {
            if let Some(target) = target_for(id) {
                self.render_surface(id, scene, &target);
            }
        }
    }

    /// Geometry last fed to a surface, if it still exists.
    pub fn geometry(&self, id: SurfaceId) -> Option<SurfaceGeometry> {
        self.surfaces.get(id).map(|s| s.geometry)
    }

    /// Whether the host should draw a drop shadow under this surface.
    pub fn wants_shadow_overlay(&self, id: SurfaceId) -> bool {
        self.surfaces
            .get(id)
            .map(|s| s.style.shadow_overlay)
            .unwrap_or(false)
    }
}
