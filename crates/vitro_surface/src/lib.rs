//! Glass surface host layer
//!
//! The externally visible unit of the renderer: [`GlassSurface`] holds the
//! per-surface state and GPU resources, [`GlassHost`] is the registry the
//! embedding UI drives through generational [`SurfaceId`] handles, and the
//! capture module picks how backdrop pixels are obtained from the host's
//! scene.
//!
//! A typical embedding creates one [`GlassHost`] per window, forwards
//! geometry/touch updates into it, and calls
//! [`GlassHost::render_frame`] from its refresh callback.

mod capture;
mod host;
mod surface;

pub use capture::{detect_strategy, BackdropSource, CaptureError, HierarchyCapture, ProbeCapture};
pub use host::{GlassHost, SurfaceId};
pub use surface::{SurfaceState, DEFAULT_CONTAINER_SPACING, DEFAULT_MERGE_SMOOTHNESS};
