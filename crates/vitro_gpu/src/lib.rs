//! Vitro GPU renderer
//!
//! The rendering engine behind a liquid-glass surface: an explicitly
//! constructed GPU context holding the single shared shading pipeline, a
//! zero-copy frame bridge for CPU-rasterized backdrop captures, a blocking
//! separable Gaussian blur pass, and the per-surface draw machinery.
//!
//! One [`GpuContext`] serves the whole process; every surface shares its
//! pipelines and owns only its own buffers and textures.

mod blur;
mod bridge;
mod context;
mod error;
mod renderer;
pub mod shaders;
mod uniforms;

pub use blur::BlurPass;
pub use bridge::{ZeroCopyBridge, BRIDGE_FORMAT};
pub use context::{ContextConfig, GpuContext};
pub use error::{BridgeError, RendererError};
pub use renderer::GlassPass;
pub use uniforms::{ShaderUniforms, SurfaceGeometry, MAX_RECTANGLES};
