//! Vitro core types
//!
//! Pure-data foundation for the liquid-glass renderer: geometry, colors,
//! style presets, and the contracts a host UI layer implements so the
//! renderer can capture what sits behind a glass surface.
//!
//! Nothing in this crate touches the GPU.

mod color;
mod geometry;
mod scene;
mod style;

pub use color::{AdaptiveColor, Color, ColorScheme};
pub use geometry::{CornerCurve, Point, Rect, Size};
pub use scene::{BackdropScene, Canvas, CaptureTransform, CompositedSnapshot, SceneNode};
pub use style::{GlassShading, GlassStyle};

// Hosts paint capture content through the same raster API the canvas wraps.
pub use tiny_skia;
