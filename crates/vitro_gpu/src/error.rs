//! Renderer error taxonomy
//!
//! Two tiers, matching the failure policy of the frame loop:
//!
//! - [`RendererError`]: fatal at startup (no adapter, no device, shader
//!   rejected). No degraded renderer is offered past construction.
//! - [`BridgeError`]: recoverable per frame. The caller drops the frame's
//!   capture, keeps the previously presented image, and retries on the
//!   next refresh.

use thiserror::Error;

/// Fatal initialization failures.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("glass pipeline rejected by device: {0}")]
    Pipeline(String),
}

/// Per-frame recoverable failures in the zero-copy frame bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backdrop buffer not allocated; resize the bridge first")]
    NotAllocated,

    #[error("cannot allocate {width}x{height} backdrop buffer: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("failed to map backdrop staging buffer: {0}")]
    Map(String),
}
