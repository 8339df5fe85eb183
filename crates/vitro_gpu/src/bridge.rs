//! Zero-copy frame bridge
//!
//! Owns one CPU-writable, GPU-readable pixel allocation per surface: a
//! persistently reusable `MAP_WRITE` staging buffer whose mapped bytes the
//! host rasterizes into directly, and the texture the shading pass samples.
//! The CPU never copies pixels; the only transfer is the GPU-internal
//! buffer-to-texture blit issued after unmap, which plays the role of the
//! cache flush in a shared-memory texture alias.
//!
//! Concurrency contract: single writer. `render_into` takes `&mut self`,
//! so a second writer cannot exist while a write is in flight.

use std::sync::mpsc;

use tracing::debug;
use vitro_core::Canvas;

use crate::context::GpuContext;
use crate::error::BridgeError;

/// Pixel format of every bridge texture. tiny-skia rasterizes
/// premultiplied RGBA, which lands in this format byte-for-byte.
pub const BRIDGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct FrameAlloc {
    width: u32,
    height: u32,
    /// Row pitch in bytes, padded to the copy alignment (256).
    bytes_per_row: u32,
    staging: wgpu::Buffer,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// CPU/GPU shared frame storage for one glass surface.
pub struct ZeroCopyBridge {
    frame: Option<FrameAlloc>,
    /// Bumped on every reallocation so draw-side bind group caches know
    /// when the texture view they hold went stale.
    generation: u64,
}

impl ZeroCopyBridge {
    pub fn new() -> Self {
        Self {
            frame: None,
            generation: 0,
        }
    }

    /// Calculate padded bytes per row (must be a multiple of 256 for wgpu).
    fn padded_bytes_per_row(width: u32) -> u32 {
        let unpadded = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        unpadded.div_ceil(align) * align
    }

    /// (Re)allocate the backing buffer and texture for the given size in
    /// device pixels. A no-op when the dimensions already match.
    pub fn resize(&mut self, ctx: &GpuContext, width: u32, height: u32) -> Result<(), BridgeError> {
        if let Some(frame) = &self.frame {
            if frame.width == width && frame.height == height {
                return Ok(());
            }
        }

        if width == 0 || height == 0 {
            return Err(BridgeError::Allocation {
                width,
                height,
                reason: "zero-sized capture area".into(),
            });
        }

        let max_dim = ctx.device().limits().max_texture_dimension_2d;
        if width > max_dim || height > max_dim {
            return Err(BridgeError::Allocation {
                width,
                height,
                reason: format!("exceeds device texture limit {max_dim}"),
            });
        }

        let bytes_per_row = Self::padded_bytes_per_row(width);
        let staging = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Vitro Backdrop Staging Buffer"),
            size: bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Vitro Backdrop Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: BRIDGE_FORMAT,
            // COPY_SRC keeps the capture readable for snapshot tooling.
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        debug!(width, height, bytes_per_row, "bridge reallocated");
        self.frame = Some(FrameAlloc {
            width,
            height,
            bytes_per_row,
            staging,
            texture,
            view,
        });
        self.generation += 1;
        Ok(())
    }

    /// Map the staging memory, hand the callback a canvas aliasing it,
    /// then unmap, blit into the texture, and submit.
    ///
    /// The canvas is as tall as the capture but its rows carry the padded
    /// pitch, so it is `bytes_per_row / 4` pixels wide; columns beyond the
    /// logical width are never sampled by the shader.
    pub fn render_into(
        &mut self,
        ctx: &GpuContext,
        draw: impl FnOnce(&mut Canvas<'_>),
    ) -> Result<&wgpu::TextureView, BridgeError> {
        let frame = self.frame.as_ref().ok_or(BridgeError::NotAllocated)?;

        let slice = frame.staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Write, move |result| {
            let _ = sender.send(result);
        });
        ctx.device().poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| BridgeError::Map("map callback dropped".into()))?
            .map_err(|e| BridgeError::Map(e.to_string()))?;

        {
            let mut mapped = slice.get_mapped_range_mut();
            let padded_width = frame.bytes_per_row / 4;
            let mut canvas = Canvas::from_bytes(&mut mapped, padded_width, frame.height)
                .ok_or_else(|| BridgeError::Map("mapped range has unexpected length".into()))?;
            draw(&mut canvas);
        }
        frame.staging.unmap();

        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Vitro Bridge Blit Encoder"),
            });
        encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &frame.staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(frame.bytes_per_row),
                    rows_per_image: Some(frame.height),
                },
            },
            wgpu::ImageCopyTexture {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: frame.width,
                height: frame.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.queue().submit(std::iter::once(encoder.finish()));

        Ok(&frame.view)
    }

    /// The texture view of the last successful allocation, if any.
    pub fn texture_view(&self) -> Option<&wgpu::TextureView> {
        self.frame.as_ref().map(|f| &f.view)
    }

    /// The backing texture itself, for snapshot readback.
    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.frame.as_ref().map(|f| &f.texture)
    }

    /// Size of the current allocation in device pixels.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(|f| (f.width, f.height))
    }

    pub fn is_allocated(&self) -> bool {
        self.frame.is_some()
    }

    /// Monotonic counter identifying the current allocation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ZeroCopyBridge {
    fn default() -> Self {
        Self::new()
    }
}
