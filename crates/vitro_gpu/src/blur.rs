//! Backdrop blur pass
//!
//! Separable Gaussian blur applied in place to a bridge texture before the
//! shading pass samples it: horizontal into a scratch texture, vertical
//! back into the source. The call blocks until the GPU finishes, so the
//! shading pass can never observe a half-blurred frame.
//!
//! Failure policy is degradation, not propagation: if the device rejects
//! the pass, the unblurred capture is presented and a warning logged.

use tracing::warn;

use crate::bridge::{ZeroCopyBridge, BRIDGE_FORMAT};
use crate::context::GpuContext;

/// Cap on taps per side; radii needing more get a proportionally reduced
/// sigma instead of an asymmetrically truncated kernel.
const MAX_TAPS: i32 = 64;

/// Uniform block for one blur direction (matches WGSL `BlurUniforms`).
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurUniforms {
    /// Step between taps in UV space, already oriented along the pass axis.
    texel_step: [f32; 2],
    sigma: f32,
    /// Taps per side; kernel width is `2 * taps + 1`.
    taps: i32,
}

struct Scratch {
    width: u32,
    height: u32,
    view: wgpu::TextureView,
}

/// Reusable blur state for one surface: a scratch texture matching the
/// bridge allocation plus the two per-direction uniform buffers.
pub struct BlurPass {
    scratch: Option<Scratch>,
    horizontal_uniforms: wgpu::Buffer,
    vertical_uniforms: wgpu::Buffer,
}

impl BlurPass {
    pub fn new(ctx: &GpuContext) -> Self {
        let make_buffer = |label| {
            ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<BlurUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        Self {
            scratch: None,
            horizontal_uniforms: make_buffer("Vitro Blur H Uniforms"),
            vertical_uniforms: make_buffer("Vitro Blur V Uniforms"),
        }
    }

    fn ensure_scratch(&mut self, ctx: &GpuContext, width: u32, height: u32) {
        let stale = match &self.scratch {
            Some(s) => s.width != width || s.height != height,
            None => true,
        };
        if stale {
            let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
                label: Some("Vitro Blur Scratch Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: BRIDGE_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            self.scratch = Some(Scratch {
                width,
                height,
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            });
        }
    }

    /// Blur the bridge texture in place with the given sigma in device
    /// pixels. A non-positive sigma leaves the texture untouched.
    ///
    /// Blocks until the GPU has finished both directions.
    pub fn run(&mut self, ctx: &GpuContext, bridge: &ZeroCopyBridge, sigma: f32) {
        if sigma <= 0.0 {
            return;
        }
        let Some((width, height)) = bridge.size() else {
            return;
        };
        let Some(source_view) = bridge.texture_view() else {
            return;
        };

        let ideal_taps = (sigma * 3.0).ceil() as i32;
        let taps = ideal_taps.clamp(1, MAX_TAPS);
        // When capped, shrink sigma so the kernel still sums sensibly.
        let effective_sigma = if ideal_taps > MAX_TAPS {
            sigma * MAX_TAPS as f32 / ideal_taps as f32
        } else {
            sigma
        };

        let horizontal = BlurUniforms {
            texel_step: [1.0 / width as f32, 0.0],
            sigma: effective_sigma,
            taps,
        };
        let vertical = BlurUniforms {
            texel_step: [0.0, 1.0 / height as f32],
            sigma: effective_sigma,
            taps,
        };
        ctx.queue().write_buffer(
            &self.horizontal_uniforms,
            0,
            bytemuck::bytes_of(&horizontal),
        );
        ctx.queue()
            .write_buffer(&self.vertical_uniforms, 0, bytemuck::bytes_of(&vertical));

        self.ensure_scratch(ctx, width, height);
        let Some(scratch) = &self.scratch else {
            return;
        };

        let make_bind_group = |uniforms: &wgpu::Buffer, source: &wgpu::TextureView| {
            ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Vitro Blur Bind Group"),
                layout: ctx.blur_bind_group_layout(),
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniforms.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(ctx.blur_sampler()),
                    },
                ],
            })
        };
        let horizontal_bind = make_bind_group(&self.horizontal_uniforms, source_view);
        let vertical_bind = make_bind_group(&self.vertical_uniforms, &scratch.view);

        // Surface submission errors instead of letting them escalate; a
        // failed blur degrades to the unblurred capture.
        ctx.device().push_error_scope(wgpu::ErrorFilter::Validation);
        ctx.device()
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Vitro Blur Encoder"),
            });

        for (bind_group, target) in [
            (&horizontal_bind, &scratch.view),
            (&vertical_bind, source_view),
        ] {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vitro Blur Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(ctx.blur_pipeline());
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..4, 0..1);
        }

        let submission = ctx.queue().submit(std::iter::once(encoder.finish()));

        let oom = pollster::block_on(ctx.device().pop_error_scope());
        let validation = pollster::block_on(ctx.device().pop_error_scope());
        if let Some(err) = oom.or(validation) {
            warn!(error = %err, "blur pass failed; presenting unblurred backdrop");
            return;
        }

        // The shading pass must not read a half-blurred texture: wait for
        // the submission before returning.
        ctx.device()
            .poll(wgpu::Maintain::WaitForSubmissionIndex(submission));
    }
}
