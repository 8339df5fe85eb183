//! Glass shading pass
//!
//! [`GlassPass`] holds the per-surface draw state: the 368-byte uniform
//! buffer and a bind group tying it to the surface's backdrop texture. The
//! pipeline itself is shared and lives on the [`GpuContext`].
//!
//! Draw failures follow the frame-skip policy: the pass logs and returns,
//! leaving whatever the target already held on screen, and the next frame
//! retries from scratch.

use tracing::warn;

use crate::bridge::ZeroCopyBridge;
use crate::context::GpuContext;
use crate::uniforms::ShaderUniforms;

struct CachedBindGroup {
    /// Bridge generation the cached group's texture view belongs to.
    generation: u64,
    bind_group: wgpu::BindGroup,
}

/// Per-surface glass draw state.
pub struct GlassPass {
    uniform_buffer: wgpu::Buffer,
    cached: Option<CachedBindGroup>,
}

impl GlassPass {
    pub fn new(ctx: &GpuContext) -> Self {
        let uniform_buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Vitro Glass Uniform Buffer"),
            size: std::mem::size_of::<ShaderUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            uniform_buffer,
            cached: None,
        }
    }

    /// Push a freshly composed uniform block to the GPU.
    pub fn upload(&self, ctx: &GpuContext, uniforms: &ShaderUniforms) {
        ctx.queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn bind_group_for(&mut self, ctx: &GpuContext, bridge: &ZeroCopyBridge) -> Option<&wgpu::BindGroup> {
        let view = bridge.texture_view()?;
        let generation = bridge.generation();
        let stale = match &self.cached {
            Some(c) => c.generation != generation,
            None => true,
        };
        if stale {
            let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Vitro Glass Bind Group"),
                layout: ctx.glass_bind_group_layout(),
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(ctx.backdrop_sampler()),
                    },
                ],
            });
            self.cached = Some(CachedBindGroup {
                generation,
                bind_group,
            });
        }
        self.cached.as_ref().map(|c| &c.bind_group)
    }

    /// Draw the glass material over `target`, sampling the bridge texture
    /// as backdrop. Existing target contents are preserved; the material
    /// alpha-blends on top.
    ///
    /// A bridge without an allocation skips the frame silently; a rejected
    /// submission logs a warning and skips.
    pub fn draw(
        &mut self,
        ctx: &GpuContext,
        bridge: &ZeroCopyBridge,
        target: &wgpu::TextureView,
    ) {
        let Some(bind_group) = self.bind_group_for(ctx, bridge) else {
            return;
        };

        ctx.device().push_error_scope(wgpu::ErrorFilter::Validation);

        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Vitro Glass Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vitro Glass Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(ctx.glass_pipeline());
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..4, 0..1);
        }
        ctx.queue().submit(std::iter::once(encoder.finish()));

        if let Some(err) = pollster::block_on(ctx.device().pop_error_scope()) {
            warn!(error = %err, "glass pass rejected; skipping frame");
        }
    }
}
