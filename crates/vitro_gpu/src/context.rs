//! Process-wide GPU context
//!
//! One [`GpuContext`] is constructed explicitly at startup and shared by
//! reference with every glass surface. It owns the device, queue, and the
//! single compiled glass pipeline (plus the blur pipeline), so pipeline
//! compilation happens exactly once no matter how many surfaces exist.
//!
//! Construction is the only fatal path in the renderer: without a device
//! and a valid pipeline there is nothing useful to offer, so `new` returns
//! an error instead of a degraded context.

use std::sync::Arc;

use tracing::info;

use crate::bridge::BRIDGE_FORMAT;
use crate::error::RendererError;
use crate::shaders::{BLUR_SHADER, GLASS_SHADER};

/// Configuration for creating a [`GpuContext`].
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Format of the target views glass surfaces are drawn into.
    pub target_format: wgpu::TextureFormat,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            target_format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Shared GPU state: device, queue, and the compiled pipelines.
///
/// Read-only after construction; clone the `Arc` it is handed out in.
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    target_format: wgpu::TextureFormat,

    glass_pipeline: wgpu::RenderPipeline,
    glass_bind_group_layout: wgpu::BindGroupLayout,
    backdrop_sampler: wgpu::Sampler,

    blur_pipeline: wgpu::RenderPipeline,
    blur_bind_group_layout: wgpu::BindGroupLayout,
    blur_sampler: wgpu::Sampler,
}

impl GpuContext {
    fn preferred_backends() -> wgpu::Backends {
        #[cfg(target_os = "macos")]
        {
            wgpu::Backends::METAL
        }
        #[cfg(not(target_os = "macos"))]
        {
            wgpu::Backends::PRIMARY
        }
    }

    /// Create the context, acquiring an adapter and device and compiling
    /// the glass and blur pipelines.
    pub async fn new(config: ContextConfig) -> Result<Arc<Self>, RendererError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: Self::preferred_backends(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::AdapterNotFound)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Vitro GPU Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        info!(adapter = %adapter.get_info().name, "vitro GPU context initialized");

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        // Shader rejection must surface as an error, not a panic; an error
        // scope catches validation failures from module and pipeline
        // creation.
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let glass_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vitro Glass Shader"),
            source: wgpu::ShaderSource::Wgsl(GLASS_SHADER.into()),
        });

        let glass_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Vitro Glass Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let glass_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Vitro Glass Pipeline Layout"),
                bind_group_layouts: &[&glass_bind_group_layout],
                push_constant_ranges: &[],
            });

        let glass_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Vitro Glass Pipeline"),
            layout: Some(&glass_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &glass_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &glass_shader,
                entry_point: Some("fs_liquid_glass"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let blur_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Vitro Blur Shader"),
            source: wgpu::ShaderSource::Wgsl(BLUR_SHADER.into()),
        });

        let blur_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Vitro Blur Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let blur_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Vitro Blur Pipeline Layout"),
                bind_group_layouts: &[&blur_bind_group_layout],
                push_constant_ranges: &[],
            });

        let blur_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Vitro Blur Pipeline"),
            layout: Some(&blur_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blur_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &blur_shader,
                entry_point: Some("fs_blur"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: BRIDGE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(RendererError::Pipeline(err.to_string()));
        }

        let backdrop_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Vitro Backdrop Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let blur_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Vitro Blur Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Arc::new(Self {
            device,
            queue,
            target_format: config.target_format,
            glass_pipeline,
            glass_bind_group_layout,
            backdrop_sampler,
            blur_pipeline,
            blur_bind_group_layout,
            blur_sampler,
        }))
    }

    /// Blocking constructor for hosts without an async entry point.
    pub fn new_blocking(config: ContextConfig) -> Result<Arc<Self>, RendererError> {
        pollster::block_on(Self::new(config))
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    pub(crate) fn glass_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.glass_pipeline
    }

    pub(crate) fn glass_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.glass_bind_group_layout
    }

    pub(crate) fn backdrop_sampler(&self) -> &wgpu::Sampler {
        &self.backdrop_sampler
    }

    pub(crate) fn blur_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.blur_pipeline
    }

    pub(crate) fn blur_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.blur_bind_group_layout
    }

    pub(crate) fn blur_sampler(&self) -> &wgpu::Sampler {
        &self.blur_sampler
    }
}
