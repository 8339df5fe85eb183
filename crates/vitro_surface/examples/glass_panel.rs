//! Headless demo: renders a glass panel over a painted backdrop and
//! writes the result to `glass_panel.png`.
//!
//! Run with `cargo run --example glass_panel -p vitro_surface`.

use anyhow::{Context as _, Result};
use vitro_core::{
    tiny_skia, BackdropScene, Canvas, CaptureTransform, GlassStyle, Rect, SceneNode,
};
use vitro_gpu::{ContextConfig, GpuContext, SurfaceGeometry};
use vitro_surface::GlassHost;

const VIEW_W: f32 = 320.0;
const VIEW_H: f32 = 200.0;
const SCALE: f32 = 2.0;

/// A colorful backdrop: diagonal gradient with scattered circles.
struct DemoScene;

impl BackdropScene for DemoScene {
    fn root_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, VIEW_W, VIEW_H)
    }

    fn presented_frame(&self, node: SceneNode) -> Option<Rect> {
        // One element: the glass panel, centered.
        (node == SceneNode(1)).then(|| Rect::new(80.0, 50.0, 160.0, 100.0))
    }

    fn draw_root(&self, canvas: &mut Canvas<'_>, transform: CaptureTransform, _hidden: SceneNode) {
        let ts = transform.to_tiny_skia();
        let mut paint = tiny_skia::Paint::default();
        paint.shader = tiny_skia::LinearGradient::new(
            tiny_skia::Point::from_xy(0.0, 0.0),
            tiny_skia::Point::from_xy(VIEW_W, VIEW_H),
            vec![
                tiny_skia::GradientStop::new(0.0, tiny_skia::Color::from_rgba8(30, 60, 180, 255)),
                tiny_skia::GradientStop::new(1.0, tiny_skia::Color::from_rgba8(220, 80, 40, 255)),
            ],
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
        .expect("valid gradient");
        canvas.fill_rect(
            tiny_skia::Rect::from_xywh(0.0, 0.0, VIEW_W, VIEW_H).expect("valid rect"),
            &paint,
            ts,
            None,
        );

        let mut dot = tiny_skia::Paint::default();
        dot.set_color_rgba8(250, 240, 200, 255);
        dot.anti_alias = true;
        for (cx, cy, r) in [(60.0, 40.0, 22.0), (150.0, 140.0, 30.0), (260.0, 70.0, 18.0)] {
            let path = tiny_skia::PathBuilder::from_circle(cx, cy, r).expect("valid circle");
            canvas.fill_path(&path, &dot, tiny_skia::FillRule::Winding, ts, None);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let ctx = GpuContext::new_blocking(ContextConfig::default())?;
    let scene = DemoScene;
    let mut host = GlassHost::new(ctx.clone(), &scene);

    let panel = host.create_surface(GlassStyle::regular());
    host.attach(panel, SceneNode(1));
    host.update_geometry(
        panel,
        SurfaceGeometry {
            bounds: Rect::new(0.0, 0.0, 160.0, 100.0),
            corner_radius: 28.0,
            corner_curve: vitro_core::CornerCurve::Continuous,
        },
        SCALE,
    );

    let (width, height) = ((VIEW_W * SCALE) as u32, (VIEW_H * SCALE) as u32);
    let target = create_target(&ctx, width, height);
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    paint_backdrop(&ctx, &scene, &target, width, height)?;
    host.render_surface(panel, &scene, &target_view);
    ctx.device().poll(wgpu::Maintain::Wait);

    let pixels = read_back(&ctx, &target, width, height);
    image::RgbaImage::from_raw(width, height, pixels)
        .context("pixel buffer size mismatch")?
        .save("glass_panel.png")?;
    println!("wrote glass_panel.png ({width}x{height})");
    Ok(())
}

fn create_target(ctx: &GpuContext, width: u32, height: u32) -> wgpu::Texture {
    ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("Demo Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.target_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Rasterize the scene on the CPU and upload it as the target's base
/// layer, standing in for the window content a real host would already
/// have on screen.
fn paint_backdrop(
    ctx: &GpuContext,
    scene: &DemoScene,
    target: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<()> {
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).context("backdrop pixmap allocation")?;
    let full = CaptureTransform::for_region(scene.root_bounds(), SCALE);
    scene.draw_root(&mut pixmap.as_mut(), full, SceneNode(0));

    ctx.queue().write_texture(
        wgpu::ImageCopyTexture {
            texture: target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixmap.data(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    Ok(())
}

fn read_back(ctx: &GpuContext, texture: &wgpu::Texture, width: u32, height: u32) -> Vec<u8> {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_row = (width * 4).div_ceil(align) * align;
    let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("Demo Readback Buffer"),
        size: padded_row as u64 * height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue().submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |r| {
        let _ = sender.send(r);
    });
    ctx.device().poll(wgpu::Maintain::Wait);
    receiver.recv().expect("map callback").expect("map readback");

    let mapped = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for row in 0..height {
        let start = (row * padded_row) as usize;
        pixels.extend_from_slice(&mapped[start..start + (width * 4) as usize]);
    }
    drop(mapped);
    buffer.unmap();
    pixels
}
