//! Offscreen wgpu renderer
//!
//! Composed frames are uploaded as vertex-colored triangles and drawn into a
//! render-target texture of the viewport size. There is no depth buffer; the
//! compositor already submits triangles back-to-front.

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use super::compositor::Compositor;
use super::surface::VertexSurface;
use super::vertex::Vertex;
use crate::settings::Settings;
use crate::sim::Scene;

/// Render-target format; blending happens in linear space
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Convert a screen pixel position (origin top-left, y down) to NDC
#[inline]
pub fn screen_to_ndc(position: [f32; 2], size: (u32, u32)) -> [f32; 2] {
    let (w, h) = (size.0.max(1) as f32, size.1.max(1) as f32);
    [position[0] / w * 2.0 - 1.0, 1.0 - position[1] / h * 2.0]
}

/// Screen-space triangles mapped into clip space for a viewport of `size`
pub fn to_ndc(vertices: &[Vertex], size: (u32, u32)) -> Vec<Vertex> {
    vertices
        .iter()
        .map(|v| Vertex {
            position: screen_to_ndc(v.position, size),
            color: v.color,
        })
        .collect()
}

fn create_target(device: &wgpu::Device, size: (u32, u32)) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("frame_target"),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// GPU state for drawing composed frames
pub struct RenderState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    target: wgpu::Texture,
    /// Viewport size in pixels
    size: (u32, u32),
    /// Reused every frame
    frame: VertexSurface,
    frames_rendered: u64,
    last_vertex_count: u32,
}

impl RenderState {
    /// Pick an adapter without a window and build the pipeline for a `width` x `height` target
    pub async fn new(width: u32, height: u32) -> Result<Self> {
        let size = (width.max(1), height.max(1));
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter available")?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gc-orbits-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .context("Failed to create device")?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frame_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frame_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let target = create_target(&device, size);
        log::info!("Offscreen target ready: {}x{}", size.0, size.1);

        Ok(Self {
            device,
            queue,
            pipeline,
            target,
            size,
            frame: VertexSurface::new(),
            frames_rendered: 0,
            last_vertex_count: 0,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Triangle vertices submitted by the last frame
    pub fn last_vertex_count(&self) -> u32 {
        self.last_vertex_count
    }

    /// Recreate the target; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 && (width, height) != self.size {
            self.size = (width, height);
            self.target = create_target(&self.device, self.size);
            log::debug!("Offscreen target resized to {}x{}", width, height);
        }
    }

    /// Compose the scene and draw it
    pub fn render_scene(&mut self, scene: &Scene, settings: &Settings) {
        let mut frame = std::mem::take(&mut self.frame);
        frame.clear();
        Compositor::from_settings(settings).draw(scene, &mut frame);
        self.render(frame.vertices(), settings.background);
        self.frame = frame;
    }

    /// Draw screen-space triangles over a cleared background
    pub fn render(&mut self, vertices: &[Vertex], background: [f32; 4]) {
        let ndc = to_ndc(vertices, self.size);
        let vertex_buffer = (!ndc.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("frame_vertices"),
                    contents: bytemuck::cast_slice(&ndc),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let view = self
            .target
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let [r, g, b, a] = background.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..ndc.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.last_vertex_count = ndc.len() as u32;
        self.frames_rendered += 1;
    }
}
