//! Marker pass: depth-tested flat-color overlay marking the light position.

use glam::{Mat4, Vec3};
use wgpu::CommandEncoder;

use crate::camera::FrameTransforms;
use crate::geometry_pass::{MeshDraw, VERTEX_STRIDE};
use crate::lighting_pass::PointLight;
use crate::targets;

const MARKER_SHADER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/marker.wgsl"));

/// The marker cube is the scene cube shrunk to a fifth of its size.
pub const MARKER_SCALE: f32 = 0.2;

/// Reuses the stride-32 mesh buffer but reads only the position attribute.
const MARKER_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: wgpu::VertexFormat::Float32x3,
}];

pub struct MarkerPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    view_proj_buf: wgpu::Buffer,
    model_buf: wgpu::Buffer,
    color_buf: wgpu::Buffer,
}

impl MarkerPass {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Result<Self, String> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(MARKER_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("marker_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX, 64),
                uniform_entry(1, wgpu::ShaderStages::VERTEX, 64),
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT, 16),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marker_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marker_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &MARKER_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: output_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: targets::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buf = |label, size| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let view_proj_buf = uniform_buf("marker_view_proj", 64);
        let model_buf = uniform_buf("marker_model", 64);
        let color_buf = uniform_buf("marker_color", 16);

        Ok(Self { pipeline, bind_group_layout, view_proj_buf, model_buf, color_buf })
    }

    /// Draw the marker against the already-transferred scene depth
    /// (`LoadOp::Load` on both color and depth).
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        mesh: &MeshDraw,
        transforms: &FrameTransforms,
        light: &PointLight,
    ) -> Result<(), String> {
        let view_proj = transforms.view_proj().to_cols_array();
        queue.write_buffer(&self.view_proj_buf, 0, bytemuck::cast_slice(&view_proj));
        let model = (Mat4::from_translation(light.position)
            * Mat4::from_scale(Vec3::splat(MARKER_SCALE)))
        .to_cols_array();
        queue.write_buffer(&self.model_buf, 0, bytemuck::cast_slice(&model));
        let color = [light.color.x, light.color.y, light.color.z, 1.0f32];
        queue.write_buffer(&self.color_buf, 0, bytemuck::cast_slice(&color));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("marker_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: self.view_proj_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: self.model_buf.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: self.color_buf.as_entire_binding() },
            ],
        });

        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("marker_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rp.set_pipeline(&self.pipeline);
        rp.set_bind_group(0, &bind_group, &[]);
        rp.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
        rp.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        rp.draw_indexed(0..mesh.index_count, 0, 0..1);
        drop(rp);
        Ok(())
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    min_size: u64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: std::num::NonZeroU64::new(min_size),
        },
        count: None,
    }
}
