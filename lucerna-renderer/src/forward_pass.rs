//! Forward pass: single-pass shading for the non-deferred tutorial variants.
//! One shader module, two fragment entry points chosen at pipeline creation.

use glam::Vec3;
use wgpu::CommandEncoder;

use crate::camera::FrameTransforms;
use crate::geometry_pass::{mesh_vertex_layout, MeshDraw};
use crate::lighting_pass::{LightUniform, PointLight, LIGHT_UNIFORM_SIZE};
use crate::targets;

const FORWARD_SHADER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/forward.wgsl"));

/// Shading model of a forward pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ForwardShading {
    /// Per-fragment Blinn-Phong with the point light.
    Lit,
    /// Plain textured output, no lighting.
    Unlit,
}

impl ForwardShading {
    fn entry_point(self) -> &'static str {
        match self {
            ForwardShading::Lit => "fs_lit",
            ForwardShading::Unlit => "fs_unlit",
        }
    }
}

pub struct ForwardPass {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    view_proj_buf: wgpu::Buffer,
    light_buf: wgpu::Buffer,
    sampler: wgpu::Sampler,
}

impl ForwardPass {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        shading: ForwardShading,
    ) -> Result<Self, String> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("forward_shader"),
            source: wgpu::ShaderSource::Wgsl(FORWARD_SHADER.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("forward_uniform_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(LIGHT_UNIFORM_SIZE),
                    },
                    count: None,
                },
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("forward_material_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("forward_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("forward_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[mesh_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(shading.entry_point()),
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
        let view_proj_buf = uniform_buf("forward_view_proj", 64);
        let light_buf = uniform_buf("forward_light", LIGHT_UNIFORM_SIZE);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("forward_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self { pipeline, uniform_layout, material_layout, view_proj_buf, light_buf, sampler })
    }

    /// Clear the surface and depth, then draw `meshes` in one lit (or unlit)
    /// pass.
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        meshes: &[MeshDraw],
        transforms: &FrameTransforms,
        light: &PointLight,
        view_pos: Vec3,
        clear_color: wgpu::Color,
    ) -> Result<(), String> {
        let view_proj = transforms.view_proj().to_cols_array();
        queue.write_buffer(&self.view_proj_buf, 0, bytemuck::cast_slice(&view_proj));
        let uniform = LightUniform::new(light, view_pos);
        queue.write_buffer(&self.light_buf, 0, bytemuck::bytes_of(&uniform));

        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("forward_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rp.set_pipeline(&self.pipeline);

        for mesh in meshes {
            let model = mesh.transform.to_cols_array();
            let model_buf = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("forward_model"),
                size: 64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&model_buf, 0, bytemuck::cast_slice(&model));
            let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("forward_uniform_group"),
                layout: &self.uniform_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.view_proj_buf.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry { binding: 1, resource: model_buf.as_entire_binding() },
                    wgpu::BindGroupEntry { binding: 2, resource: self.light_buf.as_entire_binding() },
                ],
            });
            let material_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("forward_material_group"),
                layout: &self.material_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&mesh.diffuse),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            rp.set_bind_group(0, &uniform_group, &[]);
            rp.set_bind_group(1, &material_group, &[]);
            rp.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
            rp.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            rp.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
        drop(rp);
        Ok(())
    }
}
