//! Lighting pass: shade the frame once per pixel from the G-buffer channels
//! via the full-screen quad.

use glam::Vec3;
use wgpu::CommandEncoder;

use crate::fullscreen::{self, FullscreenQuad};
use crate::targets::GBuffer;

const LIGHTING_SHADER: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/lighting.wgsl"));

/// Point light shading the deferred scene.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct LightUniform {
    light_pos: [f32; 3],
    _pad0: f32,
    view_pos: [f32; 3],
    _pad1: f32,
    light_color: [f32; 3],
    _pad2: f32,
}

impl LightUniform {
    pub(crate) fn new(light: &PointLight, view_pos: Vec3) -> Self {
        Self {
            light_pos: light.position.to_array(),
            _pad0: 0.0,
            view_pos: view_pos.to_array(),
            _pad1: 0.0,
            light_color: light.color.to_array(),
            _pad2: 0.0,
        }
    }
}

pub(crate) const LIGHT_UNIFORM_SIZE: u64 = std::mem::size_of::<LightUniform>() as u64;

pub struct LightingPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    light_buf: wgpu::Buffer,
}

impl LightingPass {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Result<Self, String> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lighting_shader"),
            source: wgpu::ShaderSource::Wgsl(LIGHTING_SHADER.into()),
        });

        // G-buffer texels map 1:1 to output pixels; nearest sampling matches
        // the geometry pass exactly.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lighting_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Fixed sampler slots: position -> 0, normal -> 1, albedo/spec -> 2.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lighting_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lighting_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lighting_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[fullscreen::vertex_layout()],
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
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let light_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting_uniform"),
            size: LIGHT_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self { pipeline, bind_group_layout, sampler, light_buf })
    }

    /// Shade the whole surface from the G-buffer. The surface color is
    /// cleared here; every pixel is then overwritten by the quad anyway.
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        gbuffer: &GBuffer,
        quad: &FullscreenQuad,
        output_view: &wgpu::TextureView,
        light: &PointLight,
        view_pos: Vec3,
        clear_color: wgpu::Color,
    ) -> Result<(), String> {
        let uniform = LightUniform::new(light, view_pos);
        queue.write_buffer(&self.light_buf, 0, bytemuck::bytes_of(&uniform));

        let position_view = gbuffer.position_view();
        let normal_view = gbuffer.normal_view();
        let albedo_spec_view = gbuffer.albedo_spec_view();
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lighting_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&position_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&albedo_spec_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry { binding: 4, resource: self.light_buf.as_entire_binding() },
            ],
        });

        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lighting_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rp.set_pipeline(&self.pipeline);
        rp.set_bind_group(0, &bind_group, &[]);
        quad.draw(&mut rp);
        drop(rp);
        Ok(())
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_uniform_matches_wgsl_layout() {
        // Three vec3 fields at 16-byte alignment: offsets 0/16/32, size 48.
        assert_eq!(LIGHT_UNIFORM_SIZE, 48);
        let light = PointLight { position: Vec3::new(1.2, 1.0, 2.0), color: Vec3::ONE };
        let uniform = LightUniform::new(&light, Vec3::new(0.0, 0.0, 5.0));
        let bytes = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 48);
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(&floats[0..3], &[1.2, 1.0, 2.0]);
        assert_eq!(&floats[4..7], &[0.0, 0.0, 5.0]);
        assert_eq!(&floats[8..11], &[1.0, 1.0, 1.0]);
    }
}
