//! Full-screen pass primitive: a clip-space quad for per-pixel passes.

/// Interleaved position (vec3) + texcoord (vec2), triangle-strip order.
/// Texcoords follow wgpu's top-left texture origin, so the top-left corner
/// of clip space samples (0, 0).
const QUAD_VERTICES: [f32; 20] = [
    -1.0, 1.0, 0.0, 0.0, 0.0, // top left
    -1.0, -1.0, 0.0, 0.0, 1.0, // bottom left
    1.0, 1.0, 0.0, 1.0, 0.0, // top right
    1.0, -1.0, 0.0, 1.0, 1.0, // bottom right
];

const QUAD_STRIDE: u64 = 20;

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 12,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Vertex layout shared with any pipeline that draws the quad.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: QUAD_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRIBUTES,
    }
}

/// Screen-covering quad. Created once during renderer setup; `draw` issues a
/// 4-vertex triangle strip covering the viewport.
pub struct FullscreenQuad {
    vertex_buf: wgpu::Buffer,
}

impl FullscreenQuad {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let vertex_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fullscreen_quad_vertices"),
            size: std::mem::size_of_val(&QUAD_VERTICES) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buf, 0, bytemuck::cast_slice(&QUAD_VERTICES));
        Self { vertex_buf }
    }

    pub fn draw(&self, rp: &mut wgpu::RenderPass<'_>) {
        rp.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rp.draw(0..4, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_full_clip_space() {
        let corners: Vec<(f32, f32)> = QUAD_VERTICES
            .chunks(QUAD_STRIDE as usize / 4)
            .map(|v| (v[0], v[1]))
            .collect();
        for expected in [(-1.0, 1.0), (-1.0, -1.0), (1.0, 1.0), (1.0, -1.0)] {
            assert!(corners.contains(&expected), "missing corner {:?}", expected);
        }
    }

    #[test]
    fn texcoords_use_top_left_origin() {
        let vertices: Vec<&[f32]> = QUAD_VERTICES.chunks(5).collect();
        for v in vertices {
            let expected_u = if v[0] < 0.0 { 0.0 } else { 1.0 };
            // Clip-space +1 is the top of the screen; texel row 0 is the top
            // of the texture.
            let expected_v = if v[1] > 0.0 { 0.0 } else { 1.0 };
            assert_eq!(v[3], expected_u);
            assert_eq!(v[4], expected_v);
        }
    }

    #[test]
    fn layout_matches_interleaved_stride() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, QUAD_STRIDE);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(QUAD_VERTICES.len() * 4, (QUAD_STRIDE * 4) as usize);
    }
}
