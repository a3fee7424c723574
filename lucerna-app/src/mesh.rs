//! Tutorial cube geometry and GPU upload.

use std::sync::Arc;

use glam::Mat4;

use lucerna_renderer::MeshDraw;

/// Unit cube centered at the origin: 36 vertices, interleaved
/// position/normal/texcoord (stride 32), one face per 6 vertices.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 288] = [
    // positions          // normals           // texcoords
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,
     0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
     0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0,

    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,
     0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 0.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0,

    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,
    -0.5,  0.5, -0.5, -1.0,  0.0,  0.0,  1.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0,
    -0.5, -0.5,  0.5, -1.0,  0.0,  0.0,  0.0, 0.0,
    -0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0,

     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0,  0.0,  0.0,  1.0, 1.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0,
     0.5, -0.5,  0.5,  1.0,  0.0,  0.0,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0,

    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  1.0, 1.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
     0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0,

    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
     0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
     0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0,
];

pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Upload the cube as vertex + index buffers and wrap it in a `MeshDraw`
/// with the given transform and diffuse view.
pub fn cube_mesh(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    transform: Mat4,
    diffuse: Arc<wgpu::TextureView>,
) -> MeshDraw {
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&CUBE_VERTICES);
    let vertex_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cube_vertices"),
        size: vertex_bytes.len() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&vertex_buf, 0, vertex_bytes);

    let indices: Vec<u32> = (0..CUBE_VERTEX_COUNT).collect();
    let index_bytes: &[u8] = bytemuck::cast_slice(&indices);
    let index_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cube_indices"),
        size: index_bytes.len() as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&index_buf, 0, index_bytes);

    MeshDraw {
        vertex_buf: Arc::new(vertex_buf),
        index_buf: Arc::new(index_buf),
        index_count: CUBE_VERTEX_COUNT,
        transform,
        diffuse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucerna_renderer::geometry_pass::VERTEX_STRIDE;

    #[test]
    fn cube_has_36_stride_32_vertices() {
        assert_eq!(
            CUBE_VERTICES.len(),
            (CUBE_VERTEX_COUNT as usize) * (VERTEX_STRIDE as usize / 4)
        );
    }

    #[test]
    fn cube_normals_are_unit_axis_vectors() {
        for vertex in CUBE_VERTICES.chunks(8) {
            let n = [vertex[3], vertex[4], vertex[5]];
            let len_sq: f32 = n.iter().map(|c| c * c).sum();
            assert!((len_sq - 1.0).abs() < 1e-6);
            assert_eq!(n.iter().filter(|c| **c != 0.0).count(), 1, "axis-aligned normal");
        }
    }

    #[test]
    fn cube_positions_stay_on_the_unit_half_extent() {
        for vertex in CUBE_VERTICES.chunks(8) {
            for coord in &vertex[0..3] {
                assert_eq!(coord.abs(), 0.5);
            }
        }
    }
}
