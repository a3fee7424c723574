//! Texture decode and upload.

use std::path::Path;
use std::sync::Arc;

/// Decode an image file and upload it as an sRGB RGBA8 texture. A missing or
/// undecodable file is a startup-fatal condition for the demo that asked for
/// it.
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<Arc<wgpu::TextureView>, String> {
    let img = image::open(path)
        .map_err(|e| format!("failed to decode texture {}: {}", path.display(), e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("loaded texture {} ({}x{})", path.display(), width, height);
    Ok(upload_rgba8(device, queue, &rgba, width, height))
}

/// Procedural two-tone checkerboard used when no texture path is supplied,
/// so the demos run without external assets.
pub fn checker_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> Arc<wgpu::TextureView> {
    const SIZE: u32 = 256;
    const CELL: u32 = 32;
    let mut pixels = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let even = ((x / CELL) + (y / CELL)) % 2 == 0;
            let shade: u8 = if even { 200 } else { 90 };
            pixels.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    upload_rgba8(device, queue, &pixels, SIZE, SIZE)
}

fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Arc<wgpu::TextureView> {
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("diffuse_texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    Arc::new(texture.create_view(&Default::default()))
}
