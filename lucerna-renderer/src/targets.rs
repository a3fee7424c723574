//! Offscreen render targets: the G-buffer attachments and the screen depth target.

use wgpu::TextureView;

/// World-space position attachment. Wide float channels: positions are
/// unbounded world coordinates, not [0,1] color.
pub const POSITION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// World-space normal attachment, components in [-1,1].
pub const NORMAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Albedo RGB + specular intensity in alpha. 8-bit is enough for
/// visually-bounded quantities.
pub const ALBEDO_SPEC_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The geometry pass writes these three color attachments in one invocation.
pub const COLOR_ATTACHMENT_FORMATS: [wgpu::TextureFormat; 3] =
    [POSITION_FORMAT, NORMAL_FORMAT, ALBEDO_SPEC_FORMAT];

pub(crate) fn needs_realloc(current: (u32, u32), requested: (u32, u32)) -> bool {
    current != requested
}

/// The multi-attachment offscreen target filled by the geometry pass and
/// sampled by the lighting pass.
///
/// All attachments always share the same dimensions. `resize` reallocates
/// storage in place so the `GBuffer` itself stays identity-stable; consuming
/// passes rebuild their bind groups each encode and therefore never hold a
/// view of a stale-sized attachment.
pub struct GBuffer {
    pub position: wgpu::Texture,
    pub normal: wgpu::Texture,
    pub albedo_spec: wgpu::Texture,
    pub depth: wgpu::Texture,
    width: u32,
    height: u32,
}

impl GBuffer {
    /// Allocate all attachments at (width, height). Zero-sized viewports are
    /// rejected here; attachment compatibility itself is validated by wgpu
    /// when the geometry pass begins.
    pub fn allocate(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("G-buffer dimensions must be non-zero, got {}x{}", width, height));
        }
        Ok(Self::create(device, width, height))
    }

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let position = color_target(device, "gbuffer_position", POSITION_FORMAT, width, height);
        let normal = color_target(device, "gbuffer_normal", NORMAL_FORMAT, width, height);
        let albedo_spec =
            color_target(device, "gbuffer_albedo_spec", ALBEDO_SPEC_FORMAT, width, height);
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gbuffer_depth"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            // COPY_SRC: the depth transfer copies this into the screen depth
            // target after the lighting pass.
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        Self { position, normal, albedo_spec, depth, width, height }
    }

    /// Reallocate every attachment to the new size, in place. A no-op when
    /// the size is unchanged. All attachments change together; a single
    /// stale-sized attachment would misalign lighting-pass sampling.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if !needs_realloc((self.width, self.height), (width, height)) {
            return;
        }
        log::debug!("reallocating G-buffer attachments to {}x{}", width, height);
        *self = Self::create(device, width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    pub fn position_view(&self) -> TextureView {
        self.position.create_view(&Default::default())
    }

    pub fn normal_view(&self) -> TextureView {
        self.normal.create_view(&Default::default())
    }

    pub fn albedo_spec_view(&self) -> TextureView {
        self.albedo_spec.create_view(&Default::default())
    }

    pub fn depth_view(&self) -> TextureView {
        self.depth.create_view(&Default::default())
    }
}

fn color_target(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

/// Depth buffer for on-screen passes: the copy destination of the deferred
/// depth transfer, and the depth attachment of forward/overlay rendering.
/// wgpu surfaces carry no depth, so every demo owns one of these.
pub struct DepthTarget {
    pub texture: wgpu::Texture,
    width: u32,
    height: u32,
}

impl DepthTarget {
    pub fn allocate(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("depth target dimensions must be non-zero, got {}x{}", width, height));
        }
        Ok(Self::create(device, width, height))
    }

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("screen_depth"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        Self { texture, width, height }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if !needs_realloc((self.width, self.height), (width, height)) {
            return;
        }
        *self = Self::create(device, width, height);
    }

    pub fn view(&self) -> TextureView {
        self.texture.create_view(&Default::default())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realloc_only_on_size_change() {
        assert!(!needs_realloc((800, 600), (800, 600)));
        assert!(needs_realloc((800, 600), (1024, 768)));
        assert!(needs_realloc((800, 600), (800, 601)));
    }

    #[test]
    fn attachment_formats_match_channel_roles() {
        // Position and normal carry world-space data and need wide floats;
        // albedo/spec is display-bounded color.
        assert_eq!(POSITION_FORMAT, wgpu::TextureFormat::Rgba16Float);
        assert_eq!(NORMAL_FORMAT, wgpu::TextureFormat::Rgba16Float);
        assert_eq!(ALBEDO_SPEC_FORMAT, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(COLOR_ATTACHMENT_FORMATS.len(), 3);
    }
}
