//! Renderer configuration: output format and scene background color.

/// Configuration shared by the render passes.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Surface texture format the on-screen pipelines target
    /// (e.g. Bgra8UnormSrgb or Rgba8Unorm).
    pub surface_format: wgpu::TextureFormat,
    /// Background color cleared into the surface and the albedo attachment.
    pub clear_color: wgpu::Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_format: wgpu::TextureFormat::Rgba8Unorm,
            clear_color: wgpu::Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 },
        }
    }
}
