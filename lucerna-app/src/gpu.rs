//! GPU bootstrap: instance, surface, adapter, device, and the surface
//! configuration/acquire policy.

use std::sync::Arc;

use winit::window::Window;

/// Outcome of acquiring the next surface texture.
pub enum FrameAcquire {
    Frame(wgpu::SurfaceTexture),
    /// Transient surface error; skip this frame and try again.
    Skip,
}

/// Owns the wgpu instance, surface, device and queue for one window.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Synchronous bootstrap; any failure is startup-fatal for the caller.
    pub fn new(window: Arc<Window>) -> Result<Self, String> {
        pollster::block_on(Self::new_async(window))
    }

    async fn new_async(window: Arc<Window>) -> Result<Self, String> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window).map_err(|e| e.to_string())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or("no suitable GPU adapter")?;
        log::info!("adapter: {}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .map_err(|e| e.to_string())?;

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats)
            .ok_or("surface reports no supported texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        Ok(Self { surface, device, queue, config })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for a new window size. Zero sizes are skipped
    /// (minimized windows); the next real resize restores rendering.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next frame, reconfiguring once on Lost/Outdated and
    /// skipping the frame on timeout. Out-of-memory (or a failed retry) is
    /// fatal.
    pub fn acquire(&mut self) -> Result<FrameAcquire, String> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(FrameAcquire::Frame(frame)),
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                match self.surface.get_current_texture() {
                    Ok(frame) => Ok(FrameAcquire::Frame(frame)),
                    Err(e) => Err(format!("surface unrecoverable after reconfigure: {}", e)),
                }
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface acquire timed out, skipping frame");
                Ok(FrameAcquire::Skip)
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Prefer an sRGB format so linear shader output is encoded on scan-out.
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }
    let preferred = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    for f in preferred {
        if formats.contains(&f) {
            return Some(f);
        }
    }
    Some(formats[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_win_over_listing_order() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            choose_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn first_format_is_fallback() {
        let formats = [wgpu::TextureFormat::Rgba16Float];
        assert_eq!(choose_surface_format(&formats), Some(wgpu::TextureFormat::Rgba16Float));
        assert_eq!(choose_surface_format(&[]), None);
    }
}
