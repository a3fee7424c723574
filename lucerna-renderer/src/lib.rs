//! Lucerna renderer: free-fly camera, wgpu G-buffer geometry pass,
//! full-screen lighting pass, depth transfer, and overlay/forward passes.

pub mod camera;
pub mod config;
pub mod forward_pass;
pub mod fullscreen;
pub mod geometry_pass;
pub mod lighting_pass;
pub mod marker_pass;
pub mod targets;

pub use camera::{Camera, CameraMovement, FrameTransforms};
pub use config::RendererConfig;
pub use forward_pass::{ForwardPass, ForwardShading};
pub use fullscreen::FullscreenQuad;
pub use geometry_pass::{GeometryPass, MeshDraw};
pub use lighting_pass::{LightingPass, PointLight};
pub use marker_pass::MarkerPass;
pub use targets::{DepthTarget, GBuffer};

/// Scene drawn by one deferred frame.
pub struct SceneFrame<'a> {
    /// Opaque geometry for the geometry pass.
    pub meshes: &'a [MeshDraw],
    /// The point light shading the scene, also drawn as a marker cube.
    pub light: PointLight,
    /// Mesh used for the light marker (drawn position-only).
    pub marker_mesh: &'a MeshDraw,
}

/// Per-frame pipeline orchestrator for deferred shading.
///
/// Owns the G-buffer, the screen depth target, the full-screen quad, and the
/// three passes. Every frame runs the fixed sequence: geometry pass into the
/// G-buffer, full-screen lighting pass into the surface, depth transfer from
/// the G-buffer to the screen depth target, then the depth-tested light
/// marker. Resizing reallocates both targets together.
pub struct DeferredRenderer {
    config: RendererConfig,
    geometry_pass: GeometryPass,
    lighting_pass: LightingPass,
    marker_pass: MarkerPass,
    quad: FullscreenQuad,
    gbuffer: GBuffer,
    screen_depth: DepthTarget,
}

impl DeferredRenderer {
    /// Build every pass and allocate the offscreen targets. Any failure here
    /// is startup-fatal; the caller must not enter the frame loop.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: RendererConfig,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let geometry_pass = GeometryPass::new(device)?;
        let lighting_pass = LightingPass::new(device, config.surface_format)?;
        let marker_pass = MarkerPass::new(device, config.surface_format)?;
        let quad = FullscreenQuad::new(device, queue);
        let gbuffer = GBuffer::allocate(device, width, height)?;
        let screen_depth = DepthTarget::allocate(device, width, height)?;
        log::info!("deferred renderer ready ({}x{})", width, height);
        Ok(Self { config, geometry_pass, lighting_pass, marker_pass, quad, gbuffer, screen_depth })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    /// Reallocate the G-buffer and the screen depth target for a new
    /// viewport size. No-op when the size is unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.gbuffer.resize(device, width, height);
        self.screen_depth.resize(device, width, height);
    }

    /// Encode one frame in the fixed pass order. `output_view` is the
    /// surface texture view for this frame; presentation stays with the
    /// caller.
    pub fn encode_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_view: &wgpu::TextureView,
        camera: &Camera,
        scene: &SceneFrame<'_>,
    ) -> Result<(), String> {
        let transforms = FrameTransforms::new(camera, self.gbuffer.width(), self.gbuffer.height());

        // 1. Geometry pass: scene attributes into the G-buffer.
        self.geometry_pass.encode(
            encoder,
            device,
            queue,
            &self.gbuffer,
            scene.meshes,
            &transforms,
            self.config.clear_color,
        )?;

        // 2. Lighting pass: shade every surface pixel from the G-buffer.
        // Its color clear also serves as the frame's default clear.
        self.lighting_pass.encode(
            encoder,
            device,
            queue,
            &self.gbuffer,
            &self.quad,
            output_view,
            &scene.light,
            camera.position,
            self.config.clear_color,
        )?;

        // 3. Depth transfer: without it the marker below would not occlude
        // against the deferred geometry, whose depth never reached the
        // screen target.
        encoder.copy_texture_to_texture(
            wgpu::ImageCopyTexture {
                texture: &self.gbuffer.depth,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::DepthOnly,
            },
            wgpu::ImageCopyTexture {
                texture: &self.screen_depth.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::DepthOnly,
            },
            self.gbuffer.extent(),
        );

        // 4. Overlay: light marker, depth-tested against the copied depth.
        self.marker_pass.encode(
            encoder,
            device,
            queue,
            output_view,
            &self.screen_depth.view(),
            scene.marker_mesh,
            &transforms,
            &scene.light,
        )?;

        Ok(())
    }
}
