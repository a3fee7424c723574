//! Deferred shading demo: geometry pass into the G-buffer, full-screen
//! lighting pass, depth transfer, and a depth-tested light-marker cube.
//! Run: cargo run -p demos --bin deferred_shading [texture-path]

use std::path::PathBuf;
use std::sync::Arc;

use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use lucerna_app::{
    mesh, texture, AppContext, FrameAcquire, FrameClock, GpuContext, InputEvent, InputQueue, Key,
};
use lucerna_renderer::{DeferredRenderer, MeshDraw, RendererConfig, SceneFrame};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

/// Everything that only exists once the window and device are up.
struct DemoState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: DeferredRenderer,
    meshes: Vec<MeshDraw>,
    marker: MeshDraw,
}

struct App {
    texture_path: Option<PathBuf>,
    state: Option<DemoState>,
    ctx: AppContext,
    input: InputQueue,
    clock: FrameClock,
    fatal: Option<String>,
}

impl App {
    fn new(texture_path: Option<PathBuf>) -> Self {
        Self {
            texture_path,
            state: None,
            ctx: AppContext::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            input: InputQueue::new(),
            clock: FrameClock::new(),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<DemoState, String> {
        let attrs = winit::window::WindowAttributes::default()
            .with_title("Lucerna deferred shading")
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window =
            Arc::new(event_loop.create_window(attrs).map_err(|e| e.to_string())?);
        grab_cursor(&window);

        let gpu = GpuContext::new(window.clone())?;
        let (width, height) = gpu.size();
        self.ctx = AppContext::new(width, height);

        let config = RendererConfig {
            surface_format: gpu.surface_format(),
            ..RendererConfig::default()
        };
        let renderer = DeferredRenderer::new(&gpu.device, &gpu.queue, config, width, height)?;

        let diffuse = match &self.texture_path {
            Some(path) => texture::load_texture(&gpu.device, &gpu.queue, path)?,
            None => texture::checker_texture(&gpu.device, &gpu.queue),
        };
        let cube = mesh::cube_mesh(&gpu.device, &gpu.queue, Mat4::IDENTITY, diffuse);
        let marker = cube.clone();

        window.request_redraw();
        Ok(DemoState { window, gpu, renderer, meshes: vec![cube], marker })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        self.input.drain(&mut self.ctx, dt);
        if self.ctx.quit_requested {
            event_loop.exit();
            return;
        }
        let Some(state) = self.state.as_mut() else { return };

        if let Some((width, height)) = self.ctx.take_resize() {
            state.gpu.resize(width, height);
            state.renderer.resize(&state.gpu.device, width, height);
        }

        let frame = match state.gpu.acquire() {
            Ok(FrameAcquire::Frame(frame)) => frame,
            Ok(FrameAcquire::Skip) => {
                state.window.request_redraw();
                return;
            }
            Err(e) => {
                log::error!("surface failure: {}", e);
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        };
        let output_view = frame.texture.create_view(&Default::default());

        let mut encoder = state.gpu.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor { label: Some("deferred_frame") },
        );
        let scene = SceneFrame {
            meshes: &state.meshes,
            light: self.ctx.light,
            marker_mesh: &state.marker,
        };
        if let Err(e) = state.renderer.encode_frame(
            &mut encoder,
            &state.gpu.device,
            &state.gpu.queue,
            &output_view,
            &self.ctx.camera,
            &scene,
        ) {
            log::error!("frame encode failed: {}", e);
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        state.gpu.queue.submit([encoder.finish()]);
        state.window.pre_present_notify();
        frame.present();
        state.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
        match self.init(event_loop) {
            Ok(state) => {
                // Startup work should not count as the first frame's delta.
                self.clock.reset();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("startup failed: {}", e);
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.input.push(InputEvent::CloseRequested),
            WindowEvent::Resized(size) => {
                self.input.push(InputEvent::Resized { width: size.width, height: size.height });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = Key::from_winit(code) {
                        self.input.push(InputEvent::Key {
                            key,
                            pressed: event.state == ElementState::Pressed,
                        });
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.input.push(InputEvent::Scroll { lines });
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.push(InputEvent::MouseDelta { dx: delta.0 as f32, dy: delta.1 as f32 });
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("cursor grab unavailable: {}", e);
    }
    window.set_cursor_visible(false);
}

fn main() -> Result<(), String> {
    env_logger::init();
    let texture_path = std::env::args().nth(1).map(PathBuf::from);
    let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
    let mut app = App::new(texture_path);
    event_loop.run_app(&mut app).map_err(|e| e.to_string())?;
    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
