//! Application context: the explicit state bundle the frame loop reads and
//! the input layer mutates. Replaces process-wide globals.

use glam::Vec3;

use lucerna_renderer::{Camera, PointLight};

/// Mutable per-application state: camera, viewport size, the scene light,
/// and the frame-boundary flags set by the input queue.
pub struct AppContext {
    pub camera: Camera,
    pub size: (u32, u32),
    pub light: PointLight,
    pub quit_requested: bool,
    pending_resize: Option<(u32, u32)>,
}

impl AppContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, 5.0)),
            size: (width, height),
            light: PointLight {
                position: Vec3::new(1.2, 1.0, 2.0),
                color: Vec3::ONE,
            },
            quit_requested: false,
            pending_resize: None,
        }
    }

    /// Record a resize; applied by the frame loop at the next frame boundary.
    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width.max(1), height.max(1)));
    }

    /// Consume a pending resize, updating the stored viewport size.
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        let resize = self.pending_resize.take();
        if let Some(size) = resize {
            self.size = size;
        }
        resize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_is_consumed_once_and_updates_size() {
        let mut ctx = AppContext::new(800, 600);
        ctx.request_resize(1024, 768);
        assert_eq!(ctx.take_resize(), Some((1024, 768)));
        assert_eq!(ctx.size, (1024, 768));
        assert_eq!(ctx.take_resize(), None);
    }

    #[test]
    fn zero_sized_resize_is_clamped() {
        let mut ctx = AppContext::new(800, 600);
        ctx.request_resize(0, 0);
        assert_eq!(ctx.take_resize(), Some((1, 1)));
    }

    #[test]
    fn default_scene_matches_tutorial_setup() {
        let ctx = AppContext::new(800, 600);
        assert_eq!(ctx.camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(ctx.light.position, Vec3::new(1.2, 1.0, 2.0));
        assert!(!ctx.quit_requested);
    }
}
