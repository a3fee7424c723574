//! Input event queue, drained once per frame boundary.
//!
//! Windowing callbacks only push platform-agnostic events; all camera and
//! context mutation happens in `drain`, before the frame's rendering state
//! is read. This keeps event ordering independent of callback timing.

use std::collections::HashSet;

use lucerna_renderer::CameraMovement;

use crate::context::AppContext;

/// Keys the demos react to. Minimal on purpose; the runtime maps platform
/// key codes into these.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Escape,
}

impl Key {
    /// Map a winit key code; `None` for keys the demos ignore.
    pub fn from_winit(code: winit::keyboard::KeyCode) -> Option<Self> {
        use winit::keyboard::KeyCode;
        match code {
            KeyCode::KeyW => Some(Key::W),
            KeyCode::KeyA => Some(Key::A),
            KeyCode::KeyS => Some(Key::S),
            KeyCode::KeyD => Some(Key::D),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }

    fn movement(self) -> Option<CameraMovement> {
        match self {
            Key::W => Some(CameraMovement::Forward),
            Key::S => Some(CameraMovement::Backward),
            Key::A => Some(CameraMovement::Left),
            Key::D => Some(CameraMovement::Right),
            Key::Escape => None,
        }
    }
}

/// Discrete input events, in window-system conventions: mouse deltas are raw
/// pixel travel with +y pointing down the screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseDelta { dx: f32, dy: f32 },
    Scroll { lines: f32 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

/// Queue of pending events plus the held-key set that drives continuous
/// movement.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    keys_down: HashSet<Key>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Apply all queued events to the context in arrival order, then apply
    /// continuous movement for every held key scaled by `dt` seconds.
    pub fn drain(&mut self, ctx: &mut AppContext, dt: f32) {
        for event in self.events.drain(..) {
            match event {
                InputEvent::Key { key, pressed } => {
                    if pressed {
                        self.keys_down.insert(key);
                        if key == Key::Escape {
                            ctx.quit_requested = true;
                        }
                    } else {
                        self.keys_down.remove(&key);
                    }
                }
                InputEvent::MouseDelta { dx, dy } => {
                    // Screen +y is down; camera +dy looks up.
                    ctx.camera.process_mouse(dx, -dy, true);
                }
                InputEvent::Scroll { lines } => {
                    ctx.camera.process_scroll(lines);
                }
                InputEvent::Resized { width, height } => {
                    ctx.request_resize(width, height);
                }
                InputEvent::CloseRequested => {
                    ctx.quit_requested = true;
                }
            }
        }

        for key in &self.keys_down {
            if let Some(direction) = key.movement() {
                ctx.camera.process_keyboard(direction, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lucerna_renderer::camera::SPEED;

    fn ctx() -> AppContext {
        AppContext::new(800, 600)
    }

    #[test]
    fn held_key_moves_camera_each_drain() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::Key { key: Key::W, pressed: true });
        queue.drain(&mut ctx, 1.0);
        // Default camera faces -Z.
        let after_one = ctx.camera.position;
        assert!((after_one - Vec3::new(0.0, 0.0, 5.0 - SPEED)).length() < 1e-5);

        // Still held: no new events, movement continues.
        queue.drain(&mut ctx, 1.0);
        assert!((ctx.camera.position.z - (5.0 - 2.0 * SPEED)).abs() < 1e-5);

        queue.push(InputEvent::Key { key: Key::W, pressed: false });
        queue.drain(&mut ctx, 1.0);
        assert!((ctx.camera.position.z - (5.0 - 2.0 * SPEED)).abs() < 1e-5);
    }

    #[test]
    fn mouse_delta_down_pitches_down() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::MouseDelta { dx: 0.0, dy: 100.0 });
        queue.drain(&mut ctx, 0.016);
        assert!(ctx.camera.pitch < 0.0, "downward mouse travel should pitch down");
    }

    #[test]
    fn escape_and_close_request_quit() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::Key { key: Key::Escape, pressed: true });
        queue.drain(&mut ctx, 0.016);
        assert!(ctx.quit_requested);

        let mut ctx = AppContext::new(800, 600);
        queue.push(InputEvent::CloseRequested);
        queue.drain(&mut ctx, 0.016);
        assert!(ctx.quit_requested);
    }

    #[test]
    fn resize_event_records_pending_resize() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::Resized { width: 1024, height: 768 });
        queue.drain(&mut ctx, 0.016);
        assert_eq!(ctx.take_resize(), Some((1024, 768)));
    }

    #[test]
    fn scroll_narrows_field_of_view() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::Scroll { lines: 5.0 });
        queue.drain(&mut ctx, 0.016);
        assert_eq!(ctx.camera.zoom, 40.0);
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let mut queue = InputQueue::new();
        let mut ctx = ctx();
        queue.push(InputEvent::Resized { width: 640, height: 480 });
        queue.push(InputEvent::Resized { width: 1280, height: 720 });
        queue.drain(&mut ctx, 0.016);
        assert_eq!(ctx.take_resize(), Some((1280, 720)));
    }
}
