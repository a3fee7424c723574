//! Free-fly camera: Euler-angle state, derived view basis, per-frame transforms.

use glam::{Mat4, Vec3};

/// Default yaw in degrees. -90 points the camera down -Z.
pub const YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const PITCH: f32 = 0.0;
/// World units per second of keyboard movement.
pub const SPEED: f32 = 2.5;
/// Degrees of rotation per pixel of mouse travel.
pub const SENSITIVITY: f32 = 0.1;
/// Default vertical field of view in degrees.
pub const ZOOM: f32 = 45.0;

/// Pitch is kept strictly inside +/-89 degrees so front never becomes
/// (anti-)parallel to world up, which would degenerate the cross products.
const PITCH_LIMIT: f32 = 89.0;
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

/// Near/far planes shared by every demo projection.
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Movement directions, decoupled from any windowing library's key codes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Camera position/orientation state.
///
/// `front`, `right` and `up` are derived from (yaw, pitch) and recomputed on
/// every angle mutation; they are never authoritative on their own.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Yaw in degrees. Unbounded; wraps through trigonometric periodicity.
    pub yaw: f32,
    /// Pitch in degrees, clamped to (-89, 89) by `process_mouse`.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees, clamped to [1, 45].
    pub zoom: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: YAW,
            pitch: PITCH,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// World-to-view matrix from the current position and basis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Translate along +/-front or +/-right. The world is unbounded; no
    /// position clamping.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a look delta in pixels; +dy looks up. Recomputes the basis, so
    /// callers never observe stale vectors.
    pub fn process_mouse(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Scroll adjusts the field of view, not the position.
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        // Normalized because their length shrinks as pitch approaches the
        // poles, which would otherwise slow strafe movement.
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

/// Per-frame projection/view pair, recomputed from the camera every frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTransforms {
    pub projection: Mat4,
    pub view: Mat4,
}

impl FrameTransforms {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            projection: Mat4::perspective_rh(
                camera.zoom.to_radians(),
                aspect,
                NEAR_PLANE,
                FAR_PLANE,
            ),
            view: camera.view_matrix(),
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn assert_orthonormal(camera: &Camera) {
        assert!((camera.front.length() - 1.0).abs() < TOL, "front not unit");
        assert!((camera.right.length() - 1.0).abs() < TOL, "right not unit");
        assert!((camera.up.length() - 1.0).abs() < TOL, "up not unit");
        assert!(camera.front.dot(camera.right).abs() < TOL);
        assert!(camera.front.dot(camera.up).abs() < TOL);
        assert!(camera.right.dot(camera.up).abs() < TOL);
        // Right-handed: right x up == front.
        assert!((camera.right.cross(camera.up) - camera.front).length() < TOL);
    }

    #[test]
    fn basis_orthonormal_across_angles() {
        let mut camera = Camera::new(Vec3::ZERO);
        for yaw in [-720.0f32, -90.0, 0.0, 37.5, 180.0, 1234.0] {
            for pitch in [-89.0f32, -45.0, 0.0, 30.0, 89.0] {
                camera.yaw = yaw;
                camera.pitch = pitch;
                // Route through the public mutation path with zero delta so
                // the basis is recomputed as production code would.
                camera.process_mouse(0.0, 0.0, false);
                assert_orthonormal(&camera);
            }
        }
    }

    #[test]
    fn default_orientation_faces_negative_z() {
        let camera = Camera::new(Vec3::ZERO);
        assert!((camera.front - Vec3::NEG_Z).length() < TOL);
        assert!((camera.right - Vec3::X).length() < TOL);
        assert!((camera.up - Vec3::Y).length() < TOL);
    }

    #[test]
    fn pitch_clamp_holds_under_large_and_repeated_deltas() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse(0.0, 1.0e6, true);
        assert!(camera.pitch <= 89.0);
        for _ in 0..100 {
            camera.process_mouse(0.0, 500.0, true);
        }
        assert!(camera.pitch <= 89.0);
        camera.process_mouse(0.0, -1.0e6, true);
        assert!(camera.pitch >= -89.0);
        assert_orthonormal(&camera);
    }

    #[test]
    fn zoom_clamps_to_valid_fov_range() {
        let mut camera = Camera::new(Vec3::ZERO);
        for dy in [10.0f32, -100.0, 3.0, -3.0, 500.0, -500.0, 0.25] {
            camera.process_scroll(dy);
            assert!((1.0..=45.0).contains(&camera.zoom), "zoom {} escaped", camera.zoom);
        }
        camera.process_scroll(1.0e9);
        assert_eq!(camera.zoom, 1.0);
        camera.process_scroll(-1.0e9);
        assert_eq!(camera.zoom, 45.0);
    }

    #[test]
    fn view_matrix_maps_origin_in_front_of_camera() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0));
        let viewed = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((viewed - Vec3::new(0.0, 0.0, -5.0)).length() < TOL);
    }

    #[test]
    fn keyboard_movement_integrates_along_basis() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Forward, 2.0);
        let expected = Vec3::NEG_Z * SPEED * 2.0;
        assert!((camera.position - expected).length() < TOL);

        camera.position = Vec3::ZERO;
        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!((camera.position - Vec3::X * SPEED).length() < TOL);
        camera.process_keyboard(CameraMovement::Left, 1.0);
        assert!(camera.position.length() < TOL);
    }

    #[test]
    fn frame_transforms_track_zoom_and_aspect() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 5.0));
        camera.zoom = 30.0;
        let transforms = FrameTransforms::new(&camera, 800, 600);
        let expected = Mat4::perspective_rh(30.0f32.to_radians(), 800.0 / 600.0, NEAR_PLANE, FAR_PLANE);
        assert!(transforms
            .projection
            .to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
            .all(|(a, b)| (a - b).abs() < TOL));
        // Zero-sized viewports must not produce NaN aspect ratios.
        let degenerate = FrameTransforms::new(&camera, 0, 0);
        assert!(degenerate.projection.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
