use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit rig around a fixed target with damped rotation and clamped distance.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    aspect: f32,
    config: CameraConfig,
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: config.default_distance,
            yaw: 0.0,
            pitch: 0.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            aspect: 16.0 / 9.0,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Restores the default framing: target at the origin, default distance, looking down -Z.
    pub fn reset(&mut self) {
        self.target = Vec3::ZERO;
        self.distance = self.config.default_distance;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Moves the camera along its view axis; positive `delta` moves away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Queues a drag in pixels; applied gradually by `update`.
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let scale = std::f32::consts::TAU / height * self.config.rotate_speed;
        self.pending_yaw -= dx * scale;
        self.pending_pitch += dy * scale;
    }

    /// Advances damping by one frame. Returns true while the camera is still moving.
    pub fn update(&mut self) -> bool {
        let damping = self.config.damping_factor.clamp(0.0, 1.0);
        if self.pending_yaw.abs() < 1e-5 && self.pending_pitch.abs() < 1e-5 {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
            return false;
        }
        self.yaw += self.pending_yaw * damping;
        self.pitch = (self.pitch + self.pending_pitch * damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.pending_yaw *= 1.0 - damping;
        self.pending_pitch *= 1.0 - damping;
        wrap_angle(&mut self.yaw);
        true
    }

    pub fn eye(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        let offset = Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            self.yaw.cos() * cos_pitch,
        );
        self.target + offset * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_deg.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn wrap_angle(angle: &mut f32) {
    use std::f32::consts::{PI, TAU};
    if angle.is_finite() {
        *angle = (*angle + PI).rem_euclid(TAU) - PI;
    }
}
