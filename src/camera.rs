//! Viewer camera and key-driven colour channels.
//!
//! The camera follows the scroll position down the central valley by
//! default. `E` hands it over to free flight (WASD, Space / Left Shift),
//! `Q` hands it back.

use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::input::InputState;
use crate::params::{ColorParams, RenderParams};

/// Who drives the camera position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Glued to the scroll position, looking straight down the scroll axis
    Follow,
    /// Moved by the keyboard
    Free,
}

/// Perspective camera in terrain cell units
#[derive(Debug, Clone)]
pub struct CameraSystem {
    params: RenderParams,
    mode: CameraMode,
    position: Vec3,
    /// Horizontal angle (radians, 0 = looking toward +z)
    yaw: f32,
    /// Vertical angle (radians, 0 = horizon)
    pitch: f32,
    fov_degrees: f32,
}

impl CameraSystem {
    pub fn new(params: RenderParams) -> Self {
        let position = Vec3::new(0.0, params.camera_height, 0.0);
        let fov_degrees = params.fov_degrees;
        Self {
            params,
            mode: CameraMode::Follow,
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Unit view direction from yaw and pitch
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Horizontal unit vector to the viewer's right
    pub fn right(&self) -> Vec3 {
        let angle = self.yaw - std::f32::consts::FRAC_PI_2;
        Vec3::new(angle.sin(), 0.0, angle.cos())
    }

    /// Apply one frame of input
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous frame
    /// * `input` - Keys held this frame
    /// * `scroll_position` - Distance travelled along the scroll axis (cells)
    pub fn update(&mut self, dt: f32, input: &InputState, scroll_position: f64) {
        match self.mode {
            CameraMode::Follow if input.is_pressed(KeyCode::KeyE) => self.mode = CameraMode::Free,
            CameraMode::Free if input.is_pressed(KeyCode::KeyQ) => self.mode = CameraMode::Follow,
            _ => {}
        }

        match self.mode {
            CameraMode::Follow => {
                self.yaw = 0.0;
                self.pitch = 0.0;
                self.position = Vec3::new(0.0, self.params.camera_height, scroll_position as f32);
            }
            CameraMode::Free => {
                let step = dt * self.params.fly_speed;
                let forward = input.axis(KeyCode::KeyW, KeyCode::KeyS);
                let strafe = input.axis(KeyCode::KeyD, KeyCode::KeyA);
                let lift = input.axis(KeyCode::Space, KeyCode::ShiftLeft);

                self.position += self.direction() * forward * step;
                self.position += self.right() * strafe * step;
                self.position.y += lift * step;
            }
        }

        let zoom = input.axis(KeyCode::KeyR, KeyCode::KeyF);
        let (min_fov, max_fov) = self.params.fov_range_degrees;
        self.fov_degrees = (self.fov_degrees + zoom * dt * self.params.fov_speed_deg_per_s)
            .clamp(min_fov, max_fov);
    }

    /// View-projection matrix for the given viewport aspect ratio
    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        let direction = self.direction();
        let up = self.right().cross(direction);

        let view = Mat4::look_at_rh(self.position, self.position + direction, up);
        let proj = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect_ratio,
            self.params.near_plane,
            self.params.far_plane,
        );

        proj * view
    }
}

/// Surface colour: caller-set brightness and key-adjusted channel multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorChannels {
    pub brightness: f32,
    pub rgb: [f32; 3],
    key_step: f32,
}

impl ColorChannels {
    pub fn new(params: ColorParams) -> Self {
        Self {
            brightness: params.brightness,
            rgb: params.rgb,
            key_step: params.key_step,
        }
    }

    /// Nudge channels while their keys are held (U/J red, I/K green, O/L blue)
    pub fn apply_keys(&mut self, input: &InputState) {
        let axes = [
            input.axis(KeyCode::KeyU, KeyCode::KeyJ),
            input.axis(KeyCode::KeyI, KeyCode::KeyK),
            input.axis(KeyCode::KeyO, KeyCode::KeyL),
        ];
        for (channel, axis) in self.rgb.iter_mut().zip(axes) {
            *channel = (*channel + axis * self.key_step).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn held(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.handle_key(key, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn test_follow_tracks_scroll() {
        let mut camera = CameraSystem::new(RenderParams::default());
        camera.update(0.016, &InputState::new(), 42.5);

        assert_eq!(camera.mode(), CameraMode::Follow);
        assert_eq!(camera.position(), Vec3::new(0.0, 2.0, 42.5));
        assert!((camera.direction() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_follow_ignores_movement_keys() {
        let mut camera = CameraSystem::new(RenderParams::default());
        camera.update(1.0, &held(&[KeyCode::KeyW, KeyCode::Space]), 10.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn test_free_flight_and_return() {
        let mut camera = CameraSystem::new(RenderParams::default());
        camera.update(0.0, &held(&[KeyCode::KeyE]), 5.0);
        assert_eq!(camera.mode(), CameraMode::Free);

        let start = camera.position();
        camera.update(0.5, &held(&[KeyCode::KeyW]), 5.0);
        // 6 cells/s for half a second along +z
        assert!((camera.position() - (start + Vec3::Z * 3.0)).length() < 1e-4);

        camera.update(0.5, &held(&[KeyCode::Space]), 5.0);
        assert!((camera.position().y - (start.y + 3.0)).abs() < 1e-4);

        camera.update(0.0, &held(&[KeyCode::KeyQ]), 7.0);
        assert_eq!(camera.mode(), CameraMode::Follow);
        assert_eq!(camera.position().z, 7.0);
    }

    #[test]
    fn test_fov_clamped() {
        let mut camera = CameraSystem::new(RenderParams::default());
        camera.update(10.0, &held(&[KeyCode::KeyR]), 0.0);
        assert_eq!(camera.fov_degrees(), 120.0);

        camera.update(10.0, &held(&[KeyCode::KeyF]), 0.0);
        assert_eq!(camera.fov_degrees(), 45.0);
    }

    #[test]
    fn test_view_proj_is_finite() {
        let camera = CameraSystem::new(RenderParams::default());
        let view_proj = camera.view_proj(16.0 / 9.0);
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_color_keys_clamp() {
        let mut colors = ColorChannels::new(ColorParams::default());
        let input = held(&[KeyCode::KeyU, KeyCode::KeyK, KeyCode::KeyO]);
        for _ in 0..200 {
            colors.apply_keys(&input);
        }
        assert_eq!(colors.rgb, [1.0, 0.0, 1.0]);
        assert_eq!(colors.brightness, 0.9);
    }
}
