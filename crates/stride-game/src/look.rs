//! First-person look handling
//!
//! Turns look input into yaw and pitch. Yaw alone defines the orientation that movement
//! and wall detection use.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Look configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Horizontal pointer sensitivity (degrees per pixel)
    pub sensitivity_x: f32,
    /// Vertical pointer sensitivity (degrees per pixel)
    pub sensitivity_y: f32,
    /// Stick turn rate at full deflection (degrees per second)
    pub stick_turn_rate: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity_x: 0.1,
            sensitivity_y: 0.1,
            stick_turn_rate: 180.0,
            pitch_min: -89.0,
            pitch_max: 89.0,
        }
    }
}

/// Yaw/pitch look state
#[derive(Debug, Clone)]
pub struct LookController {
    /// Configuration
    pub config: LookConfig,
    /// Horizontal rotation in radians
    pub yaw: f32,
    /// Vertical rotation in radians
    pub pitch: f32,
}

impl LookController {
    /// Create a new look controller with default config
    pub fn new() -> Self {
        Self::with_config(LookConfig::default())
    }

    /// Create a new look controller with custom config
    pub fn with_config(config: LookConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Apply a pointer delta in pixels
    pub fn handle_pointer(&mut self, delta: Vec2) {
        self.yaw += (delta.x * self.config.sensitivity_x).to_radians();
        self.set_pitch(self.pitch - (delta.y * self.config.sensitivity_y).to_radians());
    }

    /// Apply a stick deflection held for `dt` seconds
    pub fn handle_stick(&mut self, rate: Vec2, dt: f32) {
        if rate == Vec2::ZERO {
            return;
        }
        let step = (self.config.stick_turn_rate * dt).to_radians();
        self.yaw += rate.x * step;
        self.set_pitch(self.pitch - rate.y * step);
    }

    /// Set the pitch directly, clamped to the configured range
    pub fn set_pitch(&mut self, pitch: f32) {
        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = pitch.clamp(pitch_min, pitch_max);
    }

    /// Set the yaw directly
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Full look direction including pitch
    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            -self.yaw.cos() * cos_pitch,
        )
    }

    /// Horizontal facing direction
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Body orientation (yaw only)
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw)
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new()
    }
}
