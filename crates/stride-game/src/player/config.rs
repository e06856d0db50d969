//! Locomotion configuration and tuning defaults

use serde::{Deserialize, Serialize};
use stride_physics::{CharacterBodyConfig, ALL_LAYERS};

use crate::error::LocomotionError;
use crate::look::LookConfig;

/// Ground movement tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base move speed in meters per second, scaled by each state's speed ratio
    pub movement_speed: f32,
    /// Linear drag while grounded
    pub ground_drag: f32,
    /// Seconds to ease from the old speed cap to a new one at full input
    pub time_to_change_speed: f32,
    /// Downward acceleration while airborne (m/s^2)
    pub gravity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            ground_drag: 6.0,
            time_to_change_speed: 1.0,
            gravity: 20.0,
        }
    }
}

/// Jump tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Upward impulse applied on jump
    pub jump_force: f32,
    /// Grace period after leaving ground where a jump is still accepted
    pub coyote_time: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_force: 7.0,
            coyote_time: 0.15,
        }
    }
}

/// Crouch tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrouchConfig {
    /// Downward impulse applied when crouching starts
    pub crouch_impulse: f32,
    /// Crouched height as a fraction of standing height
    pub height_scale: f32,
}

impl Default for CrouchConfig {
    fn default() -> Self {
        Self {
            crouch_impulse: 5.0,
            height_scale: 0.5,
        }
    }
}

/// Slide tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    /// Impulse along the move direction when a slide starts
    pub slide_boost: f32,
    /// Multiplier on ground drag while sliding
    pub slide_drag_ratio: f32,
    /// Flat speed above which crouching becomes sliding
    pub minimum_slide_speed: f32,
    /// Slope angle (degrees) at which the down-slope force equals the base move speed
    pub slope_force_angle: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            slide_boost: 3.0,
            slide_drag_ratio: 0.2,
            minimum_slide_speed: 1.0,
            slope_force_angle: 20.0,
        }
    }
}

/// Climb tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Longest a single climb can last (seconds)
    pub climb_time: f32,
    /// Vertical speed held while climbing
    pub climb_speed: f32,
    /// How far ahead the wall check sweeps
    pub detection_distance: f32,
    /// Radius of the wall check sphere
    pub sphere_radius: f32,
    /// Widest angle between look direction and wall at which a climb can start (degrees)
    pub max_wall_look_angle: f32,
    /// Multiplier on detection distance for the lost-wall re-check
    pub wall_recheck_factor: f32,
    /// Wall normals with a dot product at or above this count as the same wall
    pub same_wall_dot: f32,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            climb_time: 1.0,
            climb_speed: 4.0,
            detection_distance: 0.55,
            sphere_radius: 0.5,
            max_wall_look_angle: 30.0,
            wall_recheck_factor: 1.5,
            same_wall_dot: 0.99,
        }
    }
}

/// Sensor layer masks and slope handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Layers the ground ray can hit
    pub ground_mask: u32,
    /// Layers the wall sphere can hit
    pub wall_mask: u32,
    /// Slopes flatter than this (degrees) are treated as level ground
    pub slope_angle_threshold: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            ground_mask: ALL_LAYERS,
            wall_mask: ALL_LAYERS,
            slope_angle_threshold: 1.0,
        }
    }
}

/// Everything a locomotion controller can be tuned with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub crouch: CrouchConfig,
    pub slide: SlideConfig,
    pub climb: ClimbConfig,
    pub sensors: SensorConfig,
    /// Collider dimensions
    pub body: CharacterBodyConfig,
    pub look: LookConfig,
}

fn positive(field: &'static str, value: f32) -> Result<(), LocomotionError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LocomotionError::InvalidConfig {
            field,
            reason: "must be a positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), LocomotionError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LocomotionError::InvalidConfig {
            field,
            reason: "must not be negative",
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), LocomotionError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LocomotionError::InvalidConfig {
            field,
            reason: "must be between 0 and 1",
        })
    }
}

impl LocomotionConfig {
    /// Parse a config from TOML, filling missing fields with defaults
    pub fn from_toml(source: &str) -> Result<Self, LocomotionError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> Result<(), LocomotionError> {
        positive("movement.movement_speed", self.movement.movement_speed)?;
        non_negative("movement.ground_drag", self.movement.ground_drag)?;
        positive("movement.time_to_change_speed", self.movement.time_to_change_speed)?;
        non_negative("movement.gravity", self.movement.gravity)?;

        non_negative("jump.jump_force", self.jump.jump_force)?;
        non_negative("jump.coyote_time", self.jump.coyote_time)?;

        non_negative("crouch.crouch_impulse", self.crouch.crouch_impulse)?;
        positive("crouch.height_scale", self.crouch.height_scale)?;
        unit_interval("crouch.height_scale", self.crouch.height_scale)?;

        non_negative("slide.slide_boost", self.slide.slide_boost)?;
        unit_interval("slide.slide_drag_ratio", self.slide.slide_drag_ratio)?;
        non_negative("slide.minimum_slide_speed", self.slide.minimum_slide_speed)?;
        positive("slide.slope_force_angle", self.slide.slope_force_angle)?;

        positive("climb.climb_time", self.climb.climb_time)?;
        non_negative("climb.climb_speed", self.climb.climb_speed)?;
        positive("climb.detection_distance", self.climb.detection_distance)?;
        positive("climb.sphere_radius", self.climb.sphere_radius)?;
        positive("climb.max_wall_look_angle", self.climb.max_wall_look_angle)?;
        if self.climb.wall_recheck_factor < 1.0 {
            return Err(LocomotionError::InvalidConfig {
                field: "climb.wall_recheck_factor",
                reason: "must be at least 1",
            });
        }
        unit_interval("climb.same_wall_dot", self.climb.same_wall_dot)?;

        non_negative("sensors.slope_angle_threshold", self.sensors.slope_angle_threshold)?;

        positive("body.height", self.body.height)?;
        positive("body.thickness", self.body.thickness)?;
        if !(0.0..1.0).contains(&self.body.step_height_ratio) {
            return Err(LocomotionError::InvalidConfig {
                field: "body.step_height_ratio",
                reason: "must be at least 0 and below 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LocomotionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement.movement_speed, 5.0);
        assert_eq!(config.jump.coyote_time, 0.15);
        assert_eq!(config.slide.minimum_slide_speed, 1.0);
        assert_eq!(config.body.step_height_ratio, 0.1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LocomotionConfig::from_toml(
            r#"
            [movement]
            movement_speed = 7.5

            [climb]
            climb_time = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.movement.movement_speed, 7.5);
        assert_eq!(config.movement.ground_drag, 6.0);
        assert_eq!(config.climb.climb_time, 2.0);
        assert_eq!(config.climb.sphere_radius, 0.5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = LocomotionConfig::default();
        config.climb.climb_time = 0.0;
        assert!(matches!(
            config.validate(),
            Err(LocomotionError::InvalidConfig {
                field: "climb.climb_time",
                ..
            })
        ));

        let mut config = LocomotionConfig::default();
        config.body.step_height_ratio = 1.0;
        assert!(config.validate().is_err());

        let mut config = LocomotionConfig::default();
        config.movement.movement_speed = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let result = LocomotionConfig::from_toml("[movement]\nmovement_speed = \"fast\"");
        assert!(matches!(result, Err(LocomotionError::Parse(_))));
    }
}
