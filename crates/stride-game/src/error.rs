//! Locomotion errors

use stride_physics::PhysicsError;

/// Errors that stop a locomotion controller from being set up
#[derive(Debug, thiserror::Error)]
pub enum LocomotionError {
    #[error("Invalid locomotion config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Failed to parse locomotion config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Character body unavailable: {0}")]
    Backend(#[from] PhysicsError),
}
