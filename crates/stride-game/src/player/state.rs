//! Movement states and their per-state capabilities

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a state contributes to the shared movement policies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateProfile {
    /// Fraction of the base move speed this state allows
    pub speed_ratio: f32,
    /// Whether the eased speed cap is enforced while this state is active
    pub speed_limited: bool,
}

impl Default for StateProfile {
    fn default() -> Self {
        Self {
            speed_ratio: 1.0,
            speed_limited: true,
        }
    }
}

/// The locomotion mode a character is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    Grounded,
    Rising,
    /// Starting state, so the character is treated as airborne until the ground sensor
    /// says otherwise
    #[default]
    Falling,
    Jumping,
    Crouching,
    Sliding,
    Climbing,
}

impl MovementState {
    /// Every state, in declaration order
    pub const ALL: [MovementState; 7] = [
        MovementState::Grounded,
        MovementState::Rising,
        MovementState::Falling,
        MovementState::Jumping,
        MovementState::Crouching,
        MovementState::Sliding,
        MovementState::Climbing,
    ];

    /// Speed ratio and speed-limit capability of this state
    pub fn profile(self) -> StateProfile {
        let (speed_ratio, speed_limited) = match self {
            MovementState::Grounded => (1.0, true),
            MovementState::Rising | MovementState::Falling | MovementState::Jumping => (0.8, true),
            MovementState::Crouching => (0.5, true),
            MovementState::Sliding => (0.1, false),
            MovementState::Climbing => (0.6, false),
        };
        StateProfile {
            speed_ratio,
            speed_limited,
        }
    }

    /// Diagnostic name
    pub fn name(self) -> &'static str {
        match self {
            MovementState::Grounded => "Grounded",
            MovementState::Rising => "Rising",
            MovementState::Falling => "Falling",
            MovementState::Jumping => "Jumping",
            MovementState::Crouching => "Crouching",
            MovementState::Sliding => "Sliding",
            MovementState::Climbing => "Climbing",
        }
    }

    /// Whether the character is off the ground and not attached to a wall
    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            MovementState::Rising | MovementState::Falling | MovementState::Jumping
        )
    }
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
