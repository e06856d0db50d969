//! Stride Game - First-person locomotion
//!
//! Provides the locomotion state machine, input latching and look control.

pub mod error;
pub mod input;
pub mod look;
pub mod player;

pub use error::LocomotionError;
pub use input::{InputHandler, InputLatch, InputState};
pub use look::{LookConfig, LookController};
pub use player::{
    ClimbConfig, CrouchConfig, JumpConfig, LocomotionConfig, LocomotionController,
    LocomotionEvent, MovementConfig, MovementState, SensorConfig, SlideConfig, StateProfile,
};
