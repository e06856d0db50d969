//! Player locomotion
//!
//! [`LocomotionController`] runs a guarded state machine over seven movement states.
//! Guards read a [`Signals`] snapshot taken after the sensors refresh; the active state's
//! hooks push the body through the backend traits in `stride-physics`.

mod config;
mod controller;
mod events;
mod machine;
mod modes;
mod sensors;
mod signals;
mod speed;
mod state;

#[cfg(test)]
mod testing;

pub use config::{
    ClimbConfig, CrouchConfig, JumpConfig, LocomotionConfig, MovementConfig, SensorConfig,
    SlideConfig,
};
pub use controller::LocomotionController;
pub use events::LocomotionEvent;
pub use machine::{FrameHooks, Guard, StateChange, StateHooks, StateMachine};
pub use modes::{ClimbGuard, CrouchGuard, JumpGuard};
pub use sensors::{GroundSensor, SlopeInfo, WallSensor};
pub use signals::{locomotion_machine, Signals, WallContact};
pub use speed::SpeedBudget;
pub use state::{MovementState, StateProfile};
