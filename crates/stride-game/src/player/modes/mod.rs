//! Per-state movement policies
//!
//! Each mode is a set of free functions over the shared [`Motor`] context. Dispatch is a
//! plain `match` on the state tag.

mod climb;
mod crouch;
mod ground;
mod jump;
mod slide;

pub use climb::ClimbGuard;
pub use crouch::CrouchGuard;
pub use jump::JumpGuard;

use stride_physics::CharacterBackend;

use super::controller::{Motor, MotorState};
use super::machine::{FrameHooks, StateHooks};
use super::state::MovementState;

impl<B: CharacterBackend + ?Sized> StateHooks for Motor<'_, B> {
    fn on_enter(&mut self, state: MovementState) {
        match state {
            MovementState::Grounded => ground::enter(self),
            MovementState::Jumping => jump::enter(self),
            MovementState::Crouching => crouch::enter(self),
            MovementState::Sliding => slide::enter(self),
            MovementState::Climbing => climb::enter(self),
            MovementState::Rising | MovementState::Falling => {}
        }
    }

    fn on_exit(&mut self, state: MovementState) {
        match state {
            MovementState::Grounded => ground::exit(self),
            MovementState::Jumping => jump::exit(self),
            MovementState::Crouching => crouch::exit(self),
            MovementState::Sliding => slide::exit(self),
            MovementState::Climbing => climb::exit(self),
            MovementState::Rising | MovementState::Falling => {}
        }
    }

    fn on_fixed_tick(&mut self, state: MovementState) {
        match state {
            MovementState::Sliding => slide::fixed_tick(self),
            MovementState::Climbing => climb::fixed_tick(self),
            _ => self.calculate_velocity(state.profile().speed_ratio),
        }
    }
}

impl FrameHooks for MotorState {
    fn on_tick(&mut self, state: MovementState, dt: f32) {
        if state == MovementState::Climbing {
            climb::tick(self, dt);
        }
    }
}
