//! Jumping mode

use stride_core::math::UP;
use stride_physics::{CharacterBackend, ForceMode};

use crate::player::controller::Motor;
use crate::player::events::LocomotionEvent;

/// Lock half of the jump guard; the key edges live in the jump input latch
///
/// The lock is set by the jump impulse and released when the jump ends or the key comes
/// up, so one press can never produce two jumps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpGuard {
    pub locked: bool,
}

pub(super) fn enter<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    if motor.core.jump.locked {
        return;
    }
    motor.core.jump.locked = true;

    let jump_force = motor.core.config.jump.jump_force;
    motor.body.apply_force(UP * jump_force, ForceMode::Impulse);

    let position = motor.body.position();
    let rise_speed = motor.body.velocity().dot(UP).max(0.0);
    let gravity = motor.core.config.movement.gravity;
    let apex_height = if gravity > 0.0 {
        rise_speed * rise_speed / (2.0 * gravity)
    } else {
        0.0
    };
    motor.core.events.push(LocomotionEvent::Jumped {
        position,
        apex: position + UP * apex_height,
    });
}

pub(super) fn exit<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let rise_speed = motor.body.velocity().dot(UP);
    if rise_speed > 0.0 {
        // Short hop: cut the remaining rise in half
        motor.body.apply_velocity_delta(-UP * rise_speed * 0.5);
    }
    motor.core.jump.locked = false;
    motor.core.crouch.exiting = false;
}
