//! Crouching mode and the collider shrink shared with sliding

use stride_core::math::UP;
use stride_physics::{CharacterBackend, ForceMode};

use crate::player::controller::Motor;

/// Set when a crouch or slide ends, cleared when Grounded is entered or a jump ends.
/// While set, jump presses are ignored, including coyote presses after sliding off a ledge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrouchGuard {
    pub exiting: bool,
}

/// Shrink the collider and ground sensor to crouch height
pub(super) fn crouch_down<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let scale = motor.core.config.crouch.height_scale;
    set_height_scale(motor, scale);
}

/// Restore standing height
pub(super) fn stand_up<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    set_height_scale(motor, 1.0);
}

fn set_height_scale<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>, scale: f32) {
    motor.core.ground.set_scale(scale);
    let height = motor.core.ground.collider_height();
    let radius = motor.core.config.body.radius();
    motor.body.resize_collider(height, radius);
}

/// Press the body towards the floor as it shrinks
pub(super) fn push_down<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let impulse = motor.core.config.crouch.crouch_impulse;
    motor.body.apply_force(-UP * impulse, ForceMode::Impulse);
}

pub(super) fn enter<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    crouch_down(motor);
    push_down(motor);
    motor.setup_lerp_to_default_speed();
}

pub(super) fn exit<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    stand_up(motor);
    motor.core.crouch.exiting = true;
}
