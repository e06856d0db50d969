//! Sliding mode

use stride_physics::{CharacterBackend, ForceMode};

use super::crouch;
use crate::player::controller::Motor;
use crate::player::state::MovementState;

pub(super) fn enter<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let direction = motor.move_velocity().normalize_or_zero();
    let boost = motor.core.config.slide.slide_boost;
    if direction != glam::Vec3::ZERO {
        motor.body.apply_force(direction * boost, ForceMode::Impulse);
    }

    crouch::crouch_down(motor);
    crouch::push_down(motor);

    // The slide keeps whatever speed it starts with as its cap
    let flat_speed = motor.flat_velocity().length();
    motor.core.speed.set_max_speed(flat_speed);
}

pub(super) fn exit<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    crouch::stand_up(motor);
    motor.core.crouch.exiting = true;
    motor.core.coyote.start();
}

pub(super) fn fixed_tick<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    motor.calculate_velocity(MovementState::Sliding.profile().speed_ratio);

    let slope = motor.core.slope;
    if slope.is_flat() {
        return;
    }
    let slide = &motor.core.config.slide;
    let strength = motor.core.config.movement.movement_speed * slope.angle / slide.slope_force_angle;
    motor.body.apply_force(slope.downhill() * strength, ForceMode::Impulse);
}
