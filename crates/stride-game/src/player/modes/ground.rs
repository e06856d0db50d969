//! Grounded mode

use stride_physics::CharacterBackend;

use crate::player::controller::Motor;

pub(super) fn enter<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    motor.core.ground.set_extended_range(true);
    motor.core.crouch.exiting = false;
    motor.core.climb.exiting = false;
    motor.setup_lerp_to_default_speed();
}

pub(super) fn exit<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    motor.core.coyote.start();
    motor.core.ground.set_extended_range(false);
}
