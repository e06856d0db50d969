//! Climbing mode

use glam::Vec3;
use stride_core::math::UP;
use stride_core::CountdownTimer;
use stride_physics::CharacterBackend;

use crate::player::controller::{Motor, MotorState};
use crate::player::state::MovementState;

/// Climb bookkeeping that outlives a single climb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbGuard {
    /// Set when a climb ends, cleared on landing
    pub exiting: bool,
    /// Normal of the wall most recently climbed
    pub last_wall_normal: Option<Vec3>,
    /// Time left in the current climb
    pub timer: CountdownTimer,
}

impl ClimbGuard {
    pub fn new(climb_time: f32) -> Self {
        Self {
            exiting: false,
            last_wall_normal: None,
            timer: CountdownTimer::new(climb_time),
        }
    }
}

pub(super) fn enter<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let climb = &mut motor.core.climb;
    if let Some(wall) = motor.core.wall.contact() {
        climb.last_wall_normal = Some(wall.normal);
    }
    climb.timer.start();
}

pub(super) fn exit<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    let climb = &mut motor.core.climb;
    climb.exiting = true;
    climb.timer.stop();
    if let Some(wall) = motor.core.wall.contact() {
        climb.last_wall_normal = Some(wall.normal);
    }
}

pub(super) fn fixed_tick<B: CharacterBackend + ?Sized>(motor: &mut Motor<'_, B>) {
    motor.calculate_velocity(MovementState::Climbing.profile().speed_ratio);

    let climb_speed = motor.core.config.climb.climb_speed;
    let rise_speed = motor.body.velocity().dot(UP);
    motor.body.apply_velocity_delta(UP * (climb_speed - rise_speed));
}

pub(super) fn tick(core: &mut MotorState, dt: f32) {
    core.climb.timer.tick(dt);
}
