//! Notifications for audio and animation listeners

use glam::Vec3;

use super::state::MovementState;

/// Something a listener may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionEvent {
    /// A jump impulse was applied; `apex` is the predicted peak of the jump
    Jumped { position: Vec3, apex: Vec3 },
    /// Ground contact regained after being airborne
    Landed { position: Vec3, impact_speed: f32 },
    /// The active state changed
    StateChanged {
        from: MovementState,
        to: MovementState,
    },
}
