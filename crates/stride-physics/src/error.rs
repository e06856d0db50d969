//! Physics backend errors

use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Errors raised while binding a character to the physics world
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("Rigid body {0:?} is not part of the physics world")]
    MissingBody(RigidBodyHandle),

    #[error("Collider {0:?} is not part of the physics world")]
    MissingCollider(ColliderHandle),

    #[error("Collider {collider:?} is not attached to rigid body {body:?}")]
    DetachedCollider {
        body: RigidBodyHandle,
        collider: ColliderHandle,
    },
}
