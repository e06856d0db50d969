//! Backend traits the locomotion core talks to
//!
//! The controller never sees rapier types. It drives a body through [`PhysicsBody`] and
//! senses the level through [`CollisionQuery`], so tests can swap in a scripted backend.

use glam::Vec3;

/// How a force vector is applied to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, integrated over the next physics step
    Force,
    /// Instant change in momentum
    Impulse,
}

/// Result of a downward ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

/// Result of a swept sphere cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Distance the sphere travelled before touching
    pub distance: f32,
    /// World-space contact point
    pub point: Vec3,
    /// Surface normal at the contact, facing back towards the caster
    pub normal: Vec3,
}

/// Mutation and readback of a character's rigid body
pub trait PhysicsBody {
    /// Apply a force or impulse through the body's center of mass
    fn apply_force(&mut self, force: Vec3, mode: ForceMode);

    /// Add a velocity change directly, ignoring mass
    fn apply_velocity_delta(&mut self, delta: Vec3);

    /// Current linear velocity
    fn velocity(&self) -> Vec3;

    /// Current center position
    fn position(&self) -> Vec3;

    /// Linear drag coefficient
    fn set_drag(&mut self, drag: f32);

    /// Stop the body from tipping over
    fn freeze_rotation(&mut self);

    /// Toggle the world's built-in gravity for this body
    fn use_gravity(&mut self, enabled: bool);

    /// Swap the collision capsule for one with a new total height and radius, keeping the
    /// bottom of the capsule where it was
    fn resize_collider(&mut self, height: f32, radius: f32);
}

/// Level queries made on behalf of one character (its own collider is never hit)
pub trait CollisionQuery {
    /// Cast a ray straight down from `origin`
    fn cast_down(&self, origin: Vec3, length: f32, mask: u32) -> Option<RayHit>;

    /// Sweep a sphere from `origin` along `direction`
    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        length: f32,
        mask: u32,
    ) -> Option<SphereHit>;
}

/// Everything a locomotion controller needs from the physics side
pub trait CharacterBackend: PhysicsBody + CollisionQuery {}

impl<T: PhysicsBody + CollisionQuery + ?Sized> CharacterBackend for T {}
