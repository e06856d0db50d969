//! Rigid-body character driven by forces
//!
//! The capsule floats a step's height above the ground; the locomotion layer keeps it
//! there by sampling the ground ray and adjusting vertical velocity.

use glam::Vec3;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::backend::{CollisionQuery, ForceMode, PhysicsBody, RayHit, SphereHit};
use crate::{layer_filter, to_vec3, to_vector, PhysicsError, PhysicsWorld};

/// Character body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBodyConfig {
    /// Standing height including the step gap (default: 2m)
    pub height: f32,
    /// Capsule diameter (default: 1m)
    pub thickness: f32,
    /// Share of the height left open below the capsule for stepping (default: 0.1)
    pub step_height_ratio: f32,
    /// Body mass in kilograms
    pub mass: f32,
    /// Collision groups this body belongs to
    pub collision_layer: u32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            thickness: 1.0,
            step_height_ratio: 0.1,
            mass: 1.0,
            collision_layer: 0b1,
        }
    }
}

impl CharacterBodyConfig {
    /// Height of the capsule itself, without the step gap
    pub fn collider_height(&self) -> f32 {
        self.height * (1.0 - self.step_height_ratio)
    }

    pub fn radius(&self) -> f32 {
        self.thickness * 0.5
    }
}

/// Handles of a spawned character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Build a Y-aligned capsule with the given total height
fn capsule(height: f32, radius: f32) -> SharedShape {
    let radius = radius.min(height * 0.5).max(0.01);
    let half_segment = (height * 0.5 - radius).max(0.0);
    SharedShape::capsule_y(half_segment, radius)
}

impl PhysicsWorld {
    /// Spawn a rotation-locked dynamic capsule centered at `position`
    pub fn spawn_character(
        &mut self,
        config: &CharacterBodyConfig,
        position: Vec3,
    ) -> CharacterHandles {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .can_sleep(false)
            .build();
        let collider = ColliderBuilder::new(capsule(config.collider_height(), config.radius()))
            .mass(config.mass)
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(config.collision_layer),
                Group::ALL,
            ))
            .build();

        let (body, collider) = self.add_body(body, collider);
        tracing::info!(?position, "Spawned character body");
        CharacterHandles { body, collider }
    }
}

/// A spawned character borrowed from the world for one physics tick
pub struct CharacterBody<'w> {
    world: &'w mut PhysicsWorld,
    handles: CharacterHandles,
}

impl<'w> CharacterBody<'w> {
    /// Bind to a spawned character, checking the handles are still live
    pub fn new(world: &'w mut PhysicsWorld, handles: CharacterHandles) -> Result<Self, PhysicsError> {
        if world.bodies.get(handles.body).is_none() {
            return Err(PhysicsError::MissingBody(handles.body));
        }
        let collider = world
            .colliders
            .get(handles.collider)
            .ok_or(PhysicsError::MissingCollider(handles.collider))?;
        if collider.parent() != Some(handles.body) {
            return Err(PhysicsError::DetachedCollider {
                body: handles.body,
                collider: handles.collider,
            });
        }
        Ok(Self { world, handles })
    }

    pub fn handles(&self) -> CharacterHandles {
        self.handles
    }

    fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.world.bodies.get_mut(self.handles.body)
    }

    fn filter(&self, mask: u32) -> QueryFilter<'static> {
        layer_filter(mask).exclude_rigid_body(self.handles.body)
    }
}

impl PhysicsBody for CharacterBody<'_> {
    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        if let Some(body) = self.body_mut() {
            match mode {
                ForceMode::Force => body.add_force(to_vector(force), true),
                ForceMode::Impulse => body.apply_impulse(to_vector(force), true),
            }
        }
    }

    fn apply_velocity_delta(&mut self, delta: Vec3) {
        if let Some(body) = self.body_mut() {
            let velocity = *body.linvel() + to_vector(delta);
            body.set_linvel(velocity, true);
        }
    }

    fn velocity(&self) -> Vec3 {
        self.world
            .body(self.handles.body)
            .map(|body| to_vec3(*body.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    fn position(&self) -> Vec3 {
        self.world
            .body(self.handles.body)
            .map(|body| to_vec3(*body.translation()))
            .unwrap_or(Vec3::ZERO)
    }

    fn set_drag(&mut self, drag: f32) {
        if let Some(body) = self.body_mut() {
            body.set_linear_damping(drag.max(0.0));
        }
    }

    fn freeze_rotation(&mut self) {
        if let Some(body) = self.body_mut() {
            body.lock_rotations(true, true);
        }
    }

    fn use_gravity(&mut self, enabled: bool) {
        if let Some(body) = self.body_mut() {
            body.set_gravity_scale(if enabled { 1.0 } else { 0.0 }, true);
        }
    }

    fn resize_collider(&mut self, height: f32, radius: f32) {
        let Some(collider) = self.world.colliders.get_mut(self.handles.collider) else {
            return;
        };
        let old_height = collider
            .shape()
            .as_capsule()
            .map(|c| 2.0 * (c.half_height() + c.radius))
            .unwrap_or(height);
        let mut local = collider
            .position_wrt_parent()
            .copied()
            .unwrap_or_else(Isometry::identity);
        local.translation.vector.y -= (old_height - height) * 0.5;

        collider.set_shape(capsule(height, radius));
        collider.set_position_wrt_parent(local);
    }
}

impl CollisionQuery for CharacterBody<'_> {
    fn cast_down(&self, origin: Vec3, length: f32, mask: u32) -> Option<RayHit> {
        self.world
            .cast_ray(origin, Vec3::NEG_Y, length, self.filter(mask))
            .map(|hit| RayHit {
                distance: hit.distance,
                point: hit.point,
                normal: hit.normal,
            })
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        length: f32,
        mask: u32,
    ) -> Option<SphereHit> {
        self.world
            .cast_ball(origin, radius, direction, length, self.filter(mask))
            .map(|hit| SphereHit {
                distance: hit.distance,
                point: hit.point,
                normal: hit.normal,
            })
    }
}
