//! Stride Physics - Physics simulation using rapier3d
//!
//! Owns the rapier world and exposes a rigid-body character that implements the
//! locomotion backend traits.

mod backend;
mod character_body;
mod error;

pub use backend::{CharacterBackend, CollisionQuery, ForceMode, PhysicsBody, RayHit, SphereHit};
pub use character_body::{CharacterBody, CharacterBodyConfig, CharacterHandles};
pub use error::PhysicsError;

use glam::Vec3;
use nalgebra::Isometry3;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Layer mask that matches every collision group
pub const ALL_LAYERS: u32 = u32::MAX;

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/50)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 50.0,
        }
    }
}

/// Rapier solver state that only [`PhysicsWorld::step`] and the queries touch
struct Solver {
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
}

impl Solver {
    fn new(timestep: f32) -> Self {
        let params = IntegrationParameters {
            dt: timestep,
            ..IntegrationParameters::default()
        };
        Self {
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
        }
    }
}

/// Bodies, colliders and the solver that moves them
pub struct PhysicsWorld {
    pub config: PhysicsConfig,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    solver: Solver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            solver: Solver::new(config.timestep),
            config,
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
        }
    }

    /// Advance one fixed step and refresh the query structure
    ///
    /// Forces added with [`ForceMode::Force`] only last for the step they were added in.
    pub fn step(&mut self) {
        let solver = &mut self.solver;
        solver.pipeline.step(
            &to_vector(self.config.gravity),
            &solver.params,
            &mut solver.islands,
            &mut solver.broad_phase,
            &mut solver.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut solver.impulse_joints,
            &mut solver.multibody_joints,
            &mut solver.ccd,
            None,
            &(),
            &(),
        );

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
        self.sync_queries();
    }

    /// Rebuild the query structure; needed after adding colliders outside a step
    pub fn sync_queries(&mut self) {
        self.solver.queries.update(&self.colliders);
    }

    /// Insert a collider with no parent body
    pub fn add_static(&mut self, collider: Collider) -> ColliderHandle {
        self.colliders.insert(collider)
    }

    /// Insert a body with one attached collider
    pub fn add_body(&mut self, body: RigidBody, collider: Collider) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    /// Remove a body together with its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let solver = &mut self.solver;
        self.bodies.remove(
            handle,
            &mut solver.islands,
            &mut self.colliders,
            &mut solver.impulse_joints,
            &mut solver.multibody_joints,
            true,
        );
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// First solid hit along a unit direction
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(point![origin.x, origin.y, origin.z], to_vector(direction));
        let (collider, hit) = self.solver.queries.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;
        Some(RaycastHit {
            collider,
            distance: hit.time_of_impact,
            point: origin + direction * hit.time_of_impact,
            normal: to_vec3(hit.normal),
        })
    }

    /// Sweep a ball along a unit direction and report the first contact
    pub fn cast_ball(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<ShapeHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let shape = Ball::new(radius);
        let shape_pos = Isometry3::translation(origin.x, origin.y, origin.z);
        let shape_vel = to_vector(direction);
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);

        self.solver
            .queries
            .cast_shape(
                &self.bodies,
                &self.colliders,
                &shape_pos,
                &shape_vel,
                &shape,
                options,
                filter,
            )
            .map(|(handle, hit)| {
                let mut normal = to_vec3(hit.normal1.into_inner());
                // Report the side of the surface that faces the sweep
                if normal.dot(direction) > 0.0 {
                    normal = -normal;
                }
                let center = origin + direction * hit.time_of_impact;
                ShapeHit {
                    collider: handle,
                    distance: hit.time_of_impact,
                    point: center - normal * radius,
                    normal,
                }
            })
    }

    /// Infinite floor whose surface sits at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let floor = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .build();
        self.add_static(floor)
    }

    /// Axis-aligned static box, for walls and ledges
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let wall = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(position))
            .friction(0.7)
            .build();
        self.add_static(wall)
    }

    /// Create a static box tilted about the X axis, for ramps
    pub fn create_ramp(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        pitch_degrees: f32,
    ) -> ColliderHandle {
        let pose = Isometry3::new(
            to_vector(position),
            vector![pitch_degrees.to_radians(), 0.0, 0.0],
        );
        let ramp = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(pose)
            .friction(0.7)
            .build();
        self.add_static(ramp)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_vec3(v: Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Ray hit with the collider that was struck
#[derive(Debug, Clone)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Shape sweep hit; `distance` is how far the shape travelled before touching
#[derive(Debug, Clone)]
pub struct ShapeHit {
    pub collider: ColliderHandle,
    pub distance: f32,
    pub point: Vec3,
    /// Faces against the sweep direction
    pub normal: Vec3,
}

/// Build a query filter that only sees colliders whose membership overlaps `mask`
pub fn layer_filter(mask: u32) -> QueryFilter<'static> {
    QueryFilter::new()
        .exclude_sensors()
        .groups(InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(world.config.timestep, 1.0 / 50.0);
    }

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.collider(ground).is_some());
    }

    #[test]
    fn test_cast_ray() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.sync_queries();

        let hit = world
            .cast_ray(
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                100.0,
                QueryFilter::default(),
            )
            .unwrap();
        assert!((hit.distance - 10.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_cast_ball_against_wall() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::new(2.0, 2.0, 0.1), Vec3::new(0.0, 2.0, -3.0));
        world.sync_queries();

        let hit = world
            .cast_ball(
                Vec3::new(0.0, 2.0, 0.0),
                0.5,
                Vec3::new(0.0, 0.0, -1.0),
                10.0,
                QueryFilter::default(),
            )
            .unwrap();
        // Wall face sits at z = -2.9, the ball touches it after 2.4m
        assert!((hit.distance - 2.4).abs() < 1e-2);
        assert!((hit.normal - Vec3::Z).length() < 1e-3);
    }

    #[test]
    fn test_layer_filter_skips_other_layers() {
        let mut world = PhysicsWorld::new();
        let floor = ColliderBuilder::cuboid(5.0, 0.5, 5.0)
            .collision_groups(InteractionGroups::new(Group::GROUP_2, Group::ALL))
            .build();
        world.add_static(floor);
        world.sync_queries();

        let origin = Vec3::new(0.0, 3.0, 0.0);
        assert!(world
            .cast_ray(origin, Vec3::NEG_Y, 10.0, layer_filter(0b01))
            .is_none());
        assert!(world
            .cast_ray(origin, Vec3::NEG_Y, 10.0, layer_filter(0b10))
            .is_some());
    }
}
