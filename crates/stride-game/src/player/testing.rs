//! Scripted backend for unit tests

use glam::Vec3;
use stride_core::math::UP;
use stride_physics::{CollisionQuery, ForceMode, PhysicsBody, RayHit, SphereHit};

/// Unit-mass body over an infinite ground plane, with an optional wall straight ahead
#[derive(Debug, Clone)]
pub struct MockBackend {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Height of the ground plane, `None` for a bottomless void
    pub ground: Option<f32>,
    pub ground_normal: Vec3,
    /// Distance and normal of the wall any sphere cast sees
    pub wall: Option<(f32, Vec3)>,
    pub drag: f32,
    pub gravity_enabled: bool,
    pub rotation_frozen: bool,
    /// Last collider size as (height, radius)
    pub collider: Option<(f32, f32)>,
    pub impulses: Vec<Vec3>,
    pub forces: Vec<Vec3>,
    pending_force: Vec3,
}

impl MockBackend {
    /// Body whose position sits `height` above a ground plane at zero
    pub fn on_ground(height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, height, 0.0),
            velocity: Vec3::ZERO,
            ground: Some(0.0),
            ground_normal: UP,
            wall: None,
            drag: 0.0,
            gravity_enabled: true,
            rotation_frozen: false,
            collider: None,
            impulses: Vec::new(),
            forces: Vec::new(),
            pending_force: Vec3::ZERO,
        }
    }

    /// Body with nothing below it
    pub fn in_air(height: f32) -> Self {
        Self {
            ground: None,
            ..Self::on_ground(height)
        }
    }

    /// Integrate pending forces, drag and velocity over one physics step
    pub fn step(&mut self, dt: f32) {
        self.velocity += self.pending_force * dt;
        self.pending_force = Vec3::ZERO;
        self.velocity *= 1.0 / (1.0 + self.drag * dt);
        self.position += self.velocity * dt;
    }
}

impl PhysicsBody for MockBackend {
    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::Force => {
                self.forces.push(force);
                self.pending_force += force;
            }
            ForceMode::Impulse => {
                self.impulses.push(force);
                self.velocity += force;
            }
        }
    }

    fn apply_velocity_delta(&mut self, delta: Vec3) {
        self.velocity += delta;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
    }

    fn freeze_rotation(&mut self) {
        self.rotation_frozen = true;
    }

    fn use_gravity(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    fn resize_collider(&mut self, height: f32, radius: f32) {
        self.collider = Some((height, radius));
    }
}

impl CollisionQuery for MockBackend {
    fn cast_down(&self, origin: Vec3, length: f32, _mask: u32) -> Option<RayHit> {
        let ground = self.ground?;
        let distance = origin.y - ground;
        (0.0..=length).contains(&distance).then(|| RayHit {
            distance,
            point: Vec3::new(origin.x, ground, origin.z),
            normal: self.ground_normal,
        })
    }

    fn cast_sphere(
        &self,
        origin: Vec3,
        _radius: f32,
        direction: Vec3,
        length: f32,
        _mask: u32,
    ) -> Option<SphereHit> {
        let (distance, normal) = self.wall?;
        (distance <= length).then(|| SphereHit {
            distance,
            point: origin + direction * distance,
            normal,
        })
    }
}
