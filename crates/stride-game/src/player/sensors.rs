//! Ground and wall sensing
//!
//! Sensors turn raw backend casts into the facts movement cares about: whether the
//! character stands on something, how far it floats above it, and whether a climbable
//! wall is in front of it.

use glam::Vec3;
use stride_core::math::{angle_degrees, UP};
use stride_physics::{CharacterBodyConfig, CollisionQuery, RayHit};

use super::signals::WallContact;

const SAFETY_DISTANCE: f32 = 0.001;

/// Downward ray under the collider center
#[derive(Debug, Clone)]
pub struct GroundSensor {
    height: f32,
    thickness: f32,
    step_height_ratio: f32,
    mask: u32,
    extended_range: bool,
    scale: f32,
    /// Center offset the last cast was made from
    cast_offset: Vec3,
    hit: Option<RayHit>,
}

impl GroundSensor {
    pub fn new(body: &CharacterBodyConfig, mask: u32) -> Self {
        Self {
            height: body.height,
            thickness: body.thickness,
            step_height_ratio: body.step_height_ratio,
            mask,
            extended_range: true,
            scale: 1.0,
            cast_offset: Vec3::ZERO,
            hit: None,
        }
    }

    /// Reach one step further down, so walking down stairs or slopes keeps contact
    pub fn set_extended_range(&mut self, extended: bool) {
        self.extended_range = extended;
    }

    /// Height multiplier, below one while crouched
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Capsule height at the current scale, without the step gap
    pub fn collider_height(&self) -> f32 {
        self.height * self.scale * (1.0 - self.step_height_ratio)
    }

    /// Offset from the body position to the collider center
    ///
    /// Shrinking keeps the capsule bottom in place, so the center drops with the scale.
    pub fn center_offset(&self) -> Vec3 {
        let standing = self.height * (1.0 - self.step_height_ratio);
        -UP * (standing - self.collider_height()) * 0.5
    }

    /// Target distance from the collider center to the ground
    pub fn stance_height(&self) -> f32 {
        self.collider_height() * 0.5 + self.height * self.scale * self.step_height_ratio
    }

    /// Ray length for the current range and scale
    pub fn cast_length(&self) -> f32 {
        let length = self.collider_height() * 0.5 + self.thickness + SAFETY_DISTANCE;
        let base = length * (1.0 + SAFETY_DISTANCE);
        if self.extended_range {
            base + self.height * self.scale * self.step_height_ratio
        } else {
            base
        }
    }

    /// Cast from the collider center of a body at `body_position`
    pub fn refresh<Q: CollisionQuery + ?Sized>(&mut self, query: &Q, body_position: Vec3) {
        self.cast_offset = self.center_offset();
        let origin = body_position + self.cast_offset;
        self.hit = query.cast_down(origin, self.cast_length(), self.mask);
    }

    pub fn is_grounded(&self) -> bool {
        self.hit.is_some()
    }

    /// Distance from the collider center to the ground, if any
    ///
    /// Corrected for a resize since the last cast, so a stand-up on the same tick does
    /// not read as floating.
    pub fn distance(&self) -> Option<f32> {
        let shift = (self.center_offset() - self.cast_offset).dot(UP);
        self.hit.map(|hit| hit.distance + shift)
    }

    /// Ground normal, or world up when nothing was hit
    pub fn normal(&self) -> Vec3 {
        self.hit.map_or(UP, |hit| hit.normal)
    }

    /// Vertical velocity that closes the stance-height error within one physics tick
    pub fn adjustment_velocity(&self, fixed_dt: f32) -> Vec3 {
        match self.distance() {
            Some(distance) if fixed_dt > 0.0 => UP * ((self.stance_height() - distance) / fixed_dt),
            _ => Vec3::ZERO,
        }
    }
}

/// Ground slope under the character, refreshed once per physics tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeInfo {
    /// Surface normal, world up when airborne or nearly flat
    pub normal: Vec3,
    pub grounded: bool,
    /// Angle between the surface normal and world up (degrees)
    pub angle: f32,
}

impl Default for SlopeInfo {
    fn default() -> Self {
        Self {
            normal: UP,
            grounded: false,
            angle: 0.0,
        }
    }
}

impl SlopeInfo {
    /// Derive slope information from a refreshed ground sensor
    pub fn from_sensor(sensor: &GroundSensor, flat_threshold: f32) -> Self {
        if !sensor.is_grounded() {
            return Self::default();
        }
        let normal = sensor.normal();
        let angle = angle_degrees(UP, normal);
        if angle < flat_threshold {
            return Self {
                grounded: true,
                ..Self::default()
            };
        }
        Self {
            normal,
            grounded: true,
            angle,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.normal == UP
    }

    /// Unit vector pointing down the slope, zero on flat ground
    pub fn downhill(&self) -> Vec3 {
        if self.is_flat() {
            return Vec3::ZERO;
        }
        let across = self.normal.cross(UP);
        self.normal.cross(across).normalize_or_zero()
    }
}

/// Forward sphere cast that looks for climbable walls
#[derive(Debug, Clone)]
pub struct WallSensor {
    radius: f32,
    distance: f32,
    recheck_factor: f32,
    same_wall_dot: f32,
    mask: u32,
    contact: Option<WallContact>,
}

impl WallSensor {
    pub fn new(radius: f32, distance: f32, recheck_factor: f32, same_wall_dot: f32, mask: u32) -> Self {
        Self {
            radius,
            distance,
            recheck_factor,
            same_wall_dot,
            mask,
            contact: None,
        }
    }

    /// Sweep along `forward` from `origin`
    ///
    /// When the regular sweep misses and `hold_normal` is set (the character is on a
    /// wall), a longer sweep runs and only counts if it finds the same wall again.
    pub fn refresh<Q: CollisionQuery + ?Sized>(
        &mut self,
        query: &Q,
        origin: Vec3,
        forward: Vec3,
        hold_normal: Option<Vec3>,
    ) {
        let forward = forward.normalize_or_zero();
        let look_at = |normal: Vec3| WallContact {
            normal,
            look_angle: angle_degrees(forward, -normal),
        };

        self.contact = query
            .cast_sphere(origin, self.radius, forward, self.distance, self.mask)
            .map(|hit| look_at(hit.normal));

        if self.contact.is_none() {
            if let Some(previous) = hold_normal {
                let extended = self.distance * self.recheck_factor;
                self.contact = query
                    .cast_sphere(origin, self.radius, forward, extended, self.mask)
                    .filter(|hit| self.is_same_wall(hit.normal, previous))
                    .map(|hit| look_at(hit.normal));
            }
        }
    }

    pub fn contact(&self) -> Option<WallContact> {
        self.contact
    }

    /// Whether two wall normals belong to the same surface
    pub fn is_same_wall(&self, a: Vec3, b: Vec3) -> bool {
        a.normalize_or_zero().dot(b.normalize_or_zero()) >= self.same_wall_dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::MockBackend;

    fn sensor() -> GroundSensor {
        GroundSensor::new(&CharacterBodyConfig::default(), u32::MAX)
    }

    #[test]
    fn test_ground_sensor_dimensions() {
        let mut sensor = sensor();
        assert!((sensor.collider_height() - 1.8).abs() < 1e-5);
        assert!((sensor.stance_height() - 1.1).abs() < 1e-5);
        let base = (0.9 + 1.0 + 0.001) * 1.001;
        assert!((sensor.cast_length() - (base + 0.2)).abs() < 1e-4);

        sensor.set_extended_range(false);
        assert!((sensor.cast_length() - base).abs() < 1e-4);
        assert_eq!(sensor.center_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_crouched_sensor_keeps_feet_in_place() {
        let mut sensor = sensor();
        sensor.set_scale(0.5);
        assert!((sensor.collider_height() - 0.9).abs() < 1e-5);
        assert!((sensor.center_offset().y + 0.45).abs() < 1e-5);
        assert!((sensor.stance_height() - 0.55).abs() < 1e-5);
    }

    #[test]
    fn test_distance_follows_resize() {
        let backend = MockBackend::on_ground(1.0);
        let mut sensor = sensor();
        sensor.set_scale(0.5);
        sensor.refresh(&backend, backend.position);
        assert!((sensor.distance().unwrap() - 0.55).abs() < 1e-5);

        // Standing up moves the center back up before the next cast
        sensor.set_scale(1.0);
        assert!((sensor.distance().unwrap() - 1.0).abs() < 1e-5);
        assert!((sensor.adjustment_velocity(0.02).y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_ground_adjustment_velocity() {
        let mut backend = MockBackend::on_ground(1.0);
        let mut sensor = sensor();
        sensor.refresh(&backend, backend.position);

        assert!(sensor.is_grounded());
        assert_eq!(sensor.distance(), Some(1.0));
        // Stance is 1.1 above ground, so close 0.1m over a 0.02s tick
        let adjust = sensor.adjustment_velocity(0.02);
        assert!((adjust.y - 5.0).abs() < 1e-3);

        backend.ground = None;
        sensor.refresh(&backend, backend.position);
        assert!(!sensor.is_grounded());
        assert_eq!(sensor.adjustment_velocity(0.02), Vec3::ZERO);
        assert_eq!(sensor.normal(), UP);
    }

    #[test]
    fn test_ground_out_of_range() {
        let backend = MockBackend::on_ground(3.0);
        let mut sensor = sensor();
        sensor.refresh(&backend, backend.position);
        assert!(!sensor.is_grounded());
    }

    #[test]
    fn test_slope_info() {
        let mut backend = MockBackend::on_ground(1.1);
        let mut sensor = sensor();

        sensor.refresh(&backend, backend.position);
        let flat = SlopeInfo::from_sensor(&sensor, 1.0);
        assert!(flat.grounded && flat.is_flat());
        assert_eq!(flat.downhill(), Vec3::ZERO);

        // 20 degree slope falling away towards +X
        let tilt = 20f32.to_radians();
        backend.ground_normal = Vec3::new(tilt.sin(), tilt.cos(), 0.0);
        sensor.refresh(&backend, backend.position);
        let slope = SlopeInfo::from_sensor(&sensor, 1.0);
        assert!((slope.angle - 20.0).abs() < 1e-3);
        let downhill = slope.downhill();
        assert!(downhill.x > 0.0 && downhill.y < 0.0);
        assert!(downhill.dot(slope.normal).abs() < 1e-5);

        // Below the threshold the slope reads as flat
        let gentle = SlopeInfo::from_sensor(&sensor, 25.0);
        assert!(gentle.is_flat());
    }

    #[test]
    fn test_wall_sensor_angle_and_recheck() {
        let mut backend = MockBackend::on_ground(1.1);
        backend.wall = Some((0.3, Vec3::Z));
        let mut sensor = WallSensor::new(0.5, 0.55, 1.5, 0.99, u32::MAX);

        sensor.refresh(&backend, Vec3::ZERO, Vec3::NEG_Z, None);
        let contact = sensor.contact().unwrap();
        assert!(contact.look_angle < 1e-3);

        // Looking 45 degrees away from the wall
        let skew = Vec3::new(1.0, 0.0, -1.0).normalize();
        sensor.refresh(&backend, Vec3::ZERO, skew, None);
        assert!((sensor.contact().unwrap().look_angle - 45.0).abs() < 1e-3);

        // Wall just past the regular distance only counts while holding onto it
        backend.wall = Some((0.7, Vec3::Z));
        sensor.refresh(&backend, Vec3::ZERO, Vec3::NEG_Z, None);
        assert!(sensor.contact().is_none());
        sensor.refresh(&backend, Vec3::ZERO, Vec3::NEG_Z, Some(Vec3::Z));
        assert!(sensor.contact().is_some());
        sensor.refresh(&backend, Vec3::ZERO, Vec3::NEG_Z, Some(Vec3::X));
        assert!(sensor.contact().is_none());
    }
}
