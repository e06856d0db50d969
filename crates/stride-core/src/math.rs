//! Vector helpers shared by sensors and movement policies

use glam::{Vec2, Vec3};

/// World up axis
pub const UP: Vec3 = Vec3::Y;

/// Remove the component of `v` along `normal`, leaving its projection on the plane
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

/// Component of `v` along `axis`
pub fn component_along(v: Vec3, axis: Vec3) -> Vec3 {
    let a = axis.normalize_or_zero();
    a * v.dot(a)
}

/// Unsigned angle between two vectors in degrees (0 when either is zero)
pub fn angle_degrees(a: Vec3, b: Vec3) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Clamp a 2D stick or key vector to unit length, keeping shorter vectors as-is
pub fn clamp_unit(v: Vec2) -> Vec2 {
    if v.length_squared() > 1.0 {
        v.normalize()
    } else {
        v
    }
}

/// Linear interpolation with `t` clamped to [0, 1]
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
