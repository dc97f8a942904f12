// Rigid transform utilities for instancing primitives.
//
// Rotations are about a single coordinate axis and act only on the two
// components orthogonal to it.

use crate::{Aabb, Vec3};

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Indices `(a, b)` of the two components rotated by this axis, ordered so
    /// that a positive angle turns `b` towards `a` (right-handed).
    fn plane(self) -> (usize, usize) {
        match self {
            Axis::X => (2, 1),
            Axis::Y => (0, 2),
            Axis::Z => (1, 0),
        }
    }
}

/// A rotation about one coordinate axis.
///
/// The angle is given in degrees and converted once; only its sine and
/// cosine are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    axis: Axis,
    sin_theta: f32,
    cos_theta: f32,
}

impl Rotation {
    pub fn new(axis: Axis, degrees: f32) -> Self {
        let (sin_theta, cos_theta) = degrees.to_radians().sin_cos();
        Self {
            axis,
            sin_theta,
            cos_theta,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Map a world-space point or vector into object space (inverse rotation).
    pub fn to_object(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v;
        out[a] = self.cos_theta * v[a] - self.sin_theta * v[b];
        out[b] = self.sin_theta * v[a] + self.cos_theta * v[b];
        out
    }

    /// Map an object-space point or vector into world space.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        let (a, b) = self.axis.plane();
        let mut out = v;
        out[a] = self.cos_theta * v[a] + self.sin_theta * v[b];
        out[b] = -self.sin_theta * v[a] + self.cos_theta * v[b];
        out
    }
}

/// Transform an axis-aligned bounding box.
///
/// Maps all 8 corners and returns the box enclosing the results.
pub fn transform_aabb(aabb: &Aabb, map: impl Fn(Vec3) -> Vec3) -> Aabb {
    if aabb.is_empty() {
        return *aabb;
    }

    let corners = aabb.corners();
    let first = map(corners[0]);
    let (min, max) = corners[1..]
        .iter()
        .map(|&corner| map(corner))
        .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

    Aabb::from_points(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_rotation_round_trip() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let rotation = Rotation::new(axis, 37.0);
            assert!(approx_eq(rotation.to_world(rotation.to_object(p)), p));
            assert!(approx_eq(rotation.to_object(rotation.to_world(p)), p));
        }
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // +90 degrees about Y takes +X to -Z.
        let rotation = Rotation::new(Axis::Y, 90.0);
        assert!(approx_eq(rotation.to_world(Vec3::X), -Vec3::Z));
        assert!(approx_eq(rotation.to_world(Vec3::Y), Vec3::Y));
    }

    #[test]
    fn test_rotation_x_and_z_are_right_handed() {
        let about_x = Rotation::new(Axis::X, 90.0);
        assert!(approx_eq(about_x.to_world(Vec3::Y), Vec3::Z));
        assert!(approx_eq(about_x.to_world(Vec3::Z), -Vec3::Y));

        let about_z = Rotation::new(Axis::Z, 90.0);
        assert!(approx_eq(about_z.to_world(Vec3::X), Vec3::Y));
        assert!(approx_eq(about_z.to_world(Vec3::Y), -Vec3::X));
    }

    #[test]
    fn test_rotation_preserves_axis_component() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Rotation::new(Axis::X, 30.0).to_world(p).x, 1.0);
        assert_eq!(Rotation::new(Axis::Z, 30.0).to_world(p).z, 3.0);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let moved = transform_aabb(&aabb, |p| p + Vec3::new(10.0, 0.0, 0.0));

        assert!((moved.x.min - 10.0).abs() < 1e-5);
        assert!((moved.x.max - 11.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_rotation_encloses_corners() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let rotation = Rotation::new(Axis::Y, 45.0);
        let rotated = transform_aabb(&aabb, |p| rotation.to_world(p));

        for corner in aabb.corners() {
            let p = rotation.to_world(corner);
            assert!(rotated.x.min <= p.x + 1e-5 && p.x - 1e-5 <= rotated.x.max);
            assert!(rotated.z.min <= p.z + 1e-5 && p.z - 1e-5 <= rotated.z.max);
        }
    }
}
