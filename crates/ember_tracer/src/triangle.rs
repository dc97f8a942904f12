//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// A triangle primitive, flat or with per-vertex normals for smooth shading.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Geometric face normal (unit length, right-handed winding)
    normal: Vec3,
    /// Optional per-vertex shading normals
    normals: Option<[Vec3; 3]>,
    area: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let n = (v1 - v0).cross(v2 - v0);

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            v1,
            v2,
            normal: n.normalize_or_zero(),
            normals: None,
            area: 0.5 * n.length(),
            material,
            // Aabb pads the flat axis itself
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Create a triangle that interpolates per-vertex normals across its face.
    pub fn smooth(
        vertices: [Vec3; 3],
        normals: [Vec3; 3],
        material: Arc<Material>,
    ) -> Self {
        let [v0, v1, v2] = vertices;
        let mut triangle = Self::new(v0, v1, v2, material);
        triangle.normals = Some(normals.map(|n| n.normalize_or_zero()));
        triangle
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    /// Shading normal at barycentric `(u, v)`, on the same side as the face normal.
    fn shading_normal(&self, u: f32, v: f32) -> Vec3 {
        let Some([n0, n1, n2]) = self.normals else {
            return self.normal;
        };
        let n = ((1.0 - u - v) * n0 + u * n1 + v * n2).normalize_or_zero();
        if n == Vec3::ZERO {
            self.normal
        } else if n.dot(self.normal) < 0.0 {
            -n
        } else {
            n
        }
    }

    /// Möller-Trumbore ray-triangle intersection.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        // Facing is decided by the true surface; shading only bends the normal.
        let mut rec = HitRecord::new(ray, t, self.normal, (u, v), &self.material);
        if self.normals.is_some() {
            let shading = self.shading_normal(u, v);
            rec.normal = if rec.front_face { shading } else { -shading };
        }
        Some(rec)
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.intersect(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some(rec) = self.intersect(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(self.normal) / direction.length()).abs();
        if cosine <= 0.0 || self.area <= 0.0 {
            return 0.0;
        }

        distance_squared / (cosine * self.area)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let mut r1 = rng.gen::<f32>();
        let mut r2 = rng.gen::<f32>();
        // Fold the unit square onto the triangle.
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        let p = self.v0 + r1 * (self.v1 - self.v0) + r2 * (self.v2 - self.v0);
        p - origin
    }

    fn supports_sampling(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{HittablePdf, Pdf};
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5)))
    }

    /// Triangle in XY plane at z=-1, facing +Z
    fn facing_origin() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            gray(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_origin();

        // Ray pointing at triangle center
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();

        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
        assert!(rec.u >= 0.0 && rec.v >= 0.0 && rec.u + rec.v <= 1.0);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = facing_origin();
        let t_range = Interval::new(0.001, f32::INFINITY);

        // Ray pointing away
        let away = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.intersect(&away, t_range).is_none());

        // Outside the simplex
        let beside = Ray::new_simple(Vec3::new(0.9, 0.9, 0.0), -Vec3::Z);
        assert!(tri.intersect(&beside, t_range).is_none());

        // In the plane
        let grazing = Ray::new_simple(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);
        assert!(tri.intersect(&grazing, t_range).is_none());
    }

    #[test]
    fn test_back_face_flips_normal() {
        let tri = facing_origin();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let rec = tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_smooth_normals_are_interpolated() {
        let tilt = Vec3::new(1.0, 0.0, 1.0).normalize();
        let tri = Triangle::smooth(
            [
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ],
            [Vec3::Z, tilt, Vec3::Z],
            gray(),
        );

        let ray = Ray::new_simple(Vec3::new(0.3, -0.5, 0.0), -Vec3::Z);
        let rec = tri
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        let expected = ((1.0 - rec.u - rec.v) * Vec3::Z + rec.u * tilt + rec.v * Vec3::Z).normalize();
        assert!(rec.front_face);
        assert!(rec.u > 0.0);
        assert!((rec.normal - expected).length() < 1e-4);
        assert!(rec.normal.x > 0.0);

        // From behind the shading normal is flipped along with the face.
        let back = Ray::new_simple(Vec3::new(0.3, -0.5, -2.0), Vec3::Z);
        let rec = tri
            .intersect(&back, Interval::new(0.001, f32::INFINITY))
            .unwrap();
        assert!(!rec.front_face);
        assert!((rec.normal + expected).length() < 1e-4);
    }

    #[test]
    fn test_triangle_light_density() {
        let tri = facing_origin();
        assert!((tri.area() - 2.0).abs() < 1e-6);

        // Straight on at distance 1: 1 / area.
        let d = tri.direction_density(Vec3::ZERO, -Vec3::Z);
        assert!((d - 0.5).abs() < 1e-5);
        assert_eq!(tri.direction_density(Vec3::ZERO, Vec3::Z), 0.0);

        let pdf = HittablePdf::new(&tri, Vec3::new(0.2, 0.1, 1.0));
        let mut rng = StdRng::seed_from_u64(41);
        let reached = (0..500)
            .filter(|_| pdf.value(pdf.generate(&mut rng)) > 0.0)
            .count();
        assert!(reached >= 495, "reached {}", reached);
    }
}
