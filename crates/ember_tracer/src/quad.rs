//! Planar parallelogram primitive and the axis-aligned box built from it.

use crate::list::PrimitiveList;
use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// A parallelogram spanned by edges `u` and `v` from corner `q`.
#[derive(Clone)]
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// n / |n|^2, projects hit offsets onto plane coordinates
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let n_len_sq = n.length_squared();
        let w = if n_len_sq > 0.0 { n / n_len_sq } else { Vec3::ZERO };

        // Bounding box of the two diagonals
        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Closest intersection with `ray` inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane (or degenerate quad)
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hitpt = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        if !Interval::UNIT.contains(alpha) || !Interval::UNIT.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (alpha, beta),
            &self.material,
        ))
    }
}

impl Hittable for Quad {
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
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        if cosine <= 0.0 || self.area <= 0.0 {
            return 0.0;
        }

        distance_squared / (cosine * self.area)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + rng.gen::<f32>() * self.u + rng.gen::<f32>() * self.v;
        p - origin
    }

    fn supports_sampling(&self) -> bool {
        true
    }
}

/// The six faces of the axis-aligned box with opposite corners `a` and `b`.
pub fn cuboid(a: Vec3, b: Vec3, material: Arc<Material>) -> PrimitiveList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = PrimitiveList::new();
    // front, right, back, left, top, bottom
    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material));
    sides
}
