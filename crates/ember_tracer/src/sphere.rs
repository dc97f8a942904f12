//! Sphere primitive for ray tracing.

use crate::sampling::{random_to_sphere, random_unit_vector};
use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive, optionally moving linearly over the shutter interval.
#[derive(Clone)]
pub struct Sphere {
    /// Center at time 0 is the origin, center at time 1 is origin + direction
    center: Ray,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new stationary sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: Ray::new_simple(center0, center1 - center0),
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Center of the sphere at `time`.
    pub fn center(&self, time: f32) -> Vec3 {
        self.center.at(time)
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// Closest intersection with `ray` inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        if a < 1e-8 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            &self.material,
        ))
    }
}

impl Hittable for Sphere {
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
        // Only stationary spheres are sampled; moving lights use the time-0 center.
        let distance_squared = (self.center(0.0) - origin).length_squared();
        if distance_squared <= self.radius * self.radius {
            // Every direction from inside reaches the surface.
            return 1.0 / (4.0 * PI);
        }

        let ray = Ray::new_simple(origin, direction);
        if self
            .intersect(&ray, Interval::new(0.001, f32::INFINITY))
            .is_none()
        {
            return 0.0;
        }

        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared)
            .max(0.0)
            .sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        if solid_angle <= 0.0 {
            return 0.0;
        }

        1.0 / solid_angle
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center(0.0) - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return random_unit_vector(rng);
        }
        let uvw = Onb::new(direction);
        uvw.transform(random_to_sphere(self.radius, distance_squared, rng))
    }

    fn supports_sampling(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{HittablePdf, Pdf};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Material> {
        Arc::new(Material::lambertian(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let mut rng = StdRng::seed_from_u64(0);

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_sphere_round_trip() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let radius = 1.5;
        let sphere = Sphere::new(center, radius, gray());
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..100 {
            let n = crate::sampling::random_unit_vector(&mut rng);
            let surface = center + radius * n;
            let offset = 0.75;
            let ray = Ray::new_simple(surface + offset * n, -n);

            let rec = sphere
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .unwrap();
            assert!((rec.t - offset).abs() < 1e-3, "t = {}", rec.t);
            assert!(rec.normal.dot(n) > 0.9999);
            assert!(rec.front_face);
            assert!((0.0..=1.0).contains(&rec.u));
            assert!((0.0..=1.0).contains(&rec.v));
        }
    }

    #[test]
    fn test_inside_hit_is_back_face() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal - -Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, gray());
        let mut rng = StdRng::seed_from_u64(0);

        let early = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 1.0);
        let t_range = Interval::new(0.001, f32::INFINITY);

        assert!(sphere.hit(&early, t_range, &mut rng).is_none());
        let rec = sphere.hit(&late, t_range, &mut rng).unwrap();
        assert!((rec.t - 4.5).abs() < 1e-4);

        let bbox = sphere.bounding_box();
        assert!(bbox.contains(Vec3::new(0.0, -0.5, 0.0)));
        assert!(bbox.contains(Vec3::new(0.0, 2.5, 0.0)));
    }

    #[test]
    fn test_uv_poles() {
        let (_, v_bottom) = Sphere::get_sphere_uv(-Vec3::Y);
        let (_, v_top) = Sphere::get_sphere_uv(Vec3::Y);
        let (u, v) = Sphere::get_sphere_uv(Vec3::X);
        assert!(v_bottom.abs() < 1e-6);
        assert!((v_top - 1.0).abs() < 1e-6);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_light_sampling_density() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray());
        let origin = Vec3::ZERO;

        let cos_theta_max = (1.0f32 - 1.0 / 25.0).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));
        assert!((sphere.direction_density(origin, -Vec3::Z) - expected).abs() / expected < 1e-3);
        assert_eq!(sphere.direction_density(origin, Vec3::Z), 0.0);

        // Sampled directions reach the sphere (allowing for grazing roundoff).
        let pdf = HittablePdf::new(&sphere, origin);
        let mut rng = StdRng::seed_from_u64(22);
        let reached = (0..1000)
            .filter(|_| pdf.value(pdf.generate(&mut rng)) > 0.0)
            .count();
        assert!(reached >= 995, "reached {}", reached);
    }

    #[test]
    fn test_density_from_inside_is_normalized() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let origin = Vec3::new(0.0, 0.0, 0.5);
        let mut rng = StdRng::seed_from_u64(23);

        // Integrate the density over the full sphere of directions.
        let n = 20_000;
        let sum: f32 = (0..n)
            .map(|_| {
                let d = crate::sampling::random_unit_vector(&mut rng);
                sphere.direction_density(origin, d) * 4.0 * PI
            })
            .sum();
        let integral = sum / n as f32;
        assert!((integral - 1.0).abs() < 1e-3, "integral = {}", integral);

        // Samples cover directions facing away from the center as well.
        let pdf = HittablePdf::new(&sphere, origin);
        let mut away = 0;
        for _ in 0..1000 {
            let d = pdf.generate(&mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(pdf.value(d) > 0.0);
            if d.z > 0.0 {
                away += 1;
            }
        }
        assert!(away > 400 && away < 600, "away = {}", away);
    }
}
