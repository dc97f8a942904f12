//! Homogeneous participating medium (smoke, fog) bounded by another primitive.

use crate::texture::Texture;
use crate::{
    hittable::{HitRecord, Hittable},
    Material, Primitive, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::{Rng, RngCore};

/// Constant-density volume filling a closed boundary.
///
/// A ray passing through scatters at an exponentially distributed distance;
/// when it does, the phase function is isotropic.
#[derive(Clone)]
pub struct ConstantMedium {
    boundary: Box<Primitive>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: impl Into<Primitive>, density: f32, albedo: impl Into<Texture>) -> Self {
        Self {
            boundary: Box::new(boundary.into()),
            neg_inv_density: -1.0 / density,
            phase_function: Material::isotropic(albedo),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clipped to the query range
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.0001, f32::INFINITY), rng)?;

        let t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        let t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * rng.gen::<f32>().ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        // Normal and facing are arbitrary inside a volume
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
