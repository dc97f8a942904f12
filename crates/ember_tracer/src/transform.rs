//! Instancing wrappers that move or rotate a child primitive.
//!
//! The child is never modified: rays are taken into its object space and
//! hits are brought back to world space.

use crate::{
    hittable::{HitRecord, Hittable},
    Primitive, Ray,
};
use ember_math::{transform_aabb, Aabb, Axis, Interval, Rotation, Vec3};
use rand::RngCore;

/// A child primitive displaced by `offset`.
#[derive(Clone)]
pub struct Translate {
    object: Box<Primitive>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: impl Into<Primitive>, offset: Vec3) -> Self {
        let object = object.into();
        let bbox = object.bounding_box().translate(offset);
        Self {
            object: Box::new(object),
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&offset_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.direction_density(origin - self.offset, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.sample_direction(origin - self.offset, rng)
    }

    fn supports_sampling(&self) -> bool {
        self.object.supports_sampling()
    }
}

/// A child primitive rotated about a coordinate axis through the origin.
#[derive(Clone)]
pub struct Rotate {
    object: Box<Primitive>,
    rotation: Rotation,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate `object` by `degrees` about `axis`.
    pub fn new(object: impl Into<Primitive>, axis: Axis, degrees: f32) -> Self {
        let object = object.into();
        let rotation = Rotation::new(axis, degrees);
        let bbox = transform_aabb(&object.bounding_box(), |p| rotation.to_world(p));
        Self {
            object: Box::new(object),
            rotation,
            bbox,
        }
    }

    pub fn x(object: impl Into<Primitive>, degrees: f32) -> Self {
        Self::new(object, Axis::X, degrees)
    }

    pub fn y(object: impl Into<Primitive>, degrees: f32) -> Self {
        Self::new(object, Axis::Y, degrees)
    }

    pub fn z(object: impl Into<Primitive>, degrees: f32) -> Self {
        Self::new(object, Axis::Z, degrees)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let object_ray = Ray::new(
            self.rotation.to_object(ray.origin()),
            self.rotation.to_object(ray.direction()),
            ray.time(),
        );

        // The facing flag was decided in object space and is preserved by rotation
        let mut rec = self.object.hit(&object_ray, ray_t, rng)?;
        rec.p = self.rotation.to_world(rec.p);
        rec.normal = self.rotation.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.direction_density(
            self.rotation.to_object(origin),
            self.rotation.to_object(direction),
        )
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self
            .object
            .sample_direction(self.rotation.to_object(origin), rng);
        self.rotation.to_world(local)
    }

    fn supports_sampling(&self) -> bool {
        self.object.supports_sampling()
    }
}
