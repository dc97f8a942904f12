//! Unordered aggregate of primitives.

use crate::{
    hittable::{HitRecord, Hittable},
    Primitive, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::{Rng, RngCore};

/// A list of primitives searched linearly.
#[derive(Clone)]
pub struct PrimitiveList {
    objects: Vec<Primitive>,
    bbox: Aabb,
}

impl PrimitiveList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Primitive>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// Move the members out of the list.
    pub fn into_objects(self) -> Vec<Primitive> {
        self.objects
    }
}

impl Default for PrimitiveList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Primitive> for PrimitiveList {
    fn from_iter<I: IntoIterator<Item = Primitive>>(iter: I) -> Self {
        let mut list = Self::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

/// Closest hit over `objects`, narrowing the interval after every hit.
pub(crate) fn closest_hit<'a, I>(
    objects: I,
    ray: &Ray,
    ray_t: Interval,
    rng: &mut dyn RngCore,
) -> Option<HitRecord<'a>>
where
    I: IntoIterator<Item = &'a Primitive>,
{
    let mut closest: Option<HitRecord<'a>> = None;

    for object in objects {
        let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
        if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
            closest = Some(rec);
        }
    }

    closest
}

/// Average of the member densities, matching [`sample_uniform`].
pub(crate) fn average_density<'a, I>(objects: I, origin: Vec3, direction: Vec3) -> f32
where
    I: IntoIterator<Item = &'a Primitive>,
    I::IntoIter: ExactSizeIterator,
{
    let objects = objects.into_iter();
    if objects.len() == 0 {
        return 0.0;
    }
    let weight = 1.0 / objects.len() as f32;
    objects
        .map(|object| weight * object.direction_density(origin, direction))
        .sum()
}

/// Pick one member uniformly and sample a direction towards it.
pub(crate) fn sample_uniform<'a, I>(objects: I, origin: Vec3, rng: &mut dyn RngCore) -> Vec3
where
    I: IntoIterator<Item = &'a Primitive>,
    I::IntoIter: ExactSizeIterator,
{
    let mut objects = objects.into_iter();
    let len = objects.len();
    if len == 0 {
        return Vec3::X;
    }
    match objects.nth(rng.gen_range(0..len)) {
        Some(object) => object.sample_direction(origin, rng),
        None => Vec3::X,
    }
}

impl Hittable for PrimitiveList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        closest_hit(&self.objects, ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        average_density(&self.objects, origin, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        sample_uniform(&self.objects, origin, rng)
    }

    fn supports_sampling(&self) -> bool {
        !self.objects.is_empty() && self.objects.iter().all(|object| object.supports_sampling())
    }
}
