//! The closed set of scene primitives.

use crate::list::PrimitiveList;
use crate::medium::ConstantMedium;
use crate::quad::Quad;
use crate::sphere::Sphere;
use crate::transform::{Rotate, Translate};
use crate::triangle::Triangle;
use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Stable handle of a primitive stored in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveId(pub u32);

impl PrimitiveId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Any intersectable shape, dispatched by match.
#[derive(Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Quad(Quad),
    Triangle(Triangle),
    Medium(ConstantMedium),
    Translate(Translate),
    Rotate(Rotate),
    List(PrimitiveList),
}

impl Primitive {
    /// Short name of the variant, for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere(_) => "sphere",
            Primitive::Quad(_) => "quad",
            Primitive::Triangle(_) => "triangle",
            Primitive::Medium(_) => "constant medium",
            Primitive::Translate(_) => "translate",
            Primitive::Rotate(_) => "rotate",
            Primitive::List(_) => "list",
        }
    }
}

impl Hittable for Primitive {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            Primitive::Sphere(p) => p.hit(ray, ray_t, rng),
            Primitive::Quad(p) => p.hit(ray, ray_t, rng),
            Primitive::Triangle(p) => p.hit(ray, ray_t, rng),
            Primitive::Medium(p) => p.hit(ray, ray_t, rng),
            Primitive::Translate(p) => p.hit(ray, ray_t, rng),
            Primitive::Rotate(p) => p.hit(ray, ray_t, rng),
            Primitive::List(p) => p.hit(ray, ray_t, rng),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(p) => p.bounding_box(),
            Primitive::Quad(p) => p.bounding_box(),
            Primitive::Triangle(p) => p.bounding_box(),
            Primitive::Medium(p) => p.bounding_box(),
            Primitive::Translate(p) => p.bounding_box(),
            Primitive::Rotate(p) => p.bounding_box(),
            Primitive::List(p) => p.bounding_box(),
        }
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        match self {
            Primitive::Sphere(p) => p.direction_density(origin, direction),
            Primitive::Quad(p) => p.direction_density(origin, direction),
            Primitive::Triangle(p) => p.direction_density(origin, direction),
            Primitive::Medium(p) => p.direction_density(origin, direction),
            Primitive::Translate(p) => p.direction_density(origin, direction),
            Primitive::Rotate(p) => p.direction_density(origin, direction),
            Primitive::List(p) => p.direction_density(origin, direction),
        }
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Primitive::Sphere(p) => p.sample_direction(origin, rng),
            Primitive::Quad(p) => p.sample_direction(origin, rng),
            Primitive::Triangle(p) => p.sample_direction(origin, rng),
            Primitive::Medium(p) => p.sample_direction(origin, rng),
            Primitive::Translate(p) => p.sample_direction(origin, rng),
            Primitive::Rotate(p) => p.sample_direction(origin, rng),
            Primitive::List(p) => p.sample_direction(origin, rng),
        }
    }

    fn supports_sampling(&self) -> bool {
        match self {
            Primitive::Sphere(p) => p.supports_sampling(),
            Primitive::Quad(p) => p.supports_sampling(),
            Primitive::Triangle(p) => p.supports_sampling(),
            Primitive::Medium(p) => p.supports_sampling(),
            Primitive::Translate(p) => p.supports_sampling(),
            Primitive::Rotate(p) => p.supports_sampling(),
            Primitive::List(p) => p.supports_sampling(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(p: Sphere) -> Self {
        Primitive::Sphere(p)
    }
}

impl From<Quad> for Primitive {
    fn from(p: Quad) -> Self {
        Primitive::Quad(p)
    }
}

impl From<Triangle> for Primitive {
    fn from(p: Triangle) -> Self {
        Primitive::Triangle(p)
    }
}

impl From<ConstantMedium> for Primitive {
    fn from(p: ConstantMedium) -> Self {
        Primitive::Medium(p)
    }
}

impl From<Translate> for Primitive {
    fn from(p: Translate) -> Self {
        Primitive::Translate(p)
    }
}

impl From<Rotate> for Primitive {
    fn from(p: Rotate) -> Self {
        Primitive::Rotate(p)
    }
}

impl From<PrimitiveList> for Primitive {
    fn from(p: PrimitiveList) -> Self {
        Primitive::List(p)
    }
}
