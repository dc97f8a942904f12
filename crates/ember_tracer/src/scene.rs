//! Scene assembly: the primitive arena, its BVH, the light list and the background.

use crate::bvh::Bvh;
use crate::list::{average_density, closest_hit, sample_uniform};
use crate::primitive::{Primitive, PrimitiveId};
use crate::texture::Background;
use crate::{HitRecord, Hittable, Ray};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while building a scene.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    #[error("Scene has no primitives")]
    EmptyScene,

    #[error("Scene has no lights to sample")]
    NoLights,

    #[error("Primitive {id} ({kind}) cannot be used as a light")]
    UnsupportedLight { id: u32, kind: &'static str },

    #[error("Light {0} does not refer to a primitive in the scene")]
    UnknownLight(u32),
}

/// Collects primitives and light markers before building a [`Scene`].
#[derive(Default)]
pub struct SceneBuilder {
    primitives: Vec<Primitive>,
    lights: Vec<PrimitiveId>,
    background: Background,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive and return its id.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        let id = PrimitiveId(self.primitives.len() as u32);
        self.primitives.push(primitive.into());
        id
    }

    /// Add a primitive that is also sampled as a light.
    pub fn add_light(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        let id = self.add(primitive);
        self.lights.push(id);
        id
    }

    /// Mark an already added primitive as a light.
    pub fn mark_light(&mut self, id: PrimitiveId) {
        if !self.lights.contains(&id) {
            self.lights.push(id);
        }
    }

    pub fn background(&mut self, background: Background) -> &mut Self {
        self.background = background;
        self
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Validate the light list and build the BVH.
    pub fn build(self) -> Result<Scene, SceneError> {
        if self.primitives.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        if self.lights.is_empty() {
            return Err(SceneError::NoLights);
        }
        for &id in &self.lights {
            let primitive = self
                .primitives
                .get(id.index())
                .ok_or(SceneError::UnknownLight(id.0))?;
            if !primitive.supports_sampling() {
                return Err(SceneError::UnsupportedLight {
                    id: id.0,
                    kind: primitive.kind(),
                });
            }
        }

        let start = Instant::now();
        let primitive_count = self.primitives.len();
        let bvh = Bvh::new(self.primitives);

        log::info!(
            "Built scene: {} primitives, {} lights, BVH depth {} ({} nodes) in {:.2?}",
            primitive_count,
            self.lights.len(),
            bvh.root().depth(),
            bvh.root().node_count(),
            start.elapsed()
        );

        Ok(Scene {
            bvh,
            lights: self.lights,
            background: self.background,
        })
    }
}

/// An immutable, render-ready scene.
pub struct Scene {
    bvh: Bvh,
    lights: Vec<PrimitiveId>,
    background: Background,
}

impl Scene {
    /// Everything a camera ray can hit.
    pub fn world(&self) -> &Bvh {
        &self.bvh
    }

    /// Light-sampling targets, sharing the world's primitive arena.
    pub fn lights(&self) -> LightList<'_> {
        LightList {
            primitives: self.bvh.primitives(),
            ids: &self.lights,
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }
}

/// Light primitives addressed by id, searched linearly.
#[derive(Clone, Copy)]
pub struct LightList<'a> {
    primitives: &'a [Primitive],
    ids: &'a [PrimitiveId],
}

impl<'a> LightList<'a> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a Primitive> + 'a {
        let primitives = self.primitives;
        self.ids.iter().map(move |id| &primitives[id.index()])
    }
}

impl Hittable for LightList<'_> {
    fn hit<'b>(
        &'b self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'b>> {
        closest_hit(self.iter(), ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.iter().fold(Aabb::EMPTY, |acc, light| {
            Aabb::surrounding(&acc, &light.bounding_box())
        })
    }

    fn direction_density(&self, origin: Vec3, direction: Vec3) -> f32 {
        average_density(self.iter(), origin, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        sample_uniform(self.iter(), origin, rng)
    }

    fn supports_sampling(&self) -> bool {
        !self.ids.is_empty()
    }
}
