//! Ember tracer - CPU Monte Carlo path tracing.
//!
//! Scenes are built once into an arena of [`Primitive`]s indexed by a BVH,
//! with lights referenced by [`PrimitiveId`]. The integrator importance
//! samples diffuse bounces with an equal mixture of light-directed and
//! material sampling; the bucket renderer runs it over the image in parallel.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod integrator;
mod list;
mod material;
mod medium;
mod output;
mod pdf;
mod perlin;
mod primitive;
mod quad;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod texture;
mod transform;
mod triangle;

/// Linear RGB radiance.
pub type Color = Vec3;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use integrator::{inverse_pdf, ray_color, MIN_PDF, T_MIN};
pub use list::PrimitiveList;
pub use material::{reflect, refract, Material, ScatterKind, ScatterRecord};
pub use medium::ConstantMedium;
pub use output::{save, write_ppm, OutputError};
pub use pdf::{CosinePdf, HittablePdf, MaterialPdf, MixturePdf, Pdf, SpherePdf};
pub use perlin::Perlin;
pub use primitive::{Primitive, PrimitiveId};
pub use quad::{cuboid, Quad};
pub use renderer::{color_to_rgb, linear_to_gamma, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{LightList, Scene, SceneBuilder, SceneError};
pub use sphere::Sphere;
pub use texture::{Background, ImageTexture, Texture, TextureError};
pub use transform::{Rotate, Translate};
pub use triangle::Triangle;

/// Re-export common math types from ember_math
pub use ember_math::{Aabb, Axis, Interval, Ray, Vec3};
