//! Materials describing how light interacts with surfaces and volumes.

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, MaterialPdf, SpherePdf};
use crate::sampling::random_unit_vector;
use crate::texture::Texture;
use crate::{Color, Ray};
use ember_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// How a scattered ray continues the path.
#[derive(Debug, Clone, Copy)]
pub enum ScatterKind {
    /// A single outgoing ray chosen with probability 1 (mirror, glass).
    Specular(Ray),
    /// Outgoing direction to be drawn from a density (diffuse, volume).
    Sampled(MaterialPdf),
}

/// Result of a material scattering an incoming ray.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

/// Surface and volume materials.
#[derive(Clone, Debug)]
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian { albedo: Texture },
    /// Reflective metal, `fuzz` in [0, 1] blurs the reflection.
    Metal { albedo: Color, fuzz: f32 },
    /// Clear refractive material with index of refraction `ior`.
    Dielectric { ior: f32 },
    /// Emitter; emits from its front face only.
    DiffuseLight { emit: Texture },
    /// Phase function of a participating medium.
    Isotropic { albedo: Texture },
}

impl Material {
    pub fn lambertian(albedo: impl Into<Texture>) -> Self {
        Material::Lambertian {
            albedo: albedo.into(),
        }
    }

    /// Create a metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn dielectric(ior: f32) -> Self {
        Material::Dielectric { ior }
    }

    pub fn diffuse_light(emit: impl Into<Texture>) -> Self {
        Material::DiffuseLight { emit: emit.into() }
    }

    pub fn isotropic(albedo: impl Into<Texture>) -> Self {
        Material::Isotropic {
            albedo: albedo.into(),
        }
    }

    /// Light emitted at the hit point. Black for everything but lights.
    pub fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight { emit } if rec.front_face => emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian { albedo } => Some(ScatterRecord {
                attenuation: albedo.value(rec.u, rec.v, rec.p),
                kind: ScatterKind::Sampled(MaterialPdf::Cosine(CosinePdf::new(rec.normal))),
            }),
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let scattered_dir = reflected + *fuzz * random_unit_vector(rng);

                // Fuzz pushed the reflection below the surface: absorbed
                if scattered_dir.dot(rec.normal) <= 0.0 {
                    return None;
                }
                Some(ScatterRecord {
                    attenuation: *albedo,
                    kind: ScatterKind::Specular(Ray::new(rec.p, scattered_dir, ray_in.time())),
                })
            }
            Material::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { *ior };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

                let cannot_refract = refraction_ratio * sin_theta > 1.0;
                let direction = if cannot_refract
                    || reflectance(cos_theta, refraction_ratio) > rng.gen::<f32>()
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(ScatterRecord {
                    attenuation: Color::ONE,
                    kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
                })
            }
            Material::DiffuseLight { .. } => None,
            Material::Isotropic { albedo } => Some(ScatterRecord {
                attenuation: albedo.value(rec.u, rec.v, rec.p),
                kind: ScatterKind::Sampled(MaterialPdf::Sphere(SpherePdf)),
            }),
        }
    }

    /// Density with which this material itself would scatter into `scattered`.
    ///
    /// Only meaningful for materials that return [`ScatterKind::Sampled`].
    pub fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian { .. } => {
                let cos_theta = rec.normal.dot(scattered.direction().normalize());
                (cos_theta / PI).max(0.0)
            }
            Material::Isotropic { .. } => 1.0 / (4.0 * PI),
            _ => 0.0,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
