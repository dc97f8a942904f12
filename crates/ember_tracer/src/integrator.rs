//! Recursive Monte Carlo radiance estimator.
//!
//! Diffuse and volume bounces are importance sampled with an equal mixture of
//! light-directed and material sampling; specular bounces follow their single
//! outgoing ray.

use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::texture::Background;
use crate::{Color, Hittable, Ray};
use ember_math::Interval;
use rand::RngCore;

/// Lower end of the ray parameter range, keeps bounces off their own surface.
pub const T_MIN: f32 = 0.001;

/// Mixture densities at or below this are treated as unsampleable.
pub const MIN_PDF: f32 = 1e-8;

/// Estimate the radiance arriving along `ray`.
///
/// `lights` is only used as a light-sampling target and must support
/// [`Hittable::direction_density`]. Returns black once `depth` reaches zero.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    lights: &dyn Hittable,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background.value(ray);
    };

    let emission = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    match srec.kind {
        ScatterKind::Specular(scattered) => {
            emission
                + srec.attenuation
                    * ray_color(&scattered, depth - 1, world, lights, background, rng)
        }
        ScatterKind::Sampled(material_pdf) => {
            let light_pdf = HittablePdf::new(lights, rec.p);
            let mixture = MixturePdf::new(&light_pdf, &material_pdf);

            let scattered = Ray::new(rec.p, mixture.generate(rng), ray.time());
            let pdf_value = mixture.value(scattered.direction());
            let Some(inv_pdf) = inverse_pdf(pdf_value) else {
                return emission;
            };

            let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
            let sample_color = ray_color(&scattered, depth - 1, world, lights, background, rng);

            emission + srec.attenuation * scattering_pdf * sample_color * inv_pdf
        }
    }
}

/// Reciprocal of a sampling density, or `None` when the sample must be dropped.
///
/// A direction whose mixture density is non-finite or below [`MIN_PDF`] would
/// blow up the estimate; such samples contribute nothing beyond emission.
pub fn inverse_pdf(pdf_value: f32) -> Option<f32> {
    if pdf_value.is_finite() && pdf_value > MIN_PDF {
        Some(1.0 / pdf_value)
    } else {
        None
    }
}
