//! Direction sampling densities for importance sampling.
//!
//! Every density is with respect to solid angle.

use crate::sampling::{random_cosine_direction, random_unit_vector};
use crate::Hittable;
use ember_math::{Onb, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// A probability density over directions together with a sampler for it.
pub trait Pdf {
    /// Density of `direction`; always non-negative.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction distributed according to [`Pdf::value`].
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Uniform density over the unit sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Cosine-weighted density over the hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::new(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine_theta = direction.normalize().dot(self.uvw.w());
        (cosine_theta / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(random_cosine_direction(rng))
    }
}

/// Samples directions from `origin` towards a light-sampling target.
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.objects.direction_density(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.sample_direction(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
///
/// Sampling picks one component by a single coin flip; the density of any
/// direction is the average of both components, whichever one produced it.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if rng.gen::<f32>() < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}

/// The densities a material can hand back from a stochastic scatter.
#[derive(Debug, Clone, Copy)]
pub enum MaterialPdf {
    Sphere(SpherePdf),
    Cosine(CosinePdf),
}

impl Pdf for MaterialPdf {
    fn value(&self, direction: Vec3) -> f32 {
        match self {
            MaterialPdf::Sphere(pdf) => pdf.value(direction),
            MaterialPdf::Cosine(pdf) => pdf.value(direction),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            MaterialPdf::Sphere(pdf) => pdf.generate(rng),
            MaterialPdf::Cosine(pdf) => pdf.generate(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SAMPLES: usize = 200_000;

    #[test]
    fn test_cosine_pdf_monte_carlo_integral() {
        // Integral of cos^2(theta) over the hemisphere is 2*pi/3.
        let normal = Vec3::new(0.3, 1.0, -0.2).normalize();
        let pdf = CosinePdf::new(normal);
        let mut rng = StdRng::seed_from_u64(11);

        let mut sum = 0.0f64;
        for _ in 0..SAMPLES {
            let d = pdf.generate(&mut rng).normalize();
            let cos_theta = d.dot(normal);
            let density = pdf.value(d);
            if density > 0.0 {
                sum += (cos_theta * cos_theta / density) as f64;
            }
        }

        let estimate = sum / SAMPLES as f64;
        let expected = 2.0 * std::f64::consts::PI / 3.0;
        assert!(
            (estimate - expected).abs() < 0.02,
            "estimate {} vs expected {}",
            estimate,
            expected
        );
    }

    #[test]
    fn test_sphere_pdf_monte_carlo_integral() {
        // Integral of 1 over the sphere is 4*pi.
        let pdf = SpherePdf;
        let mut rng = StdRng::seed_from_u64(12);

        let mut sum = 0.0f64;
        for _ in 0..10_000 {
            let d = pdf.generate(&mut rng);
            sum += (1.0 / pdf.value(d)) as f64;
        }
        let estimate = sum / 10_000.0;
        assert!((estimate - 4.0 * std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_cosine_pdf_is_zero_below_surface() {
        let pdf = CosinePdf::new(Vec3::Y);
        assert_eq!(pdf.value(-Vec3::Y), 0.0);
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_mixture_value_is_average() {
        let a = CosinePdf::new(Vec3::Z);
        let b = SpherePdf;
        let mixture = MixturePdf::new(&a, &b);

        let d = Vec3::new(0.0, 0.6, 0.8);
        let expected = 0.5 * a.value(d) + 0.5 * b.value(d);
        assert!((mixture.value(d) - expected).abs() < 1e-7);
    }

    #[test]
    fn test_mixture_sampling_matches_blend() {
        // Bin the z component of samples: z < 0, 0 <= z < 0.5, z >= 0.5.
        // Cosine about +Z: P(z < c) = c^2 on [0, 1]  -> [0.0, 0.25, 0.75]
        // Uniform sphere:  z uniform on [-1, 1]       -> [0.5, 0.25, 0.25]
        // The 50/50 blend is therefore                 [0.25, 0.25, 0.5].
        let a = CosinePdf::new(Vec3::Z);
        let b = SpherePdf;
        let mixture = MixturePdf::new(&a, &b);
        let mut rng = StdRng::seed_from_u64(13);

        let mut counts = [0usize; 3];
        for _ in 0..SAMPLES {
            let z = mixture.generate(&mut rng).normalize().z;
            let bin = if z < 0.0 {
                0
            } else if z < 0.5 {
                1
            } else {
                2
            };
            counts[bin] += 1;
        }

        let expected = [0.25, 0.25, 0.5];
        let chi_square: f64 = counts
            .iter()
            .zip(expected.iter())
            .map(|(&observed, &p)| {
                let e = p * SAMPLES as f64;
                (observed as f64 - e).powi(2) / e
            })
            .sum();

        // Two degrees of freedom; 13.8 is the 0.1% critical value.
        assert!(chi_square < 13.8, "chi-square {} counts {:?}", chi_square, counts);
    }

    #[test]
    fn test_material_pdf_dispatch() {
        let cosine = MaterialPdf::Cosine(CosinePdf::new(Vec3::Z));
        let sphere = MaterialPdf::Sphere(SpherePdf);
        assert!((cosine.value(Vec3::Z) - 1.0 / PI).abs() < 1e-6);
        assert!((sphere.value(Vec3::Z) - 1.0 / (4.0 * PI)).abs() < 1e-6);
    }
}
