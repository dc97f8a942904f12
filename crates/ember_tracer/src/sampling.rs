//! Random sampling helpers shared by materials, primitives and PDFs.
//!
//! Every function takes the caller's RNG; there is no global generator.

use ember_math::{Vec2, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project.
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction about +Z.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = rng.gen::<f32>();
    let r2 = rng.gen::<f32>();

    let phi = 2.0 * PI * r1;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let r2_sqrt = r2.sqrt();

    Vec3::new(cos_phi * r2_sqrt, sin_phi * r2_sqrt, (1.0 - r2).sqrt())
}

/// Direction about +Z uniformly distributed over the cone subtended by a
/// sphere of `radius` at squared distance `distance_squared`.
pub fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = rng.gen::<f32>();
    let r2 = rng.gen::<f32>();

    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(cos_phi * sin_theta, sin_phi * sin_theta, z)
}

/// Uniform point in the unit disk (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec2 {
    loop {
        let p = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
