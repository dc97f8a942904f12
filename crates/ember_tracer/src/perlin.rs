//! Lattice value noise with Hermite smoothing, and turbulence built on it.

use ember_math::Vec3;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Smooth pseudo-random scalar field over 3D space.
///
/// Values live on the integer lattice and are blended trilinearly with a
/// Hermite cubic, so the field is continuous with no visible grid.
#[derive(Debug, Clone)]
pub struct Perlin {
    values: Vec<f32>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Draw lattice values and permutations from `rng`.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let values = (0..POINT_COUNT).map(|_| rng.gen::<f32>()).collect();
        Self {
            values,
            perm_x: permutation(rng),
            perm_y: permutation(rng),
            perm_z: permutation(rng),
        }
    }

    /// Noise value at `p`, in [0, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let cell = p.floor();
        let f = p - cell;
        let (u, v, w) = (hermite(f.x), hermite(f.y), hermite(f.z));

        let i = cell.x as i32;
        let j = cell.y as i32;
        let k = cell.z as i32;

        let mut accum = 0.0;
        for di in 0..2 {
            for dj in 0..2 {
                for dk in 0..2 {
                    let value = self.values[self.perm_x[lattice(i + di)]
                        ^ self.perm_y[lattice(j + dj)]
                        ^ self.perm_z[lattice(k + dk)]];
                    accum += weight(di, u) * weight(dj, v) * weight(dk, w) * value;
                }
            }
        }
        accum
    }

    /// Sum of `depth` octaves, each at double the frequency and half the
    /// amplitude of the previous one.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0f32;
        let mut p = p;
        let mut amplitude = 1.0f32;

        for _ in 0..depth {
            accum += amplitude * self.noise(p);
            amplitude *= 0.5;
            p *= 2.0;
        }

        accum.abs()
    }
}

fn permutation(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    perm.shuffle(rng);
    perm
}

#[inline]
fn lattice(i: i32) -> usize {
    (i & (POINT_COUNT as i32 - 1)) as usize
}

#[inline]
fn hermite(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Trilinear weight of the lower (`corner == 0`) or upper corner.
#[inline]
fn weight(corner: i32, t: f32) -> f32 {
    if corner == 0 {
        1.0 - t
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn noise() -> Perlin {
        Perlin::new(&mut StdRng::seed_from_u64(31))
    }

    #[test]
    fn test_permutations_are_complete() {
        let perlin = noise();
        for perm in [&perlin.perm_x, &perlin.perm_y, &perlin.perm_z] {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
        }
        assert_ne!(perlin.perm_x, perlin.perm_y);
    }

    #[test]
    fn test_noise_is_lattice_value_at_integer_points() {
        let perlin = noise();
        let p = Vec3::new(3.0, -2.0, 7.0);
        let expected = perlin.values[perlin.perm_x[3] ^ perlin.perm_y[254] ^ perlin.perm_z[7]];
        assert!((perlin.noise(p) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_noise_range_and_continuity() {
        let perlin = noise();
        let mut rng = StdRng::seed_from_u64(32);
        for _ in 0..1000 {
            let p = Vec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let n = perlin.noise(p);
            assert!((0.0..=1.0).contains(&n), "noise = {}", n);

            let nearby = perlin.noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.01);
        }
    }

    #[test]
    fn test_noise_is_reproducible() {
        let p = Vec3::new(0.3, 1.7, -4.2);
        assert_eq!(noise().noise(p), noise().noise(p));
    }

    #[test]
    fn test_turbulence_octaves() {
        let perlin = noise();
        let p = Vec3::new(1.25, 0.5, -0.75);
        assert_eq!(perlin.turbulence(p, 0), 0.0);
        assert!((perlin.turbulence(p, 1) - perlin.noise(p)).abs() < 1e-6);

        let two = perlin.noise(p) + 0.5 * perlin.noise(2.0 * p);
        assert!((perlin.turbulence(p, 2) - two).abs() < 1e-6);
        // Seven octaves stay below the geometric bound.
        assert!(perlin.turbulence(p, 7) < 2.0);
    }
}
