//! Image rendering on top of the integrator.
//!
//! Implements:
//! - Stratified multi-sampling on a `√spp × √spp` grid per pixel
//! - Parallel bucket rendering with per-bucket random streams
//! - Gamma correction and 8-bit conversion

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::integrator::ray_color;
use crate::scene::Scene;
use crate::{Camera, Color};
use ember_math::Vec2;
use rand::{Rng, RngCore};
use rayon::prelude::*;
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Requested samples per pixel, rounded down to a square number
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed all bucket streams derive from
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl RenderConfig {
    /// Side of the per-pixel stratification grid, at least 1.
    pub fn strata(&self) -> u32 {
        ((self.samples_per_pixel as f64).sqrt() as u32).max(1)
    }

    /// Samples actually taken per pixel.
    pub fn effective_samples(&self) -> u32 {
        let strata = self.strata();
        strata * strata
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert one linear channel to a byte. NaN maps to 0.
#[inline]
fn channel_to_byte(linear: f32) -> u8 {
    let c = if linear.is_nan() { 0.0 } else { linear };
    (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        channel_to_byte(color.x),
        channel_to_byte(color.y),
        channel_to_byte(color.z),
    ]
}

/// Render a single pixel with stratified multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let strata = config.strata();
    let recip = 1.0 / strata as f32;
    let lights = scene.lights();
    let mut pixel_color = Color::ZERO;

    for sj in 0..strata {
        for si in 0..strata {
            let offset = Vec2::new(
                (si as f32 + rng.gen::<f32>()) * recip - 0.5,
                (sj as f32 + rng.gen::<f32>()) * recip - 0.5,
            );
            let ray = camera.get_ray(x, y, offset, rng);
            pixel_color += ray_color(
                &ray,
                config.max_depth,
                scene.world(),
                &lights,
                scene.background(),
                rng,
            );
        }
    }

    pixel_color / config.effective_samples() as f32
}

/// Linear-color image produced by a render.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Number of pixels with at least one NaN channel.
    pub fn nan_count(&self) -> usize {
        self.pixels.iter().filter(|c| c.is_nan()).count()
    }

    /// Gamma-corrected RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}

/// Render the scene in parallel buckets.
///
/// The camera must already be initialized. The output only depends on the
/// scene, the camera and `config`.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} buckets",
        camera.image_width,
        camera.image_height,
        config.effective_samples(),
        config.max_depth,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, scene, config))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}
