//! Textures and scene backgrounds.
//!
//! Textures are pure functions of `(u, v, p)`.

use crate::perlin::Perlin;
use crate::{Color, Ray};
use ember_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading image textures.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image {0} has no pixels")]
    EmptyImage(String),
}

const TURBULENCE_DEPTH: u32 = 7;
const TURBULENCE_GAIN: f32 = 10.0;

/// A surface color lookup.
#[derive(Clone, Debug)]
pub enum Texture {
    /// Constant color.
    Solid(Color),
    /// Solid 3D checker pattern with cells of size `1 / inv_scale`.
    Checker {
        inv_scale: f32,
        even: Box<Texture>,
        odd: Box<Texture>,
    },
    /// Image mapped by the surface `(u, v)` coordinates.
    Image(Arc<ImageTexture>),
    /// Marble-like stripes along Z, perturbed by turbulence.
    Noise { scale: f32, noise: Arc<Perlin> },
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    pub fn checker(scale: f32, even: impl Into<Texture>, odd: impl Into<Texture>) -> Self {
        Texture::Checker {
            inv_scale: 1.0 / scale,
            even: Box::new(even.into()),
            odd: Box::new(odd.into()),
        }
    }

    /// Marble noise with stripe frequency `scale`, seeded from `rng`.
    pub fn noise(scale: f32, rng: &mut dyn RngCore) -> Self {
        Texture::Noise {
            scale,
            noise: Arc::new(Perlin::new(rng)),
        }
    }

    /// Color at surface coordinates `(u, v)` and world point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker {
                inv_scale,
                even,
                odd,
            } => {
                let cell = (*inv_scale * p).floor();
                let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);
                if parity == 0 {
                    even.value(u, v, p)
                } else {
                    odd.value(u, v, p)
                }
            }
            // Texture space has v = 0 at the bottom; image rows start at the top.
            Texture::Image(image) => image.sample(u, 1.0 - v),
            Texture::Noise { scale, noise } => {
                let turbulence = noise.turbulence(p, TURBULENCE_DEPTH);
                let phase = *scale * p.z + TURBULENCE_GAIN * turbulence;
                Color::splat(0.5 * (1.0 + phase.sin()))
            }
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// Linear RGB image held in memory.
#[derive(Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    /// Row-major RGB triples, top row first
    data: Vec<f32>,
}

impl ImageTexture {
    /// Load an image from disk (any format supported by the `image` crate, including HDR).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;
        let rgb = image.into_rgb32f();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(path.display().to_string()));
        }

        log::info!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    /// Build a texture from raw RGB triples, top row first.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgb(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-pixel lookup in image space: `u` runs left to right and `v`
    /// top to bottom. `u` wraps around, `v` is clamped to [0, 1].
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if !u.is_finite() || !v.is_finite() {
            return Color::ZERO;
        }
        let u = u - u.floor();
        let v = v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        let index = (j as usize * self.width as usize + i as usize) * 3;
        Color::new(self.data[index], self.data[index + 1], self.data[index + 2])
    }
}

/// Radiance returned for rays that escape the scene.
#[derive(Clone, Debug)]
pub enum Background {
    Solid(Color),
    /// Equirectangular environment map looked up by ray direction.
    Environment(Arc<ImageTexture>),
}

impl Background {
    pub fn value(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Environment(image) => {
                let d = ray.direction().normalize();
                let u = 0.5 + d.z.atan2(d.x) / (2.0 * PI);
                let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / PI;
                image.sample(u, v)
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}
