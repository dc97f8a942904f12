// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::{transform_aabb, Axis, Rotation};
