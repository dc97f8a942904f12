//! Render settings layered from scene defaults, a JSON file and flags.

use anyhow::{Context, Result};
use ember_tracer::RenderConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional overrides; unset fields fall through to the layer below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub bucket_size: Option<u32>,
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::info!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: &RenderSettings) -> Self {
        Self {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            samples_per_pixel: other.samples_per_pixel.or(self.samples_per_pixel),
            max_depth: other.max_depth.or(self.max_depth),
            seed: other.seed.or(self.seed),
            bucket_size: other.bucket_size.or(self.bucket_size),
        }
    }

    /// Resolution, falling back to `default` for unset axes.
    pub fn resolution(&self, default: (u32, u32)) -> (u32, u32) {
        (
            self.width.unwrap_or(default.0),
            self.height.unwrap_or(default.1),
        )
    }

    pub fn render_config(&self) -> RenderConfig {
        let base = RenderConfig::default();
        RenderConfig {
            samples_per_pixel: self.samples_per_pixel.unwrap_or(base.samples_per_pixel),
            max_depth: self.max_depth.unwrap_or(base.max_depth),
            seed: self.seed.unwrap_or(base.seed),
            bucket_size: self.bucket_size.unwrap_or(base.bucket_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_json() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "samples_per_pixel": 16, "seed": 9 }"#).unwrap();
        assert_eq!(settings.samples_per_pixel, Some(16));
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.width, None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<RenderSettings>(r#"{ "spp": 16 }"#).is_err());
    }

    #[test]
    fn test_overlay_precedence() {
        let scene = RenderSettings {
            width: Some(600),
            height: Some(600),
            samples_per_pixel: Some(100),
            ..Default::default()
        };
        let file = RenderSettings {
            samples_per_pixel: Some(16),
            max_depth: Some(8),
            ..Default::default()
        };
        let flags = RenderSettings {
            max_depth: Some(4),
            ..Default::default()
        };

        let merged = scene.overlay(&file).overlay(&flags);
        assert_eq!(merged.resolution((1, 1)), (600, 600));
        assert_eq!(merged.samples_per_pixel, Some(16));
        assert_eq!(merged.max_depth, Some(4));

        let config = merged.render_config();
        assert_eq!(config.samples_per_pixel, 16);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.seed, RenderConfig::default().seed);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = RenderSettings::load(Path::new("/nonexistent/ember.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
