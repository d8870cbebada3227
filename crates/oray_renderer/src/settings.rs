//! Render settings: the parameters one render pass runs with.
//!
//! Settings are plain data owned by the caller and passed into each render,
//! and can be read from JSON.

use oray_math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Errors from reading or validating render settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid render settings: {0}")]
    Invalid(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Russian roulette path termination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteSettings {
    pub enabled: bool,
    /// Bounces traced unconditionally before roulette may end a path.
    pub min_bounces: u32,
}

impl Default for RouletteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_bounces: 3,
        }
    }
}

/// Everything a render pass needs apart from the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub bucket_size: u32,
    /// Base seed; each bucket derives its own generator from it.
    pub seed: u64,
    pub roulette: RouletteSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 10,
            max_depth: 20,
            look_from: Vec3::new(0.0, 0.0, 1.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 20.0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            seed: 0,
            roulette: RouletteSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Read settings from a JSON file and validate them.
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(text: &str) -> SettingsResult<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(SettingsError::Invalid(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(SettingsError::Invalid(
                "bucket_size must be at least 1".to_string(),
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SettingsError::Invalid(format!(
                "vfov must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }

        let forward = self.look_at - self.look_from;
        if forward.length_squared() < 1e-12 {
            return Err(SettingsError::Invalid(
                "look_from and look_at coincide".to_string(),
            ));
        }
        if forward.cross(self.vup).length_squared() < 1e-12 {
            return Err(SettingsError::Invalid(
                "view direction is parallel to vup".to_string(),
            ));
        }

        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height as f32
    }

    /// Per-sample integrator parameters.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            max_depth: self.max_depth,
            roulette: self.roulette,
        }
    }
}

/// Parameters the integrator needs for every sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub roulette: RouletteSettings,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderSettings::default().render_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert_eq!((settings.image_width, settings.image_height), (400, 225));
        assert_eq!(settings.samples_per_pixel, 10);
        assert_eq!(settings.max_depth, 20);
        assert_eq!(settings.vfov, 20.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = RenderSettings::from_json(
            r#"{ "image_width": 64, "image_height": 32, "roulette": { "enabled": false } }"#,
        )
        .unwrap();

        assert_eq!(settings.image_width, 64);
        assert_eq!(settings.image_height, 32);
        assert_eq!(settings.samples_per_pixel, 10);
        assert!(!settings.roulette.enabled);
        assert_eq!(settings.roulette.min_bounces, 3);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = RenderSettings {
            look_from: Vec3::new(1.0, 2.0, 3.0),
            seed: 99,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(RenderSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            RenderSettings { image_width: 0, ..Default::default() },
            RenderSettings { samples_per_pixel: 0, ..Default::default() },
            RenderSettings { bucket_size: 0, ..Default::default() },
            RenderSettings { vfov: 180.0, ..Default::default() },
            RenderSettings { look_at: Vec3::new(0.0, 0.0, 1.0), ..Default::default() },
            RenderSettings { look_at: Vec3::new(0.0, 5.0, 1.0), ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(SettingsError::Invalid(_))),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = RenderSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderSettings::load("no/such/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_render_config() {
        let settings = RenderSettings { max_depth: 7, ..Default::default() };
        let config = settings.render_config();
        assert_eq!(config.max_depth, 7);
        assert_eq!(config.roulette, settings.roulette);
    }
}
