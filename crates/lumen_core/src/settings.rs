//! Render settings file.
//!
//! A JSON document of optional overrides applied on top of a scene's own camera setup.
//! Every field may be omitted:
//!
//! ```json
//! { "image_width": 800, "samples_per_pixel": 200, "max_depth": 40, "seed": 7 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub image_width: Option<u32>,
    pub aspect_ratio: Option<f32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    /// Worker thread count for bucket rendering. `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl RenderSettings {
    pub fn from_json_str(json: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_json_str(&contents)?;
        log::info!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Fill any field left unset here from `other`.
    pub fn or(self, other: RenderSettings) -> RenderSettings {
        RenderSettings {
            image_width: self.image_width.or(other.image_width),
            aspect_ratio: self.aspect_ratio.or(other.aspect_ratio),
            samples_per_pixel: self.samples_per_pixel.or(other.samples_per_pixel),
            max_depth: self.max_depth.or(other.max_depth),
            seed: self.seed.or(other.seed),
            threads: self.threads.or(other.threads),
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        let positive = |field: &'static str, value: Option<u32>| match value {
            Some(0) => Err(SettingsError::Invalid {
                field,
                message: "must be at least 1".to_string(),
            }),
            _ => Ok(()),
        };
        positive("image_width", self.image_width)?;
        positive("samples_per_pixel", self.samples_per_pixel)?;

        if let Some(ratio) = self.aspect_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(SettingsError::Invalid {
                    field: "aspect_ratio",
                    message: format!("{} is not a positive number", ratio),
                });
            }
        }
        if self.threads == Some(0) {
            return Err(SettingsError::Invalid {
                field: "threads",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_leaves_other_fields_unset() {
        let settings = RenderSettings::from_json_str(r#"{ "samples_per_pixel": 64 }"#).unwrap();
        assert_eq!(settings.samples_per_pixel, Some(64));
        assert_eq!(settings.image_width, None);
        assert_eq!(settings.max_depth, None);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "image_width": 640,
            "aspect_ratio": 1.5,
            "samples_per_pixel": 10,
            "max_depth": 8,
            "seed": 42,
            "threads": 4
        }"#;
        let settings = RenderSettings::from_json_str(json).unwrap();
        assert_eq!(settings.image_width, Some(640));
        assert_eq!(settings.aspect_ratio, Some(1.5));
        assert_eq!(settings.max_depth, Some(8));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.threads, Some(4));
    }

    #[test]
    fn test_empty_object_is_default() {
        let settings = RenderSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            RenderSettings::from_json_str("{ not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "image_widht": 10 }"#),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "image_width": 0 }"#),
            Err(SettingsError::Invalid { field: "image_width", .. })
        ));
        assert!(matches!(
            RenderSettings::from_json_str(r#"{ "aspect_ratio": -2.0 }"#),
            Err(SettingsError::Invalid { field: "aspect_ratio", .. })
        ));
    }

    #[test]
    fn test_or_prefers_self() {
        let cli = RenderSettings {
            samples_per_pixel: Some(5),
            ..Default::default()
        };
        let file = RenderSettings {
            samples_per_pixel: Some(500),
            max_depth: Some(12),
            ..Default::default()
        };
        let merged = cli.or(file);
        assert_eq!(merged.samples_per_pixel, Some(5));
        assert_eq!(merged.max_depth, Some(12));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("lumen_core_settings_test.json");
        fs::write(&path, r#"{ "max_depth": 3 }"#).unwrap();

        let settings = RenderSettings::load(&path).unwrap();
        assert_eq!(settings.max_depth, Some(3));

        let _ = fs::remove_file(&path);
        assert!(matches!(
            RenderSettings::load(&path),
            Err(SettingsError::Io(_))
        ));
    }
}
