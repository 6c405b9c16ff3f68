use crate::animation::AnimationConfig;
use crate::scene::BLOCKY_ANIMAL_NODES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted node-arena capacity.
pub const MAX_SCENE_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene capacity {capacity} is below the {required} nodes the scene needs")]
    CapacityTooSmall { capacity: usize, required: usize },
    #[error("scene capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },
}

/// Runtime configuration, loaded from JSON. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    /// Node arena capacity (also the GPU renderer's per-frame cube budget).
    pub scene_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animation: AnimationConfig::default(),
            scene_capacity: 16,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        tracing::info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scene_capacity < BLOCKY_ANIMAL_NODES {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.scene_capacity,
                required: BLOCKY_ANIMAL_NODES,
            });
        }
        if self.scene_capacity > MAX_SCENE_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.scene_capacity,
                max: MAX_SCENE_CAPACITY,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_animation_overrides() {
        let config = Config::from_json(
            r#"{ "animation": { "magenta": { "amplitude_degrees": 30.0, "frequency": 2.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.animation.magenta.amplitude_degrees, 30.0);
        assert_eq!(config.animation.magenta.frequency, 2.0);
        assert_eq!(config.animation.yellow, AnimationConfig::default().yellow);
    }

    #[test]
    fn tiny_capacity_is_rejected() {
        let err = Config::from_json(r#"{ "scene_capacity": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::CapacityTooSmall { capacity: 1, .. }));
    }

    #[test]
    fn huge_capacity_is_rejected() {
        let err = Config::from_json(r#"{ "scene_capacity": 18446744073709551615 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CapacityTooLarge {
                max: MAX_SCENE_CAPACITY,
                ..
            }
        ));
    }

    #[test]
    fn capacity_bounds_are_inclusive() {
        let at_max = Config {
            scene_capacity: MAX_SCENE_CAPACITY,
            ..Config::default()
        };
        assert!(at_max.validate().is_ok());
        let over = Config {
            scene_capacity: MAX_SCENE_CAPACITY + 1,
            ..Config::default()
        };
        assert!(over.validate().is_err());
        let exact = Config {
            scene_capacity: BLOCKY_ANIMAL_NODES,
            ..Config::default()
        };
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Config::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
