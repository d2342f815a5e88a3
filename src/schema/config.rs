//! Configuration for spawning, breeding and simulating koi.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Blueprint, LayerKind, UnitSystem};
use crate::compute::TraitCurve;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KoiConfig {
    /// Seconds per simulation update.
    #[serde(default = "default_update_rate")]
    pub update_rate: f32,
    /// Largest frame delta fed into the update clock, in seconds.
    #[serde(default = "default_frame_time_max")]
    pub frame_time_max: f32,
    /// Maximum number of updates run for a single frame.
    #[serde(default = "default_max_ticks_per_frame")]
    pub max_ticks_per_frame: u32,
    /// Breeding settings.
    #[serde(default)]
    pub breeding: BreedingConfig,
    /// Blueprints available for spawning.
    #[serde(default = "Blueprint::defaults")]
    pub blueprints: Vec<Blueprint>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Units used when reporting measurements.
    #[serde(default)]
    pub units: UnitSystem,
}

impl Default for KoiConfig {
    fn default() -> Self {
        Self {
            update_rate: default_update_rate(),
            frame_time_max: default_frame_time_max(),
            max_ticks_per_frame: default_max_ticks_per_frame(),
            breeding: BreedingConfig::default(),
            blueprints: Blueprint::defaults(),
            random_seed: None,
            units: UnitSystem::default(),
        }
    }
}

fn default_update_rate() -> f32 {
    1.0 / 14.0
}
fn default_frame_time_max() -> f32 {
    1.0
}
fn default_max_ticks_per_frame() -> u32 {
    14
}

impl KoiConfig {
    /// Read and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: KoiConfig = serde_json::from_str(&text)?;
        config.validate()?;

        Ok(config)
    }

    /// Look up a blueprint by name.
    pub fn blueprint(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.name == name)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.update_rate.is_finite() || self.update_rate <= 0.0 {
            return Err(ConfigError::InvalidUpdateRate);
        }
        if !self.frame_time_max.is_finite() || self.frame_time_max <= 0.0 {
            return Err(ConfigError::InvalidFrameTime);
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::InvalidTickLimit);
        }
        if self.blueprints.is_empty() {
            return Err(ConfigError::NoBlueprints);
        }
        for blueprint in &self.blueprints {
            if blueprint.layers.is_empty() {
                return Err(ConfigError::EmptyBlueprint(blueprint.name.clone()));
            }
            for (i, layer) in blueprint.layers.iter().enumerate() {
                let kind = layer.kind();
                if blueprint.layers[..i].iter().any(|other| other.kind() == kind) {
                    return Err(ConfigError::DuplicateLayer(blueprint.name.clone(), kind));
                }
            }
            if blueprint.curves().iter().any(|curve| !curve.is_valid()) {
                return Err(ConfigError::InvalidCurve(blueprint.name.clone()));
            }
        }
        if let Some(mutation) = &self.breeding.mutation {
            mutation.validate()?;
        }
        Ok(())
    }
}

/// Breeding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingConfig {
    /// Mutation settings. `None` disables mutation.
    #[serde(default = "default_mutation")]
    pub mutation: Option<MutationConfig>,
    /// Guarantee at least one mutation per litter.
    #[serde(default)]
    pub force_mutation: bool,
    /// Fixed litter size. `None` uses the mother's offspring count trait.
    #[serde(default)]
    pub litter_size: Option<usize>,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            mutation: default_mutation(),
            force_mutation: false,
            litter_size: None,
        }
    }
}

fn default_mutation() -> Option<MutationConfig> {
    Some(MutationConfig::default())
}

/// Mutation probabilities and distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a single byte trait mutates.
    #[serde(default = "default_trait_probability")]
    pub trait_probability: f32,
    /// Probability that a layer plane mutates.
    #[serde(default = "default_plane_probability")]
    pub plane_probability: f32,
    /// Signed byte offset, sampled with a uniform random value.
    #[serde(default = "default_trait_distance")]
    pub trait_distance: TraitCurve,
    /// Length of the tangent offset applied to a plane normal.
    #[serde(default = "default_plane_distance")]
    pub plane_distance: TraitCurve,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            trait_probability: default_trait_probability(),
            plane_probability: default_plane_probability(),
            trait_distance: default_trait_distance(),
            plane_distance: default_plane_distance(),
        }
    }
}

fn default_trait_probability() -> f32 {
    0.03
}
fn default_plane_probability() -> f32 {
    0.05
}
fn default_trait_distance() -> TraitCurve {
    TraitCurve::plateau(-48.0, 0.0, 48.0, 2.0)
}
fn default_plane_distance() -> TraitCurve {
    TraitCurve::power(0.05, 0.6, 2.0)
}

impl MutationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for p in [self.trait_probability, self.plane_probability] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability(p));
            }
        }
        if !self.trait_distance.is_valid() || !self.plane_distance.is_valid() {
            return Err(ConfigError::InvalidCurve("mutation".into()));
        }
        Ok(())
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Update rate must be positive")]
    InvalidUpdateRate,
    #[error("Maximum frame time must be positive")]
    InvalidFrameTime,
    #[error("Tick limit per frame must be non-zero")]
    InvalidTickLimit,
    #[error("At least one blueprint is required")]
    NoBlueprints,
    #[error("Blueprint '{0}' has no layers")]
    EmptyBlueprint(String),
    #[error("Blueprint '{0}' lists more than one {1:?} layer")]
    DuplicateLayer(String, LayerKind),
    #[error("Blueprint '{0}' contains an invalid trait curve")]
    InvalidCurve(String),
    #[error("Probability {0} is outside [0, 1]")]
    InvalidProbability(f32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = KoiConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.blueprint("ridged").is_some());
        assert!(config.blueprint("tuna").is_none());
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config: KoiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, KoiConfig::default());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = KoiConfig::default();
        config.update_rate = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUpdateRate)
        ));

        let mut config = KoiConfig::default();
        config.blueprints.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoBlueprints)));

        let mut config = KoiConfig::default();
        config.blueprints[0].layers.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBlueprint(_))
        ));

        let mut config = KoiConfig::default();
        let repeated = config.blueprints[0].layers[0].clone();
        config.blueprints[0].layers.push(repeated);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateLayer(_, _))
        ));

        let mut config = KoiConfig::default();
        config.breeding.mutation = Some(MutationConfig {
            trait_probability: 1.5,
            ..MutationConfig::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "random_seed": 42, "units": "Imperial", "breeding": {{ "mutation": null }} }}"#
        )
        .unwrap();

        let config = KoiConfig::load(file.path()).unwrap();
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.units, UnitSystem::Imperial);
        assert!(config.breeding.mutation.is_none());
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            KoiConfig::load("/nonexistent/koi.json"),
            Err(ConfigError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            KoiConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
