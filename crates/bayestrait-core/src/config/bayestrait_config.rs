//! Top-level configuration: estimator settings plus the trait table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{validation, EstimatorConfig, NeutralPolicy, TraitConfig};
use crate::errors::ConfigError;

/// File name looked up by [`BayestraitConfig::load`].
pub const CONFIG_FILE_NAME: &str = "bayestrait.toml";

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`BAYESTRAIT_*`)
/// 2. Config file (`bayestrait.toml`)
/// 3. Compiled defaults
///
/// The trait table only comes from the file; env vars tune the estimator.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BayestraitConfig {
    pub estimator: EstimatorConfig,
    pub traits: Vec<TraitConfig>,
}

impl BayestraitConfig {
    /// Load `bayestrait.toml` from `root` if present, apply env overrides,
    /// and validate.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            let file_config = Self::read_toml_file(&path)?;
            config.estimator.merge(&file_config.estimator);
            config.traits = file_config.traits;
            tracing::debug!(
                path = %path.display(),
                traits = config.traits.len(),
                "loaded trait configuration"
            );
        }

        Self::apply_env_overrides(&mut config)?;
        validation::validate_or_error(&config)?;
        Ok(config)
    }

    /// Load a specific file, which must exist, then apply env overrides
    /// and validate.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_toml_file(path)?;
        Self::apply_env_overrides(&mut config)?;
        validation::validate_or_error(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string. No env overrides.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        validation::validate_or_error(&config)?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }

    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Pattern: `BAYESTRAIT_SCALE`, `BAYESTRAIT_MIN_VARIANCE`, etc.
    ///
    /// A set but unparseable variable is an error rather than silently
    /// ignored, since it would change every estimate.
    fn apply_env_overrides(config: &mut BayestraitConfig) -> Result<(), ConfigError> {
        let e = &mut config.estimator;
        if let Some(v) = env_f64("BAYESTRAIT_SCALE")? {
            e.scale = Some(v);
        }
        if let Some(v) = env_f64("BAYESTRAIT_BASE_VARIANCE")? {
            e.base_variance = Some(v);
        }
        if let Some(v) = env_f64("BAYESTRAIT_MIN_VARIANCE")? {
            e.min_variance = Some(v);
        }
        if let Some(v) = env_f64("BAYESTRAIT_MIN_POSTERIOR_VARIANCE")? {
            e.min_posterior_variance = Some(v);
        }
        if let Some(v) = env_f64("BAYESTRAIT_Z")? {
            e.z = Some(v);
        }
        if let Some(v) = env_f64("BAYESTRAIT_CONFIDENCE_LEVEL")? {
            e.confidence_level = Some(v);
        }
        if let Ok(val) = std::env::var("BAYESTRAIT_NEUTRAL_POLICY") {
            let policy = val.parse::<NeutralPolicy>().map_err(|message| {
                ConfigError::EnvOverride {
                    var: "BAYESTRAIT_NEUTRAL_POLICY".to_string(),
                    value: val.clone(),
                    message,
                }
            })?;
            e.neutral_policy = Some(policy);
        }
        Ok(())
    }
}

fn env_f64(key: &str) -> Result<Option<f64>, ConfigError> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ConfigError::EnvOverride {
                var: key.to_string(),
                message: format!("not a number: {e}"),
                value: val,
            }),
        Err(_) => Ok(None),
    }
}
