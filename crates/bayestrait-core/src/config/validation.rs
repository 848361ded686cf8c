//! Config validation: reject invalid estimator settings at startup.

use std::fmt;

use super::BayestraitConfig;
use crate::errors::ConfigError;

/// One invalid field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Which field is invalid.
    pub field: String,
    /// Description of the problem.
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn positive_finite(errors: &mut Vec<ConfigValidationError>, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v <= 0.0 {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: format!("must be finite and > 0, got {v}"),
            });
        }
    }
}

/// Validate a config, returning all errors found.
pub fn validate(config: &BayestraitConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    let e = &config.estimator;

    if let Some(scale) = e.scale {
        if !scale.is_finite() {
            errors.push(ConfigValidationError {
                field: "estimator.scale".to_string(),
                message: format!("must be finite, got {scale}"),
            });
        }
    }

    positive_finite(&mut errors, "estimator.base_variance", e.base_variance);
    positive_finite(&mut errors, "estimator.min_variance", e.min_variance);
    positive_finite(
        &mut errors,
        "estimator.min_posterior_variance",
        e.min_posterior_variance,
    );
    positive_finite(&mut errors, "estimator.z", e.z);

    if let Some(level) = e.confidence_level {
        if !(level > 0.0 && level < 1.0) {
            errors.push(ConfigValidationError {
                field: "estimator.confidence_level".to_string(),
                message: format!("must be in (0.0, 1.0), got {level}"),
            });
        }
    }

    for (i, t) in config.traits.iter().enumerate() {
        if t.id.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: format!("traits[{i}].id"),
                message: "must not be empty".to_string(),
            });
        }
    }

    errors
}

/// Validate and return Ok(()) or Err with all validation errors combined.
pub fn validate_or_error(config: &BayestraitConfig) -> Result<(), ConfigError> {
    let problems = validate(config);
    if problems.is_empty() {
        return Ok(());
    }
    Err(ConfigError::ValidationFailed { problems })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EstimatorConfig, TraitConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&BayestraitConfig::default()).is_empty());
    }

    #[test]
    fn test_collects_every_problem() {
        let config = BayestraitConfig {
            estimator: EstimatorConfig {
                scale: Some(f64::INFINITY),
                base_variance: Some(0.0),
                min_variance: Some(-1.0),
                z: Some(f64::NAN),
                confidence_level: Some(1.0),
                ..Default::default()
            },
            traits: vec![TraitConfig::new("  ", 0.0, 1.0)],
        };
        let errors = validate(&config);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "estimator.scale",
                "estimator.base_variance",
                "estimator.min_variance",
                "estimator.z",
                "estimator.confidence_level",
                "traits[0].id",
            ]
        );
    }

    #[test]
    fn test_validate_or_error_combines() {
        let config = BayestraitConfig {
            estimator: EstimatorConfig {
                min_posterior_variance: Some(0.0),
                ..Default::default()
            },
            traits: Vec::new(),
        };
        match validate_or_error(&config) {
            Err(err @ ConfigError::ValidationFailed { .. }) => {
                assert_eq!(err.invalid_fields(), vec!["estimator.min_posterior_variance"]);
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }
}
