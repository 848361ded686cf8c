//! Errors from loading `bayestrait.toml` and `BAYESTRAIT_*` overrides.

use super::error_code::{self, ErrorCode};
use crate::config::validation::ConfigValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bayestrait config not found: {path}")]
    FileNotFound { path: String },

    #[error("bayestrait config {path} is not valid TOML: {message}")]
    ParseError { path: String, message: String },

    #[error("bayestrait config could not be serialized: {message}")]
    Serialize { message: String },

    /// A `BAYESTRAIT_*` variable is set but unusable.
    #[error("environment override {var}={value:?} rejected: {message}")]
    EnvOverride {
        var: String,
        value: String,
        message: String,
    },

    /// Every field that failed validation, in declaration order.
    #[error("invalid bayestrait config: {}", join_problems(problems))]
    ValidationFailed { problems: Vec<ConfigValidationError> },
}

impl ConfigError {
    /// Dotted paths of the invalid fields, e.g. `estimator.z`, `traits[2].id`.
    /// Empty for anything but `ValidationFailed`.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            Self::ValidationFailed { problems } => {
                problems.iter().map(|p| p.field.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_problems(problems: &[ConfigValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => error_code::CONFIG_NOT_FOUND,
            Self::ParseError { .. } => error_code::CONFIG_PARSE,
            Self::Serialize { .. } => error_code::CONFIG_SERIALIZE,
            Self::EnvOverride { .. } => error_code::CONFIG_ENV_OVERRIDE,
            Self::ValidationFailed { .. } => error_code::CONFIG_INVALID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_names_every_field() {
        let err = ConfigError::ValidationFailed {
            problems: vec![
                ConfigValidationError {
                    field: "estimator.z".to_string(),
                    message: "must be finite and > 0, got -1".to_string(),
                },
                ConfigValidationError {
                    field: "traits[0].id".to_string(),
                    message: "must not be empty".to_string(),
                },
            ],
        };
        assert_eq!(err.invalid_fields(), vec!["estimator.z", "traits[0].id"]);
        assert_eq!(
            err.coded_string(),
            "[CONFIG_INVALID] invalid bayestrait config: \
             estimator.z: must be finite and > 0, got -1; traits[0].id: must not be empty"
        );
    }

    #[test]
    fn test_env_override_quotes_value() {
        let err = ConfigError::EnvOverride {
            var: "BAYESTRAIT_Z".to_string(),
            value: "wide".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(err.error_code(), "CONFIG_ENV_OVERRIDE");
        assert!(err.to_string().contains("BAYESTRAIT_Z=\"wide\""));
        assert!(err.invalid_fields().is_empty());
    }
}
