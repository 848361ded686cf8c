//! Inference errors: the taxonomy raised by the trait estimator.
//!
//! - `InvalidPrior`: malformed trait configuration, fatal at registration.
//! - `UnknownTrait`: evidence or a query names an unconfigured trait. The
//!   orchestrator recovers from this per item; direct callers see it.
//! - `Configuration`: the estimator cannot run at all (e.g. no traits).
//! - `NumericGuard`: a variance came out non-positive after every floor.
//!   Unreachable with valid settings, so it signals a configuration bug.

use super::error_code::{self, ErrorCode};
use super::ConfigError;

/// Errors raised by the registry, converter, updater, summarizer, and
/// orchestrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Invalid prior for trait '{trait_id}': {reason}")]
    InvalidPrior { trait_id: String, reason: String },

    #[error("Unknown trait: '{trait_id}'")]
    UnknownTrait { trait_id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Numeric guard tripped for trait '{trait_id}': {detail}")]
    NumericGuard { trait_id: String, detail: String },
}

impl InferenceError {
    pub fn invalid_prior(trait_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrior {
            trait_id: trait_id.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_trait(trait_id: impl Into<String>) -> Self {
        Self::UnknownTrait {
            trait_id: trait_id.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn numeric_guard(trait_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NumericGuard {
            trait_id: trait_id.into(),
            detail: detail.into(),
        }
    }

    /// Whether a run may continue past this error by dropping the evidence
    /// item or trait it concerns. The orchestrator aborts on anything else.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownTrait { .. } | Self::NumericGuard { .. })
    }
}

impl From<ConfigError> for InferenceError {
    fn from(e: ConfigError) -> Self {
        Self::configuration(e.to_string())
    }
}

impl ErrorCode for InferenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrior { .. } => error_code::INVALID_PRIOR,
            Self::UnknownTrait { .. } => error_code::UNKNOWN_TRAIT,
            Self::Configuration { .. } => error_code::CONFIGURATION_ERROR,
            Self::NumericGuard { .. } => error_code::NUMERIC_GUARD,
        }
    }
}
