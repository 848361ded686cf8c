//! Resolved estimator settings.
//!
//! [`EstimatorConfig`] holds optional, user-facing values; `Settings` is the
//! concrete, validated set every pipeline stage reads.

use bayestrait_core::config::estimator_config::{
    DEFAULT_BASE_VARIANCE, DEFAULT_MIN_POSTERIOR_VARIANCE, DEFAULT_MIN_VARIANCE, DEFAULT_SCALE,
    DEFAULT_Z,
};
use bayestrait_core::{EstimatorConfig, InferenceError, NeutralPolicy};

use crate::summarizer::z_for_confidence_level;

/// Concrete estimator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Maps `strength * confidence * weight` onto trait score units.
    pub scale: f64,
    /// Pseudo-observation variance at zero confidence.
    pub base_variance: f64,
    /// Floor on pseudo-observation variance.
    pub min_variance: f64,
    /// Floor on posterior variance (never raised above the prior variance).
    pub min_posterior_variance: f64,
    /// Confidence interval multiplier.
    pub z: f64,
    pub neutral_policy: NeutralPolicy,
    /// Sort observations before folding so results are bit-exact.
    pub deterministic_order: bool,
    /// Estimate a subject's traits on the rayon pool.
    pub parallel_traits: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            base_variance: DEFAULT_BASE_VARIANCE,
            min_variance: DEFAULT_MIN_VARIANCE,
            min_posterior_variance: DEFAULT_MIN_POSTERIOR_VARIANCE,
            z: DEFAULT_Z,
            neutral_policy: NeutralPolicy::Sharpen,
            deterministic_order: false,
            parallel_traits: false,
        }
    }
}

impl Settings {
    /// Resolve settings from config. An explicit `z` takes precedence over
    /// `confidence_level`.
    pub fn from_config(config: &EstimatorConfig) -> Result<Self, InferenceError> {
        let z = match (config.z, config.confidence_level) {
            (Some(z), _) => z,
            (None, Some(level)) => z_for_confidence_level(level)?,
            (None, None) => DEFAULT_Z,
        };
        let settings = Self {
            scale: config.effective_scale(),
            base_variance: config.effective_base_variance(),
            min_variance: config.effective_min_variance(),
            min_posterior_variance: config.effective_min_posterior_variance(),
            z,
            neutral_policy: config.effective_neutral_policy(),
            deterministic_order: config.effective_deterministic_order(),
            parallel_traits: config.effective_parallel_traits(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn with_neutral_policy(mut self, policy: NeutralPolicy) -> Self {
        self.neutral_policy = policy;
        self
    }

    pub fn with_deterministic_order(mut self, on: bool) -> Self {
        self.deterministic_order = on;
        self
    }

    pub fn with_parallel_traits(mut self, on: bool) -> Self {
        self.parallel_traits = on;
        self
    }

    /// Every variance floor must be strictly positive so no stage can
    /// produce a zero or negative variance.
    pub fn validate(&self) -> Result<(), InferenceError> {
        if !self.scale.is_finite() {
            return Err(InferenceError::configuration(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }
        for (name, value) in [
            ("base_variance", self.base_variance),
            ("min_variance", self.min_variance),
            ("min_posterior_variance", self.min_posterior_variance),
            ("z", self.z),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InferenceError::configuration(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}
