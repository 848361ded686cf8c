//! Estimator tuning: conversion constants, variance floors, interval width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE: f64 = 2.0;
pub const DEFAULT_BASE_VARIANCE: f64 = 0.5;
pub const DEFAULT_MIN_VARIANCE: f64 = 0.01;
pub const DEFAULT_MIN_POSTERIOR_VARIANCE: f64 = 1e-4;
pub const DEFAULT_Z: f64 = 1.96;

/// How neutral-direction evidence is treated.
///
/// Neutral evidence never shifts the mean. Under `Sharpen` it still adds
/// precision and narrows the posterior toward the prior mean; under
/// `Ignore` it is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeutralPolicy {
    #[default]
    Sharpen,
    Ignore,
}

impl NeutralPolicy {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sharpen => "sharpen",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for NeutralPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeutralPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharpen" => Ok(Self::Sharpen),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown neutral policy '{other}'")),
        }
    }
}

/// Configuration for the estimator. Every field is optional; unset fields
/// fall back to the compiled defaults via the `effective_*` accessors.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Maps normalized signal onto trait score units. Default: 2.0.
    pub scale: Option<f64>,
    /// Pseudo-observation variance at zero confidence. Default: 0.5.
    pub base_variance: Option<f64>,
    /// Floor on pseudo-observation variance. Default: 0.01.
    pub min_variance: Option<f64>,
    /// Floor on posterior variance. Default: 1e-4.
    pub min_posterior_variance: Option<f64>,
    /// Interval multiplier. Default: 1.96.
    pub z: Option<f64>,
    /// Two-sided interval coverage in (0, 1); converted to `z` when `z`
    /// itself is unset.
    pub confidence_level: Option<f64>,
    /// Neutral evidence handling. Default: sharpen.
    pub neutral_policy: Option<NeutralPolicy>,
    /// Sort observations before folding for bit-exact results. Default: false.
    pub deterministic_order: Option<bool>,
    /// Process a subject's traits on the rayon pool. Default: false.
    pub parallel_traits: Option<bool>,
}

impl EstimatorConfig {
    pub fn effective_scale(&self) -> f64 {
        self.scale.unwrap_or(DEFAULT_SCALE)
    }

    pub fn effective_base_variance(&self) -> f64 {
        self.base_variance.unwrap_or(DEFAULT_BASE_VARIANCE)
    }

    pub fn effective_min_variance(&self) -> f64 {
        self.min_variance.unwrap_or(DEFAULT_MIN_VARIANCE)
    }

    pub fn effective_min_posterior_variance(&self) -> f64 {
        self.min_posterior_variance
            .unwrap_or(DEFAULT_MIN_POSTERIOR_VARIANCE)
    }

    pub fn effective_neutral_policy(&self) -> NeutralPolicy {
        self.neutral_policy.unwrap_or_default()
    }

    pub fn effective_deterministic_order(&self) -> bool {
        self.deterministic_order.unwrap_or(false)
    }

    pub fn effective_parallel_traits(&self) -> bool {
        self.parallel_traits.unwrap_or(false)
    }

    /// Overlay `other` onto `self`: fields set in `other` win.
    pub fn merge(&mut self, other: &EstimatorConfig) {
        if other.scale.is_some() {
            self.scale = other.scale;
        }
        if other.base_variance.is_some() {
            self.base_variance = other.base_variance;
        }
        if other.min_variance.is_some() {
            self.min_variance = other.min_variance;
        }
        if other.min_posterior_variance.is_some() {
            self.min_posterior_variance = other.min_posterior_variance;
        }
        if other.z.is_some() {
            self.z = other.z;
        }
        if other.confidence_level.is_some() {
            self.confidence_level = other.confidence_level;
        }
        if other.neutral_policy.is_some() {
            self.neutral_policy = other.neutral_policy;
        }
        if other.deterministic_order.is_some() {
            self.deterministic_order = other.deterministic_order;
        }
        if other.parallel_traits.is_some() {
            self.parallel_traits = other.parallel_traits;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EstimatorConfig::default();
        assert_eq!(c.effective_scale(), 2.0);
        assert_eq!(c.effective_base_variance(), 0.5);
        assert_eq!(c.effective_min_variance(), 0.01);
        assert_eq!(c.effective_min_posterior_variance(), 1e-4);
        assert_eq!(c.effective_neutral_policy(), NeutralPolicy::Sharpen);
        assert!(!c.effective_deterministic_order());
        assert!(!c.effective_parallel_traits());
    }

    #[test]
    fn test_merge_only_overrides_set_fields() {
        let mut base = EstimatorConfig {
            scale: Some(3.0),
            min_variance: Some(0.02),
            ..Default::default()
        };
        let overlay = EstimatorConfig {
            scale: Some(1.5),
            neutral_policy: Some(NeutralPolicy::Ignore),
            ..Default::default()
        };
        base.merge(&overlay);
        assert_eq!(base.scale, Some(1.5));
        assert_eq!(base.min_variance, Some(0.02));
        assert_eq!(base.neutral_policy, Some(NeutralPolicy::Ignore));
    }

    #[test]
    fn test_neutral_policy_parse() {
        assert_eq!("Ignore".parse::<NeutralPolicy>().unwrap(), NeutralPolicy::Ignore);
        assert!("maybe".parse::<NeutralPolicy>().is_err());
    }
}
