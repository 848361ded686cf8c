//! Posterior summaries: confidence intervals and calibration metadata.

use std::fmt;

use bayestrait_core::{InferenceError, TraitId};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::registry::TraitRegistry;
use crate::updater::Posterior;

/// How much the evidence narrowed the prior, bucketed by certainty gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyTier {
    /// No evidence; the estimate is the prior.
    Prior,
    /// certainty_gain < 0.40
    Weak,
    /// certainty_gain ≥ 0.40
    Moderate,
    /// certainty_gain ≥ 0.75
    Strong,
}

impl CertaintyTier {
    pub fn classify(prior_only: bool, certainty_gain: f64) -> Self {
        if prior_only {
            Self::Prior
        } else if certainty_gain >= 0.75 {
            Self::Strong
        } else if certainty_gain >= 0.40 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Prior => "prior",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

impl fmt::Display for CertaintyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final per-trait estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorEstimate {
    pub trait_id: TraitId,
    pub mean: f64,
    /// Always > 0.
    pub variance: f64,
    pub std_dev: f64,
    pub evidence_count: usize,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Interval multiplier the bounds were computed with.
    pub z: f64,
    /// `evidence_count == 0`.
    pub prior_only: bool,
    pub prior_mean: f64,
    pub prior_variance: f64,
    /// `1 - variance / prior_variance`: 0 for the prior, toward 1 as
    /// evidence accumulates.
    pub certainty_gain: f64,
    pub tier: CertaintyTier,
    /// The overconfidence cap raised the variance.
    pub variance_capped: bool,
}

impl PosteriorEstimate {
    /// Half the interval width: `z * std_dev`.
    pub fn half_width(&self) -> f64 {
        self.z * self.std_dev
    }

    /// Whether `value` lies inside `[ci_lower, ci_upper]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.ci_lower && value <= self.ci_upper
    }
}

/// Summarize a trait's posterior.
///
/// Resolves the trait in the registry for its prior, so an unregistered id
/// fails with `UnknownTrait`. A non-positive `z` is a configuration error.
pub fn summarize(
    registry: &TraitRegistry,
    trait_id: &str,
    posterior: &Posterior,
    z: f64,
) -> Result<PosteriorEstimate, InferenceError> {
    let prior = registry.get_trait(trait_id)?;

    if !z.is_finite() || z <= 0.0 {
        return Err(InferenceError::configuration(format!(
            "z must be finite and > 0, got {z}"
        )));
    }
    if !posterior.variance.is_finite() || posterior.variance <= 0.0 {
        return Err(InferenceError::numeric_guard(
            trait_id,
            format!("posterior variance {} is not positive", posterior.variance),
        ));
    }

    let std_dev = posterior.variance.sqrt();
    let half = z * std_dev;
    let prior_only = posterior.evidence_count == 0;
    let certainty_gain = if prior_only {
        0.0
    } else {
        (1.0 - posterior.variance / prior.prior_variance()).clamp(0.0, 1.0)
    };

    Ok(PosteriorEstimate {
        trait_id: prior.id().clone(),
        mean: posterior.mean,
        variance: posterior.variance,
        std_dev,
        evidence_count: posterior.evidence_count,
        ci_lower: posterior.mean - half,
        ci_upper: posterior.mean + half,
        z,
        prior_only,
        prior_mean: prior.prior_mean(),
        prior_variance: prior.prior_variance(),
        certainty_gain,
        tier: CertaintyTier::classify(prior_only, certainty_gain),
        variance_capped: posterior.variance_capped,
    })
}

/// Two-sided standard-normal multiplier for a coverage level, via the
/// inverse CDF. `0.95` gives ≈ 1.959964.
pub fn z_for_confidence_level(level: f64) -> Result<f64, InferenceError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(InferenceError::configuration(format!(
            "confidence level must be in (0, 1), got {level}"
        )));
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| InferenceError::configuration(format!("standard normal: {e}")))?;
    let z = normal.inverse_cdf(1.0 - (1.0 - level) / 2.0);
    if !z.is_finite() || z <= 0.0 {
        return Err(InferenceError::configuration(format!(
            "confidence level {level} gives unusable z={z}"
        )));
    }
    Ok(z)
}
