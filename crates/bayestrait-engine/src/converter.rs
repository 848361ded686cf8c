//! Evidence-to-likelihood conversion.
//!
//! One evidence item plus its trait's weights becomes one Gaussian
//! pseudo-observation:
//!
//! ```text
//! signal   = strength * confidence * weight
//! mean     = sign(direction) * signal * scale
//! variance = max(min_variance, (1 - confidence) * base_variance)
//! ```
//!
//! The variance floor keeps a fully confident item from reaching infinite
//! precision and overriding the prior for good.

use bayestrait_core::types::SanitizedSignal;
use bayestrait_core::{Direction, Evidence, InferenceError, NeutralPolicy};
use serde::{Deserialize, Serialize};

use crate::registry::TraitPrior;
use crate::settings::Settings;

/// Gaussian likelihood derived from one evidence item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PseudoObservation {
    pub mean: f64,
    /// Always > 0.
    pub variance: f64,
}

impl PseudoObservation {
    pub fn precision(&self) -> f64 {
        1.0 / self.variance
    }
}

/// A successful conversion with the intermediate values kept for auditing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub observation: PseudoObservation,
    pub weight: f64,
    pub signal: f64,
    pub sanitized: SanitizedSignal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionOutcome {
    Observed(Conversion),
    /// Neutral evidence skipped under `NeutralPolicy::Ignore`.
    NeutralIgnored,
}

/// Convert one evidence item against its resolved trait.
///
/// Fails with `NumericGuard` only if the settings allow a non-positive
/// variance, which validated settings never do.
pub fn convert(
    evidence: &Evidence,
    prior: &TraitPrior,
    settings: &Settings,
) -> Result<ConversionOutcome, InferenceError> {
    if evidence.direction == Direction::Neutral
        && settings.neutral_policy == NeutralPolicy::Ignore
    {
        return Ok(ConversionOutcome::NeutralIgnored);
    }

    let sanitized = evidence.sanitized();
    let weight = prior.weight_for(&evidence.evidence_type);
    let signal = sanitized.strength * sanitized.confidence * weight;
    let mean = evidence.direction.sign() * signal * settings.scale;
    let variance =
        ((1.0 - sanitized.confidence) * settings.base_variance).max(settings.min_variance);

    if !variance.is_finite() || variance <= 0.0 || !mean.is_finite() {
        return Err(InferenceError::numeric_guard(
            prior.id().clone(),
            format!("pseudo-observation mean={mean} variance={variance} is not usable"),
        ));
    }

    Ok(ConversionOutcome::Observed(Conversion {
        observation: PseudoObservation { mean, variance },
        weight,
        signal,
        sanitized,
    }))
}
