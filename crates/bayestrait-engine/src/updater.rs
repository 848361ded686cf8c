//! Conjugate Gaussian-Gaussian fusion.
//!
//! Precision adds: `τ_post = τ0 + Σ τ_i` and
//! `mean_post = (τ0·μ0 + Σ τ_i·μ_i) / τ_post`. [`PrecisionSum`] is the fold
//! state; `observe` and `merge` are associative and commutative, so the
//! observations can be folded in any order or split into shards and merged.

use std::cmp::Ordering;

use bayestrait_core::InferenceError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::converter::PseudoObservation;
use crate::settings::Settings;

/// Above this many observations the fold runs on the rayon pool, unless
/// deterministic order is requested.
pub const PARALLEL_FOLD_THRESHOLD: usize = 4096;

/// Running precision-weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrecisionSum {
    /// Σ τ
    pub precision: f64,
    /// Σ τ·μ
    pub weighted_mean: f64,
    /// Observations folded in (the prior does not count).
    pub count: usize,
}

impl PrecisionSum {
    /// Seed the fold with a prior. The prior contributes precision but not
    /// to `count`.
    pub fn from_prior(mean: f64, variance: f64) -> Self {
        let precision = 1.0 / variance;
        Self {
            precision,
            weighted_mean: precision * mean,
            count: 0,
        }
    }

    pub fn observe(self, obs: &PseudoObservation) -> Self {
        let tau = obs.precision();
        Self {
            precision: self.precision + tau,
            weighted_mean: self.weighted_mean + tau * obs.mean,
            count: self.count + 1,
        }
    }

    /// Combine two partial sums. Only one side may carry the prior.
    pub fn merge(self, other: Self) -> Self {
        Self {
            precision: self.precision + other.precision,
            weighted_mean: self.weighted_mean + other.weighted_mean,
            count: self.count + other.count,
        }
    }

    /// Turn the accumulated sums into a posterior.
    ///
    /// `variance_floor` caps overconfidence: the posterior variance never
    /// drops below it.
    pub fn finish(&self, trait_id: &str, variance_floor: f64) -> Result<Posterior, InferenceError> {
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(InferenceError::numeric_guard(
                trait_id,
                format!("posterior precision {} is not positive and finite", self.precision),
            ));
        }
        let mean = self.weighted_mean / self.precision;
        let raw_variance = 1.0 / self.precision;
        let variance_capped = raw_variance < variance_floor;
        let variance = raw_variance.max(variance_floor);
        if !mean.is_finite() || !variance.is_finite() || variance <= 0.0 {
            return Err(InferenceError::numeric_guard(
                trait_id,
                format!("posterior mean={mean} variance={variance} is not usable"),
            ));
        }
        Ok(Posterior {
            mean,
            variance,
            evidence_count: self.count,
            variance_capped,
        })
    }
}

/// Posterior belief for one trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    pub mean: f64,
    pub variance: f64,
    pub evidence_count: usize,
    /// The overconfidence cap raised the variance.
    pub variance_capped: bool,
}

impl Posterior {
    /// The prior itself, returned untouched when there is no evidence.
    pub fn from_prior(mean: f64, variance: f64) -> Self {
        Self {
            mean,
            variance,
            evidence_count: 0,
            variance_capped: false,
        }
    }

    pub fn precision(&self) -> f64 {
        1.0 / self.variance
    }
}

/// Fuse a trait's prior with its pseudo-observations.
///
/// With no observations the prior comes back bit-for-bit. The variance
/// floor is `min(min_posterior_variance, prior_variance)` so adding
/// evidence can never widen the posterior beyond where it started.
pub fn update(
    trait_id: &str,
    prior_mean: f64,
    prior_variance: f64,
    observations: &[PseudoObservation],
    settings: &Settings,
) -> Result<Posterior, InferenceError> {
    if !prior_variance.is_finite() || prior_variance <= 0.0 {
        return Err(InferenceError::numeric_guard(
            trait_id,
            format!("prior variance {prior_variance} is not positive"),
        ));
    }
    if observations.is_empty() {
        return Ok(Posterior::from_prior(prior_mean, prior_variance));
    }

    let evidence = if settings.deterministic_order {
        fold_sorted(observations)
    } else if observations.len() >= PARALLEL_FOLD_THRESHOLD {
        fold_parallel(observations)
    } else {
        fold(observations)
    };

    let floor = settings.min_posterior_variance.min(prior_variance);
    PrecisionSum::from_prior(prior_mean, prior_variance)
        .merge(evidence)
        .finish(trait_id, floor)
}

/// Sequential fold in the given order.
pub fn fold(observations: &[PseudoObservation]) -> PrecisionSum {
    observations
        .iter()
        .fold(PrecisionSum::default(), PrecisionSum::observe)
}

/// Fold after sorting by `(mean, variance)`, making the result independent
/// of input order down to the last bit.
pub fn fold_sorted(observations: &[PseudoObservation]) -> PrecisionSum {
    let mut sorted = observations.to_vec();
    sorted.sort_by(|a, b| match a.mean.total_cmp(&b.mean) {
        Ordering::Equal => a.variance.total_cmp(&b.variance),
        other => other,
    });
    fold(&sorted)
}

/// Sharded fold on the rayon pool; each shard folds locally, then shards
/// merge.
pub fn fold_parallel(observations: &[PseudoObservation]) -> PrecisionSum {
    observations
        .par_iter()
        .fold(PrecisionSum::default, |acc, obs| acc.observe(obs))
        .reduce(PrecisionSum::default, PrecisionSum::merge)
}
