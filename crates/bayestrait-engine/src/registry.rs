//! Trait prior registry: per-trait Gaussian prior and evidence weighting.
//!
//! Built once at startup, then shared read-only (typically behind an `Arc`)
//! by every inference run.

use std::collections::BTreeMap;

use bayestrait_core::{EvidenceType, InferenceError, TraitConfig, TraitId};
use rustc_hash::FxHashMap;

/// A configured trait: its prior belief and how much each evidence type
/// counts toward it.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitPrior {
    id: TraitId,
    prior_mean: f64,
    prior_variance: f64,
    evidence_weights: FxHashMap<EvidenceType, f64>,
    default_weight: f64,
}

impl TraitPrior {
    /// Validate and build a trait prior.
    ///
    /// Fails with `InvalidPrior` if the mean is not finite, the variance is
    /// not finite and > 0, the prior precision `1 / variance` or the
    /// precision-weighted mean `mean / variance` overflows, or any weight
    /// falls outside [0, 1].
    pub fn new(
        id: impl Into<TraitId>,
        prior_mean: f64,
        prior_variance: f64,
        evidence_weights: impl IntoIterator<Item = (EvidenceType, f64)>,
        default_weight: f64,
    ) -> Result<Self, InferenceError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(InferenceError::invalid_prior(id, "trait id must not be empty"));
        }
        if !prior_mean.is_finite() {
            return Err(InferenceError::invalid_prior(
                id,
                format!("prior_mean must be finite, got {prior_mean}"),
            ));
        }
        if !prior_variance.is_finite() || prior_variance <= 0.0 {
            return Err(InferenceError::invalid_prior(
                id,
                format!("prior_variance must be finite and > 0, got {prior_variance}"),
            ));
        }
        // The updater seeds its fold with these two terms.
        if !(1.0 / prior_variance).is_finite() {
            return Err(InferenceError::invalid_prior(
                id,
                format!("prior_variance {prior_variance} is too small; its precision overflows"),
            ));
        }
        if !(prior_mean / prior_variance).is_finite() {
            return Err(InferenceError::invalid_prior(
                id,
                format!("prior_mean {prior_mean} over prior_variance {prior_variance} overflows"),
            ));
        }
        if !is_unit(default_weight) {
            return Err(InferenceError::invalid_prior(
                id,
                format!("default_weight must be in [0, 1], got {default_weight}"),
            ));
        }

        let mut weights = FxHashMap::default();
        for (evidence_type, weight) in evidence_weights {
            if !is_unit(weight) {
                return Err(InferenceError::invalid_prior(
                    id,
                    format!("weight for '{evidence_type}' must be in [0, 1], got {weight}"),
                ));
            }
            weights.insert(evidence_type, weight);
        }

        Ok(Self {
            id,
            prior_mean,
            prior_variance,
            evidence_weights: weights,
            default_weight,
        })
    }

    /// Build from a `[[traits]]` config entry.
    pub fn from_config(config: &TraitConfig) -> Result<Self, InferenceError> {
        Self::new(
            config.id.as_str(),
            config.prior_mean,
            config.prior_variance,
            config
                .evidence_weights
                .iter()
                .map(|(label, w)| (EvidenceType::from_label(label), *w)),
            config.effective_default_weight(),
        )
    }

    pub fn id(&self) -> &TraitId {
        &self.id
    }

    pub fn prior_mean(&self) -> f64 {
        self.prior_mean
    }

    pub fn prior_variance(&self) -> f64 {
        self.prior_variance
    }

    /// `1 / prior_variance`.
    pub fn prior_precision(&self) -> f64 {
        1.0 / self.prior_variance
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Weight for an evidence type, falling back to the default weight.
    pub fn weight_for(&self, evidence_type: &EvidenceType) -> f64 {
        self.evidence_weights
            .get(evidence_type)
            .copied()
            .unwrap_or(self.default_weight)
    }

}

fn is_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

/// Read-only table of every known trait, keyed and iterated by id.
#[derive(Debug, Clone, Default)]
pub struct TraitRegistry {
    traits: BTreeMap<TraitId, TraitPrior>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the trait table, failing on the first invalid
    /// or duplicate entry.
    pub fn from_configs(configs: &[TraitConfig]) -> Result<Self, InferenceError> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(TraitPrior::from_config(config)?)?;
        }
        tracing::debug!(traits = registry.len(), "trait registry built");
        Ok(registry)
    }

    /// Validate and register a trait.
    pub fn register_trait(
        &mut self,
        id: impl Into<TraitId>,
        prior_mean: f64,
        prior_variance: f64,
        evidence_weights: impl IntoIterator<Item = (EvidenceType, f64)>,
        default_weight: f64,
    ) -> Result<(), InferenceError> {
        let prior = TraitPrior::new(
            id,
            prior_mean,
            prior_variance,
            evidence_weights,
            default_weight,
        )?;
        self.register(prior)
    }

    /// Register an already validated trait. Duplicate ids are rejected.
    pub fn register(&mut self, prior: TraitPrior) -> Result<(), InferenceError> {
        if self.traits.contains_key(prior.id()) {
            return Err(InferenceError::invalid_prior(
                prior.id().clone(),
                "trait is already registered",
            ));
        }
        self.traits.insert(prior.id().clone(), prior);
        Ok(())
    }

    /// Look up a trait, failing with `UnknownTrait` if absent.
    pub fn get_trait(&self, id: &str) -> Result<&TraitPrior, InferenceError> {
        self.traits
            .get(id)
            .ok_or_else(|| InferenceError::unknown_trait(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.traits.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Traits in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TraitPrior> {
        self.traits.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TraitId> {
        self.traits.keys()
    }
}
