//! Per-trait prior and evidence weighting, as read from the trait table.
//!
//! Values are taken as written here; range checks belong to the registry,
//! which reports them as invalid priors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_EVIDENCE_WEIGHT: f64 = 1.0;

/// One `[[traits]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraitConfig {
    pub id: String,
    pub prior_mean: f64,
    pub prior_variance: f64,
    /// Weight for evidence types without an entry. Default: 1.0.
    #[serde(default)]
    pub default_weight: Option<f64>,
    /// Weight per evidence-type label. Missing labels use `default_weight`.
    #[serde(default)]
    pub evidence_weights: BTreeMap<String, f64>,
}

impl TraitConfig {
    pub fn new(id: impl Into<String>, prior_mean: f64, prior_variance: f64) -> Self {
        Self {
            id: id.into(),
            prior_mean,
            prior_variance,
            default_weight: None,
            evidence_weights: BTreeMap::new(),
        }
    }

    pub fn with_weight(mut self, evidence_type: impl Into<String>, weight: f64) -> Self {
        self.evidence_weights.insert(evidence_type.into(), weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = Some(weight);
        self
    }

    pub fn effective_default_weight(&self) -> f64 {
        self.default_weight.unwrap_or(DEFAULT_EVIDENCE_WEIGHT)
    }
}
