//! Inference orchestration: one subject's evidence in, one `InferenceRun` out.
//!
//! Evidence is grouped by trait, each registered trait runs
//! converter → updater → summarizer, and every evidence item ends up in the
//! audit trail as either used or dropped. Recoverable problems with a single
//! item or a single trait become warnings; an empty registry or an
//! unrecoverable error aborts the run.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use bayestrait_core::tracing::metrics;
use bayestrait_core::{
    BayestraitConfig, Direction, Evidence, EvidenceType, InferenceError, TraitId,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::converter::{self, ConversionOutcome, PseudoObservation};
use crate::registry::{TraitPrior, TraitRegistry};
use crate::settings::Settings;
use crate::summarizer::{self, PosteriorEstimate};
use crate::updater;

/// What happened to one evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditOutcome {
    Used {
        weight: f64,
        signal: f64,
        pseudo_mean: f64,
        pseudo_variance: f64,
    },
    Dropped {
        reason: String,
    },
}

/// Audit record for one input evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceAudit {
    /// Position in the input list.
    pub index: usize,
    pub trait_id: TraitId,
    pub evidence_type: EvidenceType,
    pub direction: Direction,
    pub source_note: String,
    pub outcome: AuditOutcome,
}

impl EvidenceAudit {
    fn new(index: usize, evidence: &Evidence, outcome: AuditOutcome) -> Self {
        Self {
            index,
            trait_id: evidence.trait_id.clone(),
            evidence_type: evidence.evidence_type.clone(),
            direction: evidence.direction,
            source_note: evidence.source_note.clone(),
            outcome,
        }
    }

    pub fn is_used(&self) -> bool {
        matches!(self.outcome, AuditOutcome::Used { .. })
    }
}

/// The result of estimating every registered trait for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRun {
    pub run_id: Uuid,
    pub subject_id: String,
    pub generated_at: DateTime<Utc>,
    /// One entry per registered trait that could be estimated.
    pub estimates: BTreeMap<TraitId, PosteriorEstimate>,
    /// Everything that could not be used, itemized.
    pub warnings: Vec<String>,
    /// One entry per input evidence item, in input order.
    pub audit: Vec<EvidenceAudit>,
}

impl InferenceRun {
    pub fn estimate(&self, trait_id: &str) -> Option<&PosteriorEstimate> {
        self.estimates.get(trait_id)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.audit.iter().filter(|a| !a.is_used()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Input for one subject in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectEvidence {
    pub subject_id: String,
    pub evidence: Vec<Evidence>,
}

impl SubjectEvidence {
    pub fn new(subject_id: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self {
            subject_id: subject_id.into(),
            evidence,
        }
    }
}

/// Per-trait work product, merged into the run afterwards.
struct TraitOutcome {
    estimate: Option<PosteriorEstimate>,
    audit: Vec<EvidenceAudit>,
    warnings: Vec<String>,
}

/// Drives the estimation pipeline against a shared, read-only registry.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    registry: Arc<TraitRegistry>,
    settings: Settings,
}

impl InferenceEngine {
    /// Create an engine. Settings are validated here; an empty registry is
    /// accepted but every run against it fails.
    pub fn new(registry: Arc<TraitRegistry>, settings: Settings) -> Result<Self, InferenceError> {
        settings.validate()?;
        Ok(Self { registry, settings })
    }

    /// Build the registry and settings from a loaded config.
    pub fn from_config(config: &BayestraitConfig) -> Result<Self, InferenceError> {
        let registry = TraitRegistry::from_configs(&config.traits)?;
        let settings = Settings::from_config(&config.estimator)?;
        Self::new(Arc::new(registry), settings)
    }

    pub fn registry(&self) -> &TraitRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Estimate every registered trait for one subject.
    ///
    /// Fails with `Configuration` when no traits are registered; that check
    /// happens before any evidence is read. Otherwise only an error that
    /// `InferenceError::is_recoverable` rejects can abort the run.
    pub fn infer(
        &self,
        subject_id: &str,
        evidence: &[Evidence],
    ) -> Result<InferenceRun, InferenceError> {
        if self.registry.is_empty() {
            return Err(InferenceError::configuration(
                "no traits registered; cannot run inference",
            ));
        }

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "inference_run",
            { metrics::SUBJECT_ID } = subject_id,
            { metrics::RUN_ID } = tracing::field::display(run_id),
        );
        let _guard = span.enter();
        let started = Instant::now();

        let mut audit = Vec::with_capacity(evidence.len());
        let mut warnings = Vec::new();

        // Group by trait, dropping items whose trait is unknown.
        let mut grouped: FxHashMap<&str, Vec<(usize, &Evidence)>> = FxHashMap::default();
        for (index, item) in evidence.iter().enumerate() {
            if self.registry.contains(item.trait_id.as_str()) {
                grouped.entry(item.trait_id.as_str()).or_default().push((index, item));
            } else {
                let err = InferenceError::unknown_trait(item.trait_id.as_str());
                warnings.push(describe_drop(index, item, &err.to_string()));
                audit.push(EvidenceAudit::new(
                    index,
                    item,
                    AuditOutcome::Dropped {
                        reason: err.to_string(),
                    },
                ));
            }
        }

        let traits: Vec<&TraitPrior> = self.registry.iter().collect();
        let empty = Vec::new();
        let run_trait = |prior: &&TraitPrior| {
            let items = grouped.get(prior.id().as_str()).unwrap_or(&empty);
            self.estimate_trait(prior, items)
        };
        let outcomes: Vec<TraitOutcome> = if self.settings.parallel_traits {
            traits.par_iter().map(run_trait).collect::<Result<_, _>>()?
        } else {
            traits.iter().map(run_trait).collect::<Result<_, _>>()?
        };

        let mut estimates = BTreeMap::new();
        for outcome in outcomes {
            audit.extend(outcome.audit);
            warnings.extend(outcome.warnings);
            if let Some(estimate) = outcome.estimate {
                estimates.insert(estimate.trait_id.clone(), estimate);
            }
        }
        audit.sort_by_key(|a| a.index);

        let dropped = audit.iter().filter(|a| !a.is_used()).count();
        for w in &warnings {
            tracing::warn!("{w}");
        }
        tracing::info!(
            { metrics::EVIDENCE_TOTAL } = evidence.len(),
            { metrics::EVIDENCE_DROPPED } = dropped,
            { metrics::RUN_DURATION_US } = started.elapsed().as_micros() as u64,
            traits = estimates.len(),
            "inference run complete"
        );

        Ok(InferenceRun {
            run_id,
            subject_id: subject_id.to_string(),
            generated_at: Utc::now(),
            estimates,
            warnings,
            audit,
        })
    }

    /// Run many subjects on the rayon pool. Results keep input order.
    pub fn infer_batch(
        &self,
        subjects: &[SubjectEvidence],
    ) -> Vec<Result<InferenceRun, InferenceError>> {
        tracing::info!({ metrics::BATCH_SIZE } = subjects.len(), "starting inference batch");
        subjects
            .par_iter()
            .map(|s| self.infer(&s.subject_id, &s.evidence))
            .collect()
    }

    /// Convert, fuse, and summarize one trait. Recoverable errors turn into
    /// warnings and, at worst, an absent estimate; anything else is
    /// returned.
    fn estimate_trait(
        &self,
        prior: &TraitPrior,
        items: &[(usize, &Evidence)],
    ) -> Result<TraitOutcome, InferenceError> {
        let trait_id = prior.id().as_str();
        let mut audit = Vec::with_capacity(items.len());
        let mut warnings = Vec::new();
        let mut observations: Vec<PseudoObservation> = Vec::with_capacity(items.len());

        for &(index, item) in items {
            match converter::convert(item, prior, &self.settings) {
                Ok(ConversionOutcome::Observed(c)) => {
                    if c.sanitized.non_finite {
                        warnings.push(format!(
                            "evidence #{index} (trait '{trait_id}'): \
                             non-finite strength or confidence replaced"
                        ));
                    } else if c.sanitized.clamped {
                        warnings.push(format!(
                            "evidence #{index} (trait '{trait_id}'): \
                             strength or confidence outside [0, 1] clamped"
                        ));
                    }
                    observations.push(c.observation);
                    audit.push(EvidenceAudit::new(
                        index,
                        item,
                        AuditOutcome::Used {
                            weight: c.weight,
                            signal: c.signal,
                            pseudo_mean: c.observation.mean,
                            pseudo_variance: c.observation.variance,
                        },
                    ));
                }
                Ok(ConversionOutcome::NeutralIgnored) => {
                    let reason = "neutral evidence ignored by policy".to_string();
                    warnings.push(describe_drop(index, item, &reason));
                    audit.push(EvidenceAudit::new(index, item, AuditOutcome::Dropped { reason }));
                }
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    warnings.push(describe_drop(index, item, &err.to_string()));
                    audit.push(EvidenceAudit::new(
                        index,
                        item,
                        AuditOutcome::Dropped {
                            reason: err.to_string(),
                        },
                    ));
                }
            }
        }

        let estimate = updater::update(
            trait_id,
            prior.prior_mean(),
            prior.prior_variance(),
            &observations,
            &self.settings,
        )
        .and_then(|posterior| {
            tracing::debug!(
                { metrics::TRAIT_ID } = trait_id,
                { metrics::EVIDENCE_USED } = posterior.evidence_count,
                { metrics::POSTERIOR_PRECISION } = posterior.precision(),
                mean = posterior.mean,
                "trait posterior"
            );
            summarizer::summarize(&self.registry, trait_id, &posterior, self.settings.z)
        });

        let estimate = match estimate {
            Ok(e) => Some(e),
            Err(err) if !err.is_recoverable() => return Err(err),
            Err(err) => {
                warnings.push(format!("trait '{trait_id}' omitted from result: {err}"));
                None
            }
        };

        Ok(TraitOutcome {
            estimate,
            audit,
            warnings,
        })
    }
}

fn describe_drop(index: usize, item: &Evidence, reason: &str) -> String {
    if item.source_note.is_empty() {
        format!(
            "evidence #{index} ({} for trait '{}') dropped: {reason}",
            item.evidence_type, item.trait_id
        )
    } else {
        format!(
            "evidence #{index} ({} for trait '{}', source: {}) dropped: {reason}",
            item.evidence_type, item.trait_id, item.source_note
        )
    }
}
