//! Evidence-driven Bayesian trait estimation.
//!
//! Each trait carries a Gaussian prior. Every evidence item is turned into
//! a Gaussian pseudo-observation, fused into the prior by conjugate
//! precision weighting, and summarized as a posterior with a confidence
//! interval. [`InferenceEngine`] drives the whole pipeline for one subject
//! at a time and returns a self-contained [`InferenceRun`].
//!
//! Pipeline: registry → converter → updater → summarizer, driven by the
//! orchestrator. Nothing here holds mutable state between calls, so runs
//! can execute concurrently against one shared registry.

pub mod converter;
pub mod orchestrator;
pub mod registry;
pub mod settings;
pub mod summarizer;
pub mod updater;

pub use converter::{convert, Conversion, ConversionOutcome, PseudoObservation};
pub use orchestrator::{AuditOutcome, EvidenceAudit, InferenceEngine, InferenceRun, SubjectEvidence};
pub use registry::{TraitPrior, TraitRegistry};
pub use settings::Settings;
pub use summarizer::{summarize, z_for_confidence_level, CertaintyTier, PosteriorEstimate};
pub use updater::{update, Posterior, PrecisionSum};

pub use bayestrait_core::{Direction, Evidence, EvidenceType, InferenceError, TraitId};
