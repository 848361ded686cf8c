//! Structured span field definitions.
//!
//! Field names shared by every span and event the engine emits, so log
//! queries don't depend on call-site spelling.

/// Subject whose traits are being estimated.
pub const SUBJECT_ID: &str = "subject_id";

/// Unique id of one inference run.
pub const RUN_ID: &str = "run_id";

/// Trait being updated.
pub const TRAIT_ID: &str = "trait_id";

/// Evidence items supplied to a run.
pub const EVIDENCE_TOTAL: &str = "evidence_total";

/// Evidence items dropped (unknown trait, ignored neutral, etc.).
pub const EVIDENCE_DROPPED: &str = "evidence_dropped";

/// Evidence items fused into a posterior.
pub const EVIDENCE_USED: &str = "evidence_used";

/// Posterior precision after fusion.
pub const POSTERIOR_PRECISION: &str = "posterior_precision";

/// Wall-clock time of one run in microseconds.
pub const RUN_DURATION_US: &str = "run_duration_us";

/// Subjects in a batch.
pub const BATCH_SIZE: &str = "batch_size";
