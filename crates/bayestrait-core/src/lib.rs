//! Core types, errors, configuration, and tracing for bayestrait.
//!
//! Everything here is shared by the estimation engine and by callers that
//! feed it: the evidence schema, the trait configuration table, and the
//! error taxonomy.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{BayestraitConfig, EstimatorConfig, NeutralPolicy, TraitConfig};
pub use errors::{ConfigError, ErrorCode, InferenceError};
pub use types::{Direction, Evidence, EvidenceType, TraitId};
