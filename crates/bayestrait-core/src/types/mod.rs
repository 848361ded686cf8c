//! Shared domain types: trait identifiers and the evidence schema.

pub mod evidence;
pub mod identifiers;

pub use evidence::{Direction, Evidence, EvidenceType, SanitizedSignal};
pub use identifiers::TraitId;
