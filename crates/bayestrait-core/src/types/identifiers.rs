//! Trait identifier newtype.
//!
//! Keeps trait ids from being confused with subject ids or free-form notes
//! while still comparing and hashing as the underlying string.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a configured trait (e.g. `"openness"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitId(String);

impl TraitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TraitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<TraitId> for String {
    fn from(id: TraitId) -> Self {
        id.0
    }
}

impl Borrow<str> for TraitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TraitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
