//! Stable, machine-readable error codes.
//!
//! Display text may change between releases; these strings do not.

/// Implemented by every bayestrait error enum.
pub trait ErrorCode: std::fmt::Display {
    /// The code for this error, e.g. `"UNKNOWN_TRAIT"`.
    fn error_code(&self) -> &'static str;

    /// `[CODE] message`, the form written to logs.
    fn coded_string(&self) -> String {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Loading `bayestrait.toml` and `BAYESTRAIT_*` overrides.
pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
pub const CONFIG_SERIALIZE: &str = "CONFIG_SERIALIZE";
pub const CONFIG_ENV_OVERRIDE: &str = "CONFIG_ENV_OVERRIDE";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

// Registry and inference.
pub const INVALID_PRIOR: &str = "INVALID_PRIOR";
pub const UNKNOWN_TRAIT: &str = "UNKNOWN_TRAIT";
pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
pub const NUMERIC_GUARD: &str = "NUMERIC_GUARD";

/// Every code above.
pub const ALL: [&str; 9] = [
    CONFIG_NOT_FOUND,
    CONFIG_PARSE,
    CONFIG_SERIALIZE,
    CONFIG_ENV_OVERRIDE,
    CONFIG_INVALID,
    INVALID_PRIOR,
    UNKNOWN_TRAIT,
    CONFIGURATION_ERROR,
    NUMERIC_GUARD,
];
