//! Error handling for bayestrait.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod inference_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use inference_error::InferenceError;
