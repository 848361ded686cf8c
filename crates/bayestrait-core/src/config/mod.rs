//! Configuration system for bayestrait.
//! TOML-based, layered resolution: env > config file > compiled defaults.

pub mod bayestrait_config;
pub mod estimator_config;
pub mod trait_config;
pub mod validation;

pub use bayestrait_config::BayestraitConfig;
pub use estimator_config::{EstimatorConfig, NeutralPolicy};
pub use trait_config::TraitConfig;
pub use validation::{validate, validate_or_error, ConfigValidationError};
