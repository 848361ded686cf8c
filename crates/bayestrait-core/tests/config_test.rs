//! Tests for the bayestrait configuration system.

use std::sync::Mutex;

use bayestrait_core::config::bayestrait_config::CONFIG_FILE_NAME;
use bayestrait_core::config::{BayestraitConfig, NeutralPolicy};
use bayestrait_core::errors::{ConfigError, ErrorCode};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all BAYESTRAIT_ env vars to prevent cross-test contamination.
fn clear_env_vars() {
    for key in [
        "BAYESTRAIT_SCALE",
        "BAYESTRAIT_BASE_VARIANCE",
        "BAYESTRAIT_MIN_VARIANCE",
        "BAYESTRAIT_MIN_POSTERIOR_VARIANCE",
        "BAYESTRAIT_Z",
        "BAYESTRAIT_CONFIDENCE_LEVEL",
        "BAYESTRAIT_NEUTRAL_POLICY",
    ] {
        std::env::remove_var(key);
    }
}

const SAMPLE: &str = r#"
[estimator]
scale = 3.0
min_variance = 0.02
neutral_policy = "ignore"

[[traits]]
id = "openness"
prior_mean = 0.0
prior_variance = 1.0
default_weight = 0.5

[traits.evidence_weights]
self_report = 0.9
keyword_match = 0.3

[[traits]]
id = "risk_propensity"
prior_mean = 0.5
prior_variance = 2.0
"#;

#[test]
fn test_defaults_when_no_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    let config = BayestraitConfig::load(dir.path()).unwrap();
    assert!(config.traits.is_empty());
    assert_eq!(config.estimator.effective_scale(), 2.0);
    assert_eq!(config.estimator.effective_base_variance(), 0.5);
}

#[test]
fn test_file_layer_then_env_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), SAMPLE).unwrap();

    std::env::set_var("BAYESTRAIT_SCALE", "1.25");
    std::env::set_var("BAYESTRAIT_NEUTRAL_POLICY", "sharpen");

    let config = BayestraitConfig::load(dir.path()).unwrap();
    clear_env_vars();

    // Env wins over file.
    assert_eq!(config.estimator.effective_scale(), 1.25);
    assert_eq!(
        config.estimator.effective_neutral_policy(),
        NeutralPolicy::Sharpen
    );
    // File wins over defaults.
    assert_eq!(config.estimator.effective_min_variance(), 0.02);
    // Unset everywhere falls back to defaults.
    assert_eq!(config.estimator.effective_base_variance(), 0.5);

    assert_eq!(config.traits.len(), 2);
    let openness = &config.traits[0];
    assert_eq!(openness.id, "openness");
    assert_eq!(openness.effective_default_weight(), 0.5);
    assert_eq!(openness.evidence_weights.get("self_report"), Some(&0.9));
    assert_eq!(config.traits[1].effective_default_weight(), 1.0);
}

#[test]
fn test_unparseable_env_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::env::set_var("BAYESTRAIT_MIN_VARIANCE", "tiny");
    let result = BayestraitConfig::load(dir.path());
    clear_env_vars();

    match result {
        Err(ConfigError::EnvOverride { var, value, .. }) => {
            assert_eq!(var, "BAYESTRAIT_MIN_VARIANCE");
            assert_eq!(value, "tiny");
        }
        other => panic!("expected EnvOverride, got {other:?}"),
    }
}

#[test]
fn test_env_value_still_validated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    std::env::set_var("BAYESTRAIT_Z", "-1.0");
    let result = BayestraitConfig::load(dir.path());
    clear_env_vars();

    let err = result.unwrap_err();
    assert_eq!(err.invalid_fields(), vec!["estimator.z"]);
    assert_eq!(err.error_code(), "CONFIG_INVALID");
}

#[test]
fn test_load_file_missing() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    let result = BayestraitConfig::load_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_invalid_toml_reports_path() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempdir();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[estimator\nscale = ").unwrap();
    match BayestraitConfig::load(dir.path()) {
        Err(ConfigError::ParseError { path: p, .. }) => {
            assert!(p.ends_with(CONFIG_FILE_NAME));
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_toml_round_trip() {
    let config = BayestraitConfig::from_toml(SAMPLE).unwrap();
    let serialized = config.to_toml().unwrap();
    let reparsed = BayestraitConfig::from_toml(&serialized).unwrap();
    assert_eq!(config, reparsed);
}

#[test]
fn test_from_toml_rejects_bad_level() {
    let result = BayestraitConfig::from_toml("[estimator]\nconfidence_level = 1.5\n");
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}
