//! Logging setup for hosts that embed the estimator.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "BAYESTRAIT_LOG";

/// Used when `BAYESTRAIT_LOG` is unset or unparseable. Run summaries log at
/// info; per-trait posteriors only at debug.
pub const DEFAULT_DIRECTIVES: &str = "bayestrait_core=info,bayestrait_engine=info";

static INIT: Once = Once::new();

/// Filter from `BAYESTRAIT_LOG`, e.g.
/// `BAYESTRAIT_LOG=bayestrait_engine::orchestrator=debug,bayestrait_core=warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global fmt subscriber filtered by [`env_filter`].
///
/// Safe to call repeatedly. Does nothing if the host already installed a
/// global subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        // Thread names tell rayon workers apart in parallel runs.
        let installed = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_names(true))
            .with(env_filter())
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(directives = %env_filter(), "bayestrait tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        let filter = EnvFilter::try_new(DEFAULT_DIRECTIVES).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("bayestrait_core=info"));
        assert!(rendered.contains("bayestrait_engine=info"));
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialized twice without panicking");
    }
}
