//! Observability - tracing subscriber の初期化

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Build the filter: `RUST_LOG` when set, otherwise the configured directive.
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns false if one was already installed (tests, embedding binaries);
/// the existing subscriber stays in place.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = env_filter(config);
    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(filter = %config.filter, json = config.json, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }

    #[test]
    fn bad_directive_falls_back() {
        let config = LogConfig {
            filter: "spindle_core=[".to_string(),
            json: false,
        };
        // must not panic
        let _ = env_filter(&config);
    }
}
