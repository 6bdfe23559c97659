//! Logging setup: compact text on stderr, JSON lines with `TXPUSH_LOG_JSON=1`

use tracing_subscriber::{fmt, EnvFilter};

use crate::core::paths::env::LOG_JSON;

/// Install the stderr subscriber. Each event is written as soon as it is emitted.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var(LOG_JSON)
        .map(|value| value == "1")
        .unwrap_or(false);

    if use_json {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
