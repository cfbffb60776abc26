use tracing_subscriber::EnvFilter;

use crate::config::BackOfficeConfig;

/// Installs the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn setup_tracing(config: &BackOfficeConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
