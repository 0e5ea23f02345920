use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::info!(level = %settings.level, "logging initialized");
}
