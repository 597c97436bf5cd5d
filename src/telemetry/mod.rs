//! Telemetry initialization: tracing and structured logging

use crate::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops (useful in tests where
/// several cases may race to initialise logging).
pub fn init(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "condoflow_core=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.log_format == "json" {
        // Flatten event fields so `message` is consistently top-level.
        let fmt_layer = tracing_subscriber::fmt::layer().json().flatten_event(true);
        let _ = registry.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let _ = registry.with(fmt_layer).try_init();
    }

    tracing::debug!(service = %config.service_name, "telemetry initialised");
}
