use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::settings::Settings;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.server.log_level));

    let console_layer = fmt::layer()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
