//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `default_level`.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("connectivity_monitor={default_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
