//! Logging setup utilities for the Oekaki binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the library crates (`oekaki_server`, `oekaki_client`, `oekaki_shared`)
/// and the binary itself log at `default_log_level` unless `RUST_LOG` says otherwise.
///
/// # Examples
///
/// ```no_run
/// use oekaki_shared::logger::setup_logger;
///
/// setup_logger("oekaki-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, level: &str) -> String {
    [
        "oekaki_shared",
        "oekaki_server",
        "oekaki_client",
        "tower_http",
        &binary_name.replace('-', "_"),
    ]
    .iter()
    .map(|target| format!("{}={}", target, level))
    .collect::<Vec<_>>()
    .join(",")
}
