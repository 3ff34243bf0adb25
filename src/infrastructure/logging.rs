//! Logger initialization using tracing.

use tracing_subscriber::EnvFilter;

use super::config::{LogConfig, LogFormat};

/// Initialize the global subscriber: the configured level as the default
/// directive, overridable through `RUST_LOG`.
pub fn init(config: &LogConfig) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(
            config
                .level
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        )
        .from_env_lossy();

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter)
                .with_target(true)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
    }
}
