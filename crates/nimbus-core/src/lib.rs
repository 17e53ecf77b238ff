pub mod config;
pub mod error;
pub mod notify;
pub mod runtime_config;
pub mod storage;

pub use config::{
    Config, DefaultsConfig, GeoDbConfig, LocationConfig, PositionSourceKind, UiConfig, Unit,
    ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, StorageError};
pub use notify::{Notifier, TracingNotifier};
pub use runtime_config::RuntimeConfig;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Nimbus core initialized");
    Ok(())
}
