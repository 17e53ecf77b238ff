//! Centralized error types for Nimbus.
//!
//! Every error carries a user-facing message via `user_message()`; the
//! `Display` text keeps the technical detail for logs.

use thiserror::Error;

/// Top-level application error type.
///
/// Used at the binary edge to turn any failure into one printable line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Weather and location failures already carry their user message.
    #[error("{0}")]
    Service(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Storage(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Service(msg) => msg.clone(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Runtime config endpoint failed: {0}")]
    EndpointFailed(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => {
                "A required setting is missing. Check your settings."
            }
            ConfigError::EndpointFailed(_) => "Remote configuration unavailable. Using defaults.",
        }
    }
}

/// Key-value storage errors.
///
/// Backends return these; the persistence layer above swallows them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read key {key}: {message}")]
    Read { key: String, message: String },

    #[error("Failed to write key {key}: {message}")]
    Write { key: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "Local storage is unavailable.",
            StorageError::Read { .. } => "Saved data could not be read.",
            StorageError::Write { .. } => "Changes could not be saved.",
            StorageError::Serialization(_) => "Saved data is malformed.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let err = ConfigError::MissingSetting("weather.api_key".into());
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::MissingSetting(_))));
    }

    #[test]
    fn test_service_message_passes_through() {
        let app_err = AppError::Service("City not found".into());
        assert_eq!(app_err.user_message(), "City not found");
    }

    #[test]
    fn test_storage_user_messages() {
        let err = StorageError::Write {
            key: "weather-favorites".into(),
            message: "disk full".into(),
        };
        assert!(err.to_string().contains("weather-favorites"));
        assert_eq!(err.user_message(), "Changes could not be saved.");
    }
}
