//! Weather and location error types.
//!
//! `Display` is the user-facing text; the store surfaces it verbatim.

use thiserror::Error;

/// Weather gateway errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// Rejected before any network call
    #[error("{0}")]
    InvalidInput(String),

    /// Non-success HTTP status, already translated
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request timed out. Please try again")]
    Timeout,

    #[error("Please check your internet connection")]
    Network(String),

    #[error("Unexpected response from the weather service")]
    Parse(String),
}

impl WeatherError {
    /// Build an API error from a status code and optional server message.
    pub fn from_status(status: u16, server_message: Option<&str>, fallback: &str) -> Self {
        Self::Api {
            status,
            message: status_message(status, server_message, fallback),
        }
    }

    /// True for failures that went through the gateway's notification path.
    ///
    /// The store uses this to avoid notifying the user twice.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WeatherError::Timeout
        } else if e.is_decode() {
            WeatherError::Parse(e.to_string())
        } else {
            WeatherError::Network(e.to_string())
        }
    }
}

/// Map an HTTP status to the fixed user-facing message table.
pub fn status_message(status: u16, server_message: Option<&str>, fallback: &str) -> String {
    let fixed = match status {
        0 => "Please check your internet connection",
        400 => "Invalid request",
        401 => "Invalid API key",
        403 => "Access denied",
        404 => "City not found",
        408 => "Request timed out",
        429 => "API limit exceeded. Please try again later",
        500 => "Server error. Please try again later",
        502 => "Server temporarily unavailable",
        503 => "Service temporarily unavailable",
        504 => "Server timeout",
        _ => {
            return match server_message.filter(|m| !m.trim().is_empty()) {
                Some(msg) => translate_server_message(msg),
                None if !fallback.is_empty() => fallback.to_string(),
                None => format!("Error code: {}", status),
            };
        }
    };
    fixed.to_string()
}

/// Normalize common OpenWeatherMap error bodies
fn translate_server_message(message: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("city not found") {
        return "City not found".to_string();
    }
    if lower.contains("invalid api key") {
        return "Invalid API key".to_string();
    }
    if lower.contains("exceeded call frequency") {
        return "Too many requests sent".to_string();
    }
    if lower.contains("nothing to geocode") {
        return "Invalid city name".to_string();
    }

    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported on this system")]
    Unsupported,
    #[error("Location access permission denied. Please enable location services and try again.")]
    PermissionDenied,
    #[error("Location information is unavailable. Please check your internet connection.")]
    PositionUnavailable,
    #[error("Location request timed out. Please try again.")]
    Timeout,
    #[error("An unknown error occurred while getting your location.")]
    Unknown(String),
}
