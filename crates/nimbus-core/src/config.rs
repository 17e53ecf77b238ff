use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Measurement system requested from the weather API.
///
/// Data is never converted locally; switching units means fetching again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature suffix letter
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "C",
            Self::Imperial => "F",
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Self::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Self::Imperial),
            other => Err(format!("Unknown unit: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Where persisted favorites/settings live (defaults to `<config_dir>/storage`)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// City search API settings
    #[serde(default)]
    pub geodb: GeoDbConfig,

    /// Location detection settings
    #[serde(default)]
    pub location: LocationConfig,

    /// First-run defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// API key (can also come from OPENWEATHER_API_KEY or the config endpoint)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Retries after the first attempt
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay between retries
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Optional endpoint serving runtime API keys as JSON
    #[serde(default)]
    pub config_endpoint: Option<String>,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1000
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay(),
            config_endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoDbConfig {
    #[serde(default = "default_geodb_api_key")]
    pub api_key: String,
    #[serde(default = "default_geodb_base_url")]
    pub base_url: String,
    #[serde(default = "default_geodb_host")]
    pub host: String,
}

fn default_geodb_api_key() -> String {
    "YOUR_GEODB_API_KEY_HERE".to_string()
}

fn default_geodb_base_url() -> String {
    "https://wft-geo-db.p.rapidapi.com/v1/geo".to_string()
}

fn default_geodb_host() -> String {
    "wft-geo-db.p.rapidapi.com".to_string()
}

impl GeoDbConfig {
    /// Check if a real key is configured (not empty or the placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for GeoDbConfig {
    fn default() -> Self {
        Self {
            api_key: default_geodb_api_key(),
            base_url: default_geodb_base_url(),
            host: default_geodb_host(),
        }
    }
}

/// Which position source backs location detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionSourceKind {
    /// Approximate position from the public IP address
    #[default]
    Ip,
    /// Coordinates pinned in the config file
    Fixed,
    /// Location detection disabled
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub source: PositionSourceKind,

    /// Coordinates used by the `fixed` source
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,

    /// IP geolocation endpoint used by the `ip` source
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Timeout handed to the position source itself
    #[serde(default = "default_position_timeout")]
    pub position_timeout_secs: u64,

    /// Outer timeout wrapped around the whole position lookup
    #[serde(default = "default_outer_timeout")]
    pub outer_timeout_secs: u64,
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_position_timeout() -> u64 {
    10
}

fn default_outer_timeout() -> u64 {
    15
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: PositionSourceKind::default(),
            latitude: None,
            longitude: None,
            ip_lookup_url: default_ip_lookup_url(),
            position_timeout_secs: default_position_timeout(),
            outer_timeout_secs: default_outer_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// City shown when nothing else is known
    #[serde(default = "default_city")]
    pub city: String,

    #[serde(default)]
    pub unit: Unit,
}

pub fn default_city() -> String {
    "Istanbul".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            unit: Unit::Metric,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Dark mode preferred when no theme has been saved yet
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nimbus");

        Self {
            config_dir,
            storage_dir: None,
            weather: WeatherConfig::default(),
            geodb: GeoDbConfig::default(),
            location: LocationConfig::default(),
            defaults: DefaultsConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating it with defaults if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(&self.geodb.base_url, "geodb.base_url", &mut result);

        if let Some(endpoint) = &self.weather.config_endpoint {
            self.validate_url(endpoint, "weather.config_endpoint", &mut result);
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.retry_count > 10 {
            result.add_warning(
                "weather.retry_count",
                "Retry count is unusually large (>10)",
            );
        }

        if self.weather.api_key.as_deref().map_or(true, str::is_empty)
            && self.weather.config_endpoint.is_none()
        {
            result.add_warning(
                "weather.api_key",
                "No OpenWeatherMap API key configured - requests will be rejected",
            );
        }

        if !self.geodb.is_configured() {
            result.add_warning(
                "geodb",
                "GeoDB API key not configured - city search uses the bundled list",
            );
        }

        match self.location.source {
            PositionSourceKind::Fixed => {
                match (self.location.latitude, self.location.longitude) {
                    (Some(lat), Some(lon)) => {
                        if !(-90.0..=90.0).contains(&lat) {
                            result.add_error("location.latitude", "Latitude must be in [-90, 90]");
                        }
                        if !(-180.0..=180.0).contains(&lon) {
                            result.add_error(
                                "location.longitude",
                                "Longitude must be in [-180, 180]",
                            );
                        }
                    }
                    _ => result.add_error(
                        "location",
                        "Fixed location source requires latitude and longitude",
                    ),
                }
            }
            PositionSourceKind::Ip => {
                self.validate_url(&self.location.ip_lookup_url, "location.ip_lookup_url", &mut result);
            }
            PositionSourceKind::None => {}
        }

        if self.location.position_timeout_secs > self.location.outer_timeout_secs {
            result.add_warning(
                "location.position_timeout_secs",
                "Position timeout exceeds the outer timeout and will never fire",
            );
        }

        if self.defaults.city.trim().is_empty() {
            result.add_error("defaults.city", "Default city cannot be empty");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Directory used by file-backed storage
    pub fn effective_storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join("storage"))
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}
