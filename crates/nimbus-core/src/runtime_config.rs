//! Runtime configuration: API keys and endpoints resolved once at startup.
//!
//! Sources in priority order: the optional config endpoint, environment
//! variables, then the config file.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{Config, GeoDbConfig};
use crate::error::ConfigError;

const ENDPOINT_TIMEOUT_SECS: u64 = 5;

/// Payload served by the config endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default)]
    pub open_weather_map_api_key: Option<String>,
    #[serde(default)]
    pub geodb: Option<RemoteGeoDb>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteGeoDb {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

/// Effective keys and endpoints for this process
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub openweather_api_key: String,
    pub weather_base_url: String,
    pub geodb: GeoDbConfig,
}

impl RuntimeConfig {
    /// Resolve runtime configuration, fetching the config endpoint if one is set.
    ///
    /// Never fails: an unreachable endpoint falls back to env and file values.
    pub async fn resolve(config: &Config) -> Self {
        let remote = match &config.weather.config_endpoint {
            Some(endpoint) => match fetch_remote(endpoint).await {
                Ok(remote) => {
                    tracing::info!("Loaded runtime config from {}", endpoint);
                    Some(remote)
                }
                Err(e) => {
                    tracing::warn!("{}; falling back to local values", e);
                    None
                }
            },
            None => None,
        };

        Self::from_sources(config, remote.as_ref(), |name| std::env::var(name).ok())
    }

    /// Merge the sources without any I/O.
    pub fn from_sources<F>(config: &Config, remote: Option<&RemoteConfig>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let remote_geodb = remote.and_then(|r| r.geodb.as_ref());

        let openweather_api_key = first_non_empty([
            remote.and_then(|r| r.open_weather_map_api_key.clone()),
            env("OPENWEATHER_API_KEY"),
            config.weather.api_key.clone(),
        ])
        .unwrap_or_default();

        let geodb = GeoDbConfig {
            api_key: first_non_empty([
                remote_geodb.and_then(|g| g.api_key.clone()),
                env("GEODB_API_KEY"),
                Some(config.geodb.api_key.clone()),
            ])
            .unwrap_or_default(),
            base_url: first_non_empty([
                remote_geodb.and_then(|g| g.base_url.clone()),
                env("GEODB_BASE_URL"),
                Some(config.geodb.base_url.clone()),
            ])
            .unwrap_or_default(),
            host: first_non_empty([
                remote_geodb.and_then(|g| g.host.clone()),
                env("GEODB_HOST"),
                Some(config.geodb.host.clone()),
            ])
            .unwrap_or_default(),
        };

        Self {
            openweather_api_key,
            weather_base_url: config.weather.base_url.clone(),
            geodb,
        }
    }

    /// The weather API key, or an error naming the missing setting.
    pub fn require_weather_key(&self) -> Result<&str, ConfigError> {
        if self.openweather_api_key.is_empty() {
            return Err(ConfigError::MissingSetting(
                "weather.api_key (or OPENWEATHER_API_KEY)".to_string(),
            ));
        }
        Ok(&self.openweather_api_key)
    }
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

async fn fetch_remote(endpoint: &str) -> Result<RemoteConfig, ConfigError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(ENDPOINT_TIMEOUT_SECS))
        .build()
        .map_err(|e| ConfigError::EndpointFailed(e.to_string()))?;

    let response = client
        .get(endpoint)
        .send()
        .await
        .map_err(|e| ConfigError::EndpointFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ConfigError::EndpointFailed(format!(
            "status {}",
            response.status()
        )));
    }

    response
        .json::<RemoteConfig>()
        .await
        .map_err(|e| ConfigError::EndpointFailed(e.to_string()))
}
