//! Weather Data Gateway: current conditions and forecast from OpenWeatherMap.
//!
//! Inputs are validated before any request. Each request has a fixed timeout
//! and a fixed-delay retry budget; every failure comes back as a
//! `WeatherError` whose text is the user-facing message.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use nimbus_core::{Notifier, RuntimeConfig, WeatherConfig};

use crate::error::WeatherError;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{wire, ForecastSeries, LocationQuery, Unit, WeatherSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Source of current weather and forecast data.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch_current(
        &self,
        query: &LocationQuery,
        unit: Unit,
    ) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        unit: Unit,
    ) -> Result<ForecastSeries, WeatherError>;
}

/// OpenWeatherMap REST client
#[derive(Clone)]
pub struct OpenWeatherGateway {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for OpenWeatherGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherGateway")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherGateway {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retry: RetryConfig::default(),
            notifier: None,
        })
    }

    /// Build from resolved runtime keys plus the configured request policy.
    pub fn from_config(runtime: &RuntimeConfig, weather: &WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(
            &runtime.weather_base_url,
            &runtime.openweather_api_key,
            Duration::from_secs(weather.request_timeout_secs),
        )?
        .with_retry(RetryConfig::new(weather.retry_count, weather.retry_delay_ms)))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Surface API failures (HTTP status errors) to the user through `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        unit: Unit,
        fallback_message: &str,
    ) -> Result<T, WeatherError> {
        query.validate()?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", unit.as_query().to_string()));

        let result = with_retry(self.retry, || self.request_once::<T>(&url, &params, fallback_message)).await;

        if let Err(e) = &result {
            tracing::error!(endpoint, location = %query.label(), error = %e, "Weather API error");
            if e.is_api_error() {
                if let Some(notifier) = &self.notifier {
                    notifier.error("API Error", &e.user_message());
                }
            }
        }

        result
    }

    async fn request_once<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        fallback_message: &str,
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        tracing::debug!(status = %status, "Received API response");

        if !status.is_success() {
            let body = response.json::<wire::ErrorBody>().await.ok();
            let server_message = body.and_then(|b| b.message);
            return Err(WeatherError::from_status(
                status.as_u16(),
                server_message.as_deref(),
                fallback_message,
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherGateway {
    #[instrument(skip(self), level = "info")]
    async fn fetch_current(
        &self,
        query: &LocationQuery,
        unit: Unit,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let fallback = match query {
            LocationQuery::City(city) => format!("Unable to fetch weather data for {}", city.trim()),
            LocationQuery::Coords(_) => "Unable to fetch weather data for location".to_string(),
        };
        let raw: wire::CurrentResponse = self.get_json("weather", query, unit, &fallback).await?;
        let snapshot = WeatherSnapshot::from_wire(raw, unit, Utc::now());
        tracing::info!(city = %snapshot.city_name, temp = snapshot.temperature.current, "Current weather fetched");
        Ok(snapshot)
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        unit: Unit,
    ) -> Result<ForecastSeries, WeatherError> {
        let fallback = match query {
            LocationQuery::City(city) => format!("Unable to fetch weather forecast for {}", city.trim()),
            LocationQuery::Coords(_) => "Unable to fetch weather forecast for location".to_string(),
        };
        let raw: wire::ForecastResponse = self.get_json("forecast", query, unit, &fallback).await?;
        let series = ForecastSeries::from_wire(raw, unit, Utc::now());
        tracing::info!(city = %series.city.name, entries = series.entries.len(), "Forecast fetched");
        Ok(series)
    }
}
