//! Location Resolver: current position plus a city name for it.
//!
//! The position comes from a pluggable `PositionSource`. The city name comes
//! from the gateway's coordinate lookup, falling back to a static
//! coordinate-range table when that lookup fails.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use nimbus_core::{LocationConfig, PositionSourceKind};

use crate::error::LocationError;
use crate::gateway::WeatherApi;
use crate::types::{LocationQuery, Unit};

pub const POSITION_TIMEOUT_SECS: u64 = 10;
pub const OUTER_TIMEOUT_SECS: u64 = 15;

/// City used when no bounding box matches
pub const DEFAULT_FALLBACK_CITY: &str = "Istanbul";

/// Geographic position reported by a position source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

/// Position plus the city it resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub position: Position,
    pub city_name: Option<String>,
}

/// Permission state reported by a position source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Prompt,
    Denied,
    /// The source cannot tell; treated as granted and enforced by the lookup itself
    Unknown,
}

/// Platform capability that knows where the machine is.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Whether this source can work at all on this system
    fn is_supported(&self) -> bool;

    /// Best-effort permission check
    async fn permission(&self) -> Permission {
        Permission::Unknown
    }

    /// Look up the current position, giving up after `timeout`
    async fn current_position(&self, timeout: Duration) -> Result<Position, LocationError>;
}

/// Approximate position from an IP geolocation service (ip-api.com format)
pub struct IpPositionSource {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpPositionSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl PositionSource for IpPositionSource {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self, timeout: Duration) -> Result<Position, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocationError::Timeout
                } else {
                    tracing::debug!("IP lookup request failed: {}", e);
                    LocationError::PositionUnavailable
                }
            })?;

        match response.status().as_u16() {
            200..=299 => {}
            401 | 403 => return Err(LocationError::PermissionDenied),
            status => {
                tracing::debug!("IP lookup returned status {}", status);
                return Err(LocationError::PositionUnavailable);
            }
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unknown(e.to_string()))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            tracing::debug!("IP lookup failed: {:?}", body.message);
            return Err(LocationError::PositionUnavailable);
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Position {
                latitude,
                longitude,
                accuracy_meters: None,
            }),
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

/// Position pinned in configuration
pub struct FixedPositionSource {
    position: Position,
}

impl FixedPositionSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            position: Position {
                latitude,
                longitude,
                accuracy_meters: None,
            },
        }
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    fn is_supported(&self) -> bool {
        true
    }

    async fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(&self, _timeout: Duration) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

/// No location capability
pub struct UnavailablePositionSource;

#[async_trait]
impl PositionSource for UnavailablePositionSource {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self, _timeout: Duration) -> Result<Position, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Build the position source selected in configuration.
pub fn position_source_from_config(config: &LocationConfig) -> Arc<dyn PositionSource> {
    match (config.source, config.latitude, config.longitude) {
        (PositionSourceKind::Ip, _, _) => Arc::new(IpPositionSource::new(&config.ip_lookup_url)),
        (PositionSourceKind::Fixed, Some(lat), Some(lon)) => {
            Arc::new(FixedPositionSource::new(lat, lon))
        }
        (PositionSourceKind::Fixed, _, _) => {
            tracing::warn!("Fixed location source without coordinates; location disabled");
            Arc::new(UnavailablePositionSource)
        }
        (PositionSourceKind::None, _, _) => Arc::new(UnavailablePositionSource),
    }
}

/// Pick a well-known city for coordinates when reverse lookup fails.
pub fn fallback_city(latitude: f64, longitude: f64) -> &'static str {
    // Turkey
    if (36.0..=42.0).contains(&latitude) && (26.0..=45.0).contains(&longitude) {
        return "Istanbul";
    }
    // Europe
    if (35.0..=71.0).contains(&latitude) && (-10.0..=40.0).contains(&longitude) {
        return "London";
    }
    // North America
    if (25.0..=72.0).contains(&latitude) && (-168.0..=-52.0).contains(&longitude) {
        return "New York";
    }
    // Asia
    if (10.0..=55.0).contains(&latitude) && (60.0..=180.0).contains(&longitude) {
        return "Tokyo";
    }
    DEFAULT_FALLBACK_CITY
}

/// Resolves "where am I" into coordinates and a city name.
pub struct LocationResolver {
    source: Arc<dyn PositionSource>,
    gateway: Arc<dyn WeatherApi>,
    position_timeout: Duration,
    outer_timeout: Duration,
}

impl LocationResolver {
    pub fn new(source: Arc<dyn PositionSource>, gateway: Arc<dyn WeatherApi>) -> Self {
        Self {
            source,
            gateway,
            position_timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
            outer_timeout: Duration::from_secs(OUTER_TIMEOUT_SECS),
        }
    }

    pub fn with_timeouts(mut self, position_timeout: Duration, outer_timeout: Duration) -> Self {
        self.position_timeout = position_timeout;
        self.outer_timeout = outer_timeout;
        self
    }

    /// Whether location detection can be attempted at all
    pub fn is_available(&self) -> bool {
        self.source.is_supported()
    }

    /// Current coordinates and the city they resolve to.
    pub async fn get_current_location(&self) -> Result<LocationResult, LocationError> {
        let position = self.get_current_position().await?;
        let city_name = self.reverse_resolve(&position).await;
        Ok(LocationResult {
            position,
            city_name: Some(city_name),
        })
    }

    /// Current coordinates only, without a city lookup.
    pub async fn get_current_position(&self) -> Result<Position, LocationError> {
        if !self.source.is_supported() {
            return Err(LocationError::Unsupported);
        }

        if self.source.permission().await == Permission::Denied {
            return Err(LocationError::PermissionDenied);
        }

        let lookup = self.source.current_position(self.position_timeout);
        match tokio::time::timeout(self.outer_timeout, lookup).await {
            Ok(Ok(position)) => {
                tracing::info!(
                    "Got location: {}, {}",
                    position.latitude,
                    position.longitude
                );
                Ok(position)
            }
            Ok(Err(e)) => {
                tracing::warn!("Position lookup failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!("Position lookup exceeded {:?}", self.outer_timeout);
                Err(LocationError::Timeout)
            }
        }
    }

    /// City name for a position via the gateway, or the static fallback table.
    async fn reverse_resolve(&self, position: &Position) -> String {
        let query = LocationQuery::coords(position.latitude, position.longitude);
        match self.gateway.fetch_current(&query, Unit::Metric).await {
            Ok(snapshot) if !snapshot.city_name.trim().is_empty() => {
                tracing::info!("Reverse resolved to: {}", snapshot.city_name);
                snapshot.city_name
            }
            Ok(_) => {
                let city = fallback_city(position.latitude, position.longitude);
                tracing::warn!("Reverse lookup returned no name; using {}", city);
                city.to_string()
            }
            Err(e) => {
                let city = fallback_city(position.latitude, position.longitude);
                tracing::warn!("Reverse lookup failed ({}); using {}", e, city);
                city.to_string()
            }
        }
    }
}
