use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub use nimbus_core::Unit;

use crate::error::WeatherError;

/// Geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and within [-90,90] x [-180,180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// What a weather request is about
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coords(Coordinates),
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }

    pub fn coords(lat: f64, lon: f64) -> Self {
        Self::Coords(Coordinates::new(lat, lon))
    }

    /// Reject inputs before any network call is made.
    pub fn validate(&self) -> Result<(), WeatherError> {
        match self {
            Self::City(name) if name.trim().is_empty() => Err(WeatherError::InvalidInput(
                "City name cannot be empty".to_string(),
            )),
            Self::Coords(coords) if !coords.is_valid() => Err(WeatherError::InvalidInput(
                "Invalid coordinate information".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Query parameters identifying the location
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.trim().to_string())],
            Self::Coords(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }

    /// Short label for logs and fallback error messages
    pub fn label(&self) -> String {
        match self {
            Self::City(name) => name.trim().to_string(),
            Self::Coords(_) => "location".to_string(),
        }
    }
}

/// Primary weather condition as reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Conditions {
    pub code: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Temperatures {
    pub current: f64,
    pub feels_like: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Wind {
    pub speed: f64,
    pub direction: f64,
    pub gust: Option<f64>,
}

/// Current conditions for one location, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_id: i64,
    pub city_name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub conditions: Conditions,
    pub temperature: Temperatures,
    pub humidity: u8,
    pub pressure: u32,
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub cloud_cover: u8,
    pub precipitation: Option<f64>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub timezone_offset_secs: i32,
    pub observed_at: DateTime<Utc>,
    pub unit: Unit,
    pub fetched_at: DateTime<Utc>,
}

/// One 3-hourly forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub time_text: String,
    pub conditions: Conditions,
    pub temperature: Temperatures,
    pub humidity: u8,
    pub pressure: u32,
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub cloud_cover: u8,
    pub precipitation: Option<f64>,
    pub precipitation_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub timezone_offset_secs: i32,
}

/// Ordered forecast entries, replaced together with the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: ForecastCity,
    pub entries: Vec<ForecastEntry>,
    pub unit: Unit,
    pub fetched_at: DateTime<Utc>,
}

/// Raw OpenWeatherMap payloads
pub(crate) mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Coord {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub id: i32,
        #[serde(default)]
        pub main: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub icon: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: f64,
        pub feels_like: f64,
        pub temp_min: f64,
        pub temp_max: f64,
        pub pressure: u32,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Wind {
        #[serde(default)]
        pub speed: f64,
        #[serde(default)]
        pub deg: f64,
        #[serde(default)]
        pub gust: Option<f64>,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Clouds {
        #[serde(default)]
        pub all: u8,
    }

    #[derive(Debug, Deserialize, Default)]
    pub struct Volume {
        #[serde(rename = "1h")]
        pub one_hour: Option<f64>,
        #[serde(rename = "3h")]
        pub three_hours: Option<f64>,
    }

    impl Volume {
        pub fn amount(&self) -> Option<f64> {
            self.one_hour.or(self.three_hours)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Sys {
        #[serde(default)]
        pub country: String,
        #[serde(default)]
        pub sunrise: i64,
        #[serde(default)]
        pub sunset: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub coord: Coord,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub main: Main,
        #[serde(default)]
        pub visibility: Option<u32>,
        #[serde(default)]
        pub wind: Wind,
        #[serde(default)]
        pub clouds: Clouds,
        #[serde(default)]
        pub rain: Option<Volume>,
        #[serde(default)]
        pub snow: Option<Volume>,
        pub dt: i64,
        pub sys: Sys,
        #[serde(default)]
        pub timezone: i32,
        #[serde(default)]
        pub id: i64,
        #[serde(default)]
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: Main,
        #[serde(default)]
        pub weather: Vec<Condition>,
        #[serde(default)]
        pub clouds: Clouds,
        #[serde(default)]
        pub wind: Wind,
        #[serde(default)]
        pub rain: Option<Volume>,
        #[serde(default)]
        pub snow: Option<Volume>,
        #[serde(default)]
        pub visibility: Option<u32>,
        #[serde(default)]
        pub pop: f64,
        #[serde(default)]
        pub dt_txt: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct City {
        #[serde(default)]
        pub id: i64,
        #[serde(default)]
        pub name: String,
        pub coord: Coord,
        #[serde(default)]
        pub country: String,
        #[serde(default)]
        pub timezone: i32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastItem>,
        pub city: City,
    }

    /// Error body returned with non-success statuses
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: Option<String>,
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

fn conditions_from(list: &[wire::Condition]) -> Conditions {
    list.first()
        .map(|c| Conditions {
            code: c.id,
            main: c.main.clone(),
            description: c.description.clone(),
            icon: c.icon.clone(),
        })
        .unwrap_or_default()
}

fn temperatures_from(main: &wire::Main) -> Temperatures {
    Temperatures {
        current: main.temp,
        feels_like: main.feels_like,
        min: main.temp_min,
        max: main.temp_max,
    }
}

fn wind_from(wind: &wire::Wind) -> Wind {
    Wind {
        speed: wind.speed,
        direction: wind.deg,
        gust: wind.gust,
    }
}

fn precipitation_from(rain: &Option<wire::Volume>, snow: &Option<wire::Volume>) -> Option<f64> {
    rain.as_ref()
        .and_then(wire::Volume::amount)
        .or_else(|| snow.as_ref().and_then(wire::Volume::amount))
}

impl WeatherSnapshot {
    pub(crate) fn from_wire(raw: wire::CurrentResponse, unit: Unit, fetched_at: DateTime<Utc>) -> Self {
        Self {
            city_id: raw.id,
            city_name: raw.name,
            country: raw.sys.country,
            coordinates: Coordinates::new(raw.coord.lat, raw.coord.lon),
            conditions: conditions_from(&raw.weather),
            temperature: temperatures_from(&raw.main),
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            visibility: raw.visibility,
            wind: wind_from(&raw.wind),
            cloud_cover: raw.clouds.all,
            precipitation: precipitation_from(&raw.rain, &raw.snow),
            sunrise: timestamp(raw.sys.sunrise),
            sunset: timestamp(raw.sys.sunset),
            timezone_offset_secs: raw.timezone,
            observed_at: timestamp(raw.dt),
            unit,
            fetched_at,
        }
    }
}

impl ForecastSeries {
    pub(crate) fn from_wire(raw: wire::ForecastResponse, unit: Unit, fetched_at: DateTime<Utc>) -> Self {
        let entries = raw
            .list
            .iter()
            .map(|item| ForecastEntry {
                time: timestamp(item.dt),
                time_text: item.dt_txt.clone(),
                conditions: conditions_from(&item.weather),
                temperature: temperatures_from(&item.main),
                humidity: item.main.humidity,
                pressure: item.main.pressure,
                visibility: item.visibility,
                wind: wind_from(&item.wind),
                cloud_cover: item.clouds.all,
                precipitation: precipitation_from(&item.rain, &item.snow),
                precipitation_probability: item.pop,
            })
            .collect();

        Self {
            city: ForecastCity {
                id: raw.city.id,
                name: raw.city.name,
                country: raw.city.country,
                coordinates: Coordinates::new(raw.city.coord.lat, raw.city.coord.lon),
                timezone_offset_secs: raw.city.timezone,
            },
            entries,
            unit,
            fetched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_query_validation() {
        assert!(LocationQuery::city("").validate().is_err());
        assert!(LocationQuery::city("   ").validate().is_err());
        assert!(LocationQuery::city("Ankara").validate().is_ok());
        assert_eq!(
            LocationQuery::city("  Ankara ").query_params(),
            vec![("q", "Ankara".to_string())]
        );
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(LocationQuery::coords(41.0, 29.0).validate().is_ok());
        assert!(LocationQuery::coords(90.0, -180.0).validate().is_ok());
        assert!(LocationQuery::coords(90.1, 0.0).validate().is_err());
        assert!(LocationQuery::coords(0.0, 180.5).validate().is_err());
        assert!(LocationQuery::coords(f64::NAN, 0.0).validate().is_err());
        assert!(LocationQuery::coords(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_current_response_conversion() {
        let raw: wire::CurrentResponse = serde_json::from_value(serde_json::json!({
            "coord": {"lon": 28.98, "lat": 41.01},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 18.4, "feels_like": 17.9, "temp_min": 17.0, "temp_max": 19.5,
                     "pressure": 1012, "humidity": 72},
            "visibility": 10000,
            "wind": {"speed": 4.1, "deg": 210},
            "clouds": {"all": 75},
            "rain": {"1h": 0.4},
            "dt": 1700000000,
            "sys": {"country": "TR", "sunrise": 1699970000, "sunset": 1700007000},
            "timezone": 10800,
            "id": 745044,
            "name": "Istanbul"
        }))
        .unwrap();

        let snap = WeatherSnapshot::from_wire(raw, Unit::Metric, Utc::now());
        assert_eq!(snap.city_name, "Istanbul");
        assert_eq!(snap.country, "TR");
        assert_eq!(snap.conditions.description, "light rain");
        assert_eq!(snap.conditions.code, 500);
        assert_eq!(snap.humidity, 72);
        assert_eq!(snap.precipitation, Some(0.4));
        assert_eq!(snap.timezone_offset_secs, 10800);
        assert_eq!(snap.wind.gust, None);
    }
}
