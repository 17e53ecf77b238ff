//! Weather data for Nimbus
//!
//! OpenWeatherMap gateway with retry/timeout policy, derived forecast views,
//! location resolution with a static fallback table, and city search.

pub mod cities;
pub mod city_search;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod location;
pub mod retry;
pub mod types;

pub use city_search::{CitySearch, CitySearchResult};
pub use error::{LocationError, WeatherError};
pub use forecast::{daily_forecast, daily_temperatures, DailyForecastSummary, DailyTemperatureProfile};
pub use gateway::{OpenWeatherGateway, WeatherApi};
pub use location::{
    fallback_city, FixedPositionSource, IpPositionSource, LocationResolver, LocationResult,
    Permission, Position, PositionSource, UnavailablePositionSource,
};
pub use retry::RetryConfig;
pub use types::*;
