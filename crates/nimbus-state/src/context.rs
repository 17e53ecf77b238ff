//! Application context: every service, built once at startup and passed
//! explicitly to whatever front end drives it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use nimbus_core::{AppError, Config, FileStorage, KeyValueStorage, MemoryStorage, Notifier, RuntimeConfig};
use nimbus_weather::city_search::CitySearch;
use nimbus_weather::location::position_source_from_config;
use nimbus_weather::{LocationResolver, OpenWeatherGateway, WeatherApi};

use crate::events::{StoreEvent, EVENT_CAPACITY};
use crate::persistence::{PersistenceBridge, Settings};
use crate::store::WeatherStateStore;
use crate::theme::ThemePreference;

pub struct AppContext {
    pub config: Config,
    pub runtime: RuntimeConfig,
    pub store: Arc<WeatherStateStore>,
    pub theme: ThemePreference,
    pub city_search: CitySearch,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Wire up storage, gateway, resolver and store from resolved configuration.
    pub fn build(
        config: Config,
        runtime: RuntimeConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let storage = open_storage(&config);

        let gateway: Arc<dyn WeatherApi> = Arc::new(
            OpenWeatherGateway::from_config(&runtime, &config.weather)
                .map_err(|e| AppError::Service(e.to_string()))?
                .with_notifier(notifier.clone()),
        );

        let locator = LocationResolver::new(position_source_from_config(&config.location), gateway.clone())
            .with_timeouts(
                Duration::from_secs(config.location.position_timeout_secs),
                Duration::from_secs(config.location.outer_timeout_secs),
            );

        let defaults = Settings {
            unit: config.defaults.unit,
            default_city: config.defaults.city.clone(),
        };

        let (events, _) = broadcast::channel::<StoreEvent>(EVENT_CAPACITY);

        let store = Arc::new(WeatherStateStore::new(
            gateway,
            locator,
            PersistenceBridge::new(storage.clone()),
            notifier.clone(),
            defaults,
            events.clone(),
        ));
        let theme = ThemePreference::load(storage, config.ui.dark_mode, events);
        let city_search = CitySearch::new(runtime.geodb.clone());

        tracing::info!("Application context ready");

        Ok(Self {
            config,
            runtime,
            store,
            theme,
            city_search,
            notifier,
        })
    }
}

/// File storage under the configured directory, or memory when that fails.
fn open_storage(config: &Config) -> Arc<dyn KeyValueStorage> {
    let dir = config.effective_storage_dir();
    match FileStorage::new(&dir) {
        Ok(storage) => {
            tracing::debug!("Using storage directory {}", dir.display());
            Arc::new(storage)
        }
        Err(e) => {
            tracing::warn!("Storage unavailable ({}); preferences will not persist", e);
            Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::{GeoDbConfig, TracingNotifier};
    use nimbus_weather::Unit;

    #[test]
    fn test_build_uses_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage_dir = Some(dir.path().to_path_buf());
        config.defaults.city = "Oslo".into();
        config.defaults.unit = Unit::Imperial;
        config.ui.dark_mode = true;

        let runtime = RuntimeConfig {
            openweather_api_key: "k".into(),
            weather_base_url: "http://127.0.0.1:9".into(),
            geodb: GeoDbConfig::default(),
        };

        let ctx = AppContext::build(config, runtime, Arc::new(TracingNotifier)).unwrap();
        let settings = ctx.store.settings();
        assert_eq!(settings.default_city, "Oslo");
        assert_eq!(settings.unit, Unit::Imperial);
        assert!(ctx.theme.is_dark());
        assert!(!ctx.city_search.uses_remote());
    }
}
