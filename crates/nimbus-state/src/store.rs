//! Application State Store.
//!
//! Holds the raw state (snapshot, series, favorites, settings, transient UI
//! flags) behind a single lock and exposes the derived views as functions of
//! it. Every mutation publishes a `StoreEvent`.
//!
//! Fetches are paired: current conditions and forecast are requested together
//! and the state only changes once both have arrived, or both are cleared.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

use nimbus_core::{Notifier, Unit};
use nimbus_weather::forecast::{daily_forecast, daily_temperatures};
use nimbus_weather::{
    DailyForecastSummary, DailyTemperatureProfile, ForecastSeries, LocationQuery,
    LocationResolver, LocationResult, WeatherApi, WeatherError, WeatherSnapshot,
};

use crate::events::StoreEvent;
use crate::persistence::{FavoriteCity, PersistenceBridge, Settings};

/// Full raw state at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub current_weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSeries>,
    pub favorites: Vec<FavoriteCity>,
    pub settings: Settings,
    pub loading: bool,
    pub error: Option<String>,
    pub selected_city: String,
}

pub struct WeatherStateStore {
    state: Mutex<StoreState>,
    gateway: Arc<dyn WeatherApi>,
    locator: LocationResolver,
    persistence: PersistenceBridge,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<StoreEvent>,
    defaults: Settings,
}

impl WeatherStateStore {
    /// Create a store, restoring favorites and settings from persistence.
    ///
    /// `defaults` seeds settings on first run and after a reset.
    pub fn new(
        gateway: Arc<dyn WeatherApi>,
        locator: LocationResolver,
        persistence: PersistenceBridge,
        notifier: Arc<dyn Notifier>,
        defaults: Settings,
        events: broadcast::Sender<StoreEvent>,
    ) -> Self {
        let state = StoreState {
            favorites: persistence.load_favorites(),
            settings: persistence.load_settings(&defaults),
            ..StoreState::default()
        };

        tracing::debug!(
            favorites = state.favorites.len(),
            unit = ?state.settings.unit,
            "Weather state restored"
        );

        Self {
            state: Mutex::new(state),
            gateway,
            locator,
            persistence,
            notifier,
            events,
            defaults,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    // ---- Reads ----

    pub fn state(&self) -> StoreState {
        self.state.lock().clone()
    }

    pub fn current_weather(&self) -> Option<WeatherSnapshot> {
        self.state.lock().current_weather.clone()
    }

    pub fn forecast(&self) -> Option<ForecastSeries> {
        self.state.lock().forecast.clone()
    }

    pub fn favorites(&self) -> Vec<FavoriteCity> {
        self.state.lock().favorites.clone()
    }

    pub fn settings(&self) -> Settings {
        self.state.lock().settings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn selected_city(&self) -> String {
        self.state.lock().selected_city.clone()
    }

    /// Rounded current temperature with its unit symbol, e.g. "21°C".
    ///
    /// The symbol follows the unit the snapshot was fetched in.
    pub fn current_temperature(&self) -> Option<String> {
        let state = self.state.lock();
        let snapshot = state.current_weather.as_ref()?;
        Some(format!(
            "{}°{}",
            snapshot.temperature.current.round(),
            snapshot.unit.temperature_symbol()
        ))
    }

    pub fn weather_condition(&self) -> String {
        self.state
            .lock()
            .current_weather
            .as_ref()
            .map(|s| s.conditions.description.clone())
            .unwrap_or_default()
    }

    pub fn weather_icon(&self) -> String {
        self.state
            .lock()
            .current_weather
            .as_ref()
            .map(|s| s.conditions.icon.clone())
            .unwrap_or_default()
    }

    /// Whether the selected city is among the favorites
    pub fn is_favorite(&self) -> bool {
        let state = self.state.lock();
        let city = state.selected_city.to_lowercase();
        state.favorites.iter().any(|f| f.name.to_lowercase() == city)
    }

    pub fn daily_forecast(&self) -> Vec<DailyForecastSummary> {
        self.state
            .lock()
            .forecast
            .as_ref()
            .map(daily_forecast)
            .unwrap_or_default()
    }

    pub fn daily_temperatures(&self) -> Option<DailyTemperatureProfile> {
        let state = self.state.lock();
        let series = state.forecast.as_ref()?;
        Some(daily_temperatures(series, state.current_weather.as_ref()))
    }

    // ---- Fetching ----

    /// Fetch current conditions and forecast for `city`.
    ///
    /// Ignored while a fetch for the same city is already in flight. A
    /// user-initiated success is remembered so later cold starts skip
    /// location detection.
    pub async fn load_weather_data(&self, city: &str, user_initiated: bool) {
        let query = LocationQuery::city(city);
        if let Err(e) = query.validate() {
            self.reject(e);
            return;
        }
        let city = city.trim();

        let unit = {
            let mut state = self.state.lock();
            if state.loading && state.selected_city == city {
                tracing::debug!(city, "Fetch already in flight");
                return;
            }
            state.loading = true;
            state.error = None;
            state.selected_city = city.to_string();
            state.settings.unit
        };
        self.emit(StoreEvent::LoadingChanged(true));
        self.emit(StoreEvent::SelectedCityChanged(city.to_string()));

        match self.fetch_pair(&query, unit).await {
            Ok((current, forecast)) => {
                self.apply_success(current, forecast, false);
                if user_initiated {
                    self.persistence.mark_manual_selection();
                }
            }
            Err(e) => self.apply_failure(e),
        }
    }

    /// Fetch by coordinates; the selected city becomes the resolved name.
    pub async fn load_weather_by_coords(&self, lat: f64, lon: f64) {
        let query = LocationQuery::coords(lat, lon);
        if let Err(e) = query.validate() {
            self.reject(e);
            return;
        }

        let unit = {
            let mut state = self.state.lock();
            if state.loading {
                tracing::debug!("Fetch already in flight");
                return;
            }
            state.loading = true;
            state.error = None;
            state.settings.unit
        };
        self.emit(StoreEvent::LoadingChanged(true));

        match self.fetch_pair(&query, unit).await {
            Ok((current, forecast)) => self.apply_success(current, forecast, true),
            Err(e) => self.apply_failure(e),
        }
    }

    /// Reload the selected city, if any.
    pub async fn refresh_weather_data(&self) {
        let city = self.selected_city();
        if !city.is_empty() {
            self.load_weather_data(&city, true).await;
        }
    }

    async fn fetch_pair(
        &self,
        query: &LocationQuery,
        unit: Unit,
    ) -> Result<(WeatherSnapshot, ForecastSeries), WeatherError> {
        tokio::try_join!(
            self.gateway.fetch_current(query, unit),
            self.gateway.fetch_forecast(query, unit),
        )
    }

    fn apply_success(&self, current: WeatherSnapshot, forecast: ForecastSeries, select: bool) {
        let city = current.city_name.clone();
        {
            // A slower response for an earlier city still overwrites a newer one.
            // `loading` is a single flag, so any finished fetch clears it.
            let mut state = self.state.lock();
            if select {
                state.selected_city = city.clone();
            }
            state.current_weather = Some(current);
            state.forecast = Some(forecast);
            state.loading = false;
        }

        tracing::info!(city = %city, "Weather data loaded");
        if select {
            self.emit(StoreEvent::SelectedCityChanged(city.clone()));
        }
        self.emit(StoreEvent::WeatherUpdated { city });
        self.emit(StoreEvent::LoadingChanged(false));
    }

    fn apply_failure(&self, error: WeatherError) {
        let message = error.user_message();
        {
            let mut state = self.state.lock();
            state.current_weather = None;
            state.forecast = None;
            state.error = Some(message.clone());
            state.loading = false;
        }

        tracing::warn!("Weather fetch failed: {}", message);
        self.emit(StoreEvent::WeatherCleared);
        self.emit(StoreEvent::ErrorChanged(Some(message.clone())));
        self.emit(StoreEvent::LoadingChanged(false));

        // The gateway already notified for API errors
        if !error.is_api_error() {
            self.notifier.error("Error", &message);
        }
    }

    /// Input rejected before any request
    fn reject(&self, error: WeatherError) {
        let message = error.user_message();
        self.set_error(Some(message.clone()));
        self.notifier.error("Error", &message);
    }

    fn set_error(&self, error: Option<String>) {
        self.state.lock().error = error.clone();
        self.emit(StoreEvent::ErrorChanged(error));
    }

    // ---- Settings and favorites ----

    /// Persist the unit and re-fetch the selected city in it.
    pub async fn set_unit(&self, unit: Unit) {
        let (settings, city) = {
            let mut state = self.state.lock();
            state.settings.unit = unit;
            (state.settings.clone(), state.selected_city.clone())
        };
        self.persistence.save_settings(&settings);
        self.emit(StoreEvent::SettingsChanged);

        if !city.is_empty() {
            self.load_weather_data(&city, true).await;
        }
    }

    pub fn set_default_city(&self, city: &str) {
        let settings = {
            let mut state = self.state.lock();
            state.settings.default_city = city.trim().to_string();
            state.settings.clone()
        };
        self.persistence.save_settings(&settings);
        self.persistence.mark_manual_selection();
        self.emit(StoreEvent::SettingsChanged);
    }

    /// Add the snapshot's city to favorites. Returns false if already present.
    pub fn add_to_favorites(&self, snapshot: &WeatherSnapshot) -> bool {
        let favorites = {
            let mut state = self.state.lock();
            let name = snapshot.city_name.to_lowercase();
            if state.favorites.iter().any(|f| f.name.to_lowercase() == name) {
                return false;
            }

            let now = Utc::now();
            state.favorites.push(FavoriteCity {
                id: format!("{}-{}", snapshot.city_id, now.timestamp_millis()),
                name: snapshot.city_name.clone(),
                country: snapshot.country.clone(),
                coordinates: snapshot.coordinates,
                added_at: now,
            });
            state.favorites.clone()
        };

        self.persistence.save_favorites(&favorites);
        self.emit(StoreEvent::FavoritesChanged);
        true
    }

    /// Remove every favorite whose name matches, ignoring case.
    pub fn remove_from_favorites(&self, city: &str) -> bool {
        let needle = city.to_lowercase();
        let (favorites, removed) = {
            let mut state = self.state.lock();
            let before = state.favorites.len();
            state.favorites.retain(|f| f.name.to_lowercase() != needle);
            (state.favorites.clone(), before != state.favorites.len())
        };

        self.persistence.save_favorites(&favorites);
        self.emit(StoreEvent::FavoritesChanged);
        removed
    }

    /// Back to first-run state; all persisted keys are removed.
    pub fn reset_all_data(&self) {
        *self.state.lock() = StoreState {
            settings: self.defaults.clone(),
            ..StoreState::default()
        };
        self.persistence.clear_all();
        tracing::info!("All weather data reset");
        self.emit(StoreEvent::Reset);
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    pub fn clear_cache(&self) {
        self.persistence.clear_cache();
    }

    // ---- Location ----

    /// Pick the first city to show on a cold start.
    ///
    /// Does nothing once a city or snapshot is present. Uses the default city
    /// when the user chose a city in an earlier session or location is
    /// unavailable; otherwise shows the detected city without making it the
    /// default.
    pub async fn initialize_with_user_location(&self) {
        {
            let state = self.state.lock();
            if !state.selected_city.is_empty() || state.current_weather.is_some() {
                return;
            }
        }

        if self.persistence.has_manual_selection() {
            self.load_default_city().await;
            return;
        }

        if !self.locator.is_available() {
            tracing::warn!("Location not available, using default city");
            self.load_default_city().await;
            return;
        }

        match self.locator.get_current_location().await {
            Ok(LocationResult {
                city_name: Some(city),
                ..
            }) if !city.trim().is_empty() => {
                tracing::info!(city = %city, "Location detected");
                self.load_weather_data(&city, false).await;
            }
            Ok(_) => {
                tracing::warn!("Could not determine city name from location");
                self.load_default_city().await;
            }
            Err(e) => {
                tracing::warn!("Failed to get user location: {}", e);
                self.load_default_city().await;
            }
        }
    }

    /// User-requested refresh from the current location.
    pub async fn load_weather_by_user_location(&self) {
        if !self.locator.is_available() {
            self.notifier.error(
                "Location Error",
                "Location is not available. Please enable location services.",
            );
            return;
        }

        {
            let mut state = self.state.lock();
            state.loading = true;
            state.error = None;
        }
        self.emit(StoreEvent::LoadingChanged(true));

        let located = self.locator.get_current_location().await;

        // Cleared even if a city fetch started meanwhile is still running.
        self.state.lock().loading = false;
        self.emit(StoreEvent::LoadingChanged(false));

        match located {
            Ok(result) => {
                self.load_weather_by_coords(result.position.latitude, result.position.longitude)
                    .await;

                let succeeded = self.state.lock().error.is_none();
                match result.city_name {
                    Some(city) if succeeded => self.notifier.success(
                        "Location Updated",
                        &format!("Weather data updated for {}", city),
                    ),
                    _ => {}
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.set_error(Some(message.clone()));
                self.notifier.error("Location Error", &message);
            }
        }
    }

    async fn load_default_city(&self) {
        let city = self.state.lock().settings.default_city.clone();
        if !city.trim().is_empty() {
            self.load_weather_data(&city, false).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::{MemoryStorage, TracingNotifier};
    use nimbus_weather::{Coordinates, UnavailablePositionSource};

    struct NoGateway;

    #[async_trait::async_trait]
    impl WeatherApi for NoGateway {
        async fn fetch_current(
            &self,
            _query: &LocationQuery,
            _unit: Unit,
        ) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::Network("offline".into()))
        }

        async fn fetch_forecast(
            &self,
            _query: &LocationQuery,
            _unit: Unit,
        ) -> Result<ForecastSeries, WeatherError> {
            Err(WeatherError::Network("offline".into()))
        }
    }

    fn store() -> WeatherStateStore {
        let gateway: Arc<dyn WeatherApi> = Arc::new(NoGateway);
        WeatherStateStore::new(
            gateway.clone(),
            LocationResolver::new(Arc::new(UnavailablePositionSource), gateway),
            PersistenceBridge::new(Arc::new(MemoryStorage::new())),
            Arc::new(TracingNotifier),
            Settings::default(),
            broadcast::channel(16).0,
        )
    }

    fn favorite(name: &str) -> FavoriteCity {
        FavoriteCity {
            id: "1".into(),
            name: name.into(),
            country: "TR".into(),
            coordinates: Coordinates::new(41.0, 29.0),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_views_without_data() {
        let s = store();
        assert_eq!(s.current_temperature(), None);
        assert_eq!(s.weather_condition(), "");
        assert_eq!(s.weather_icon(), "");
        assert!(s.daily_forecast().is_empty());
        assert!(s.daily_temperatures().is_none());
        assert!(!s.is_favorite());
    }

    #[test]
    fn test_is_favorite_ignores_case() {
        let s = store();
        {
            let mut state = s.state.lock();
            state.favorites.push(favorite("Istanbul"));
            state.selected_city = "ISTANBUL".into();
        }
        assert!(s.is_favorite());
    }

    #[tokio::test]
    async fn test_failure_clears_loading_and_sets_error() {
        let s = store();
        let mut rx = s.subscribe();
        s.load_weather_data("Ankara", false).await;

        let state = s.state();
        assert!(!state.loading);
        assert_eq!(state.selected_city, "Ankara");
        assert_eq!(state.error.as_deref(), Some("Please check your internet connection"));

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::LoadingChanged(true));
    }

    #[test]
    fn test_clear_error() {
        let s = store();
        s.set_error(Some("boom".into()));
        s.clear_error();
        assert_eq!(s.error(), None);
    }
}
