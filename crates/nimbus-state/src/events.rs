//! Change notifications published by the state store.

use crate::theme::Theme;

/// One observable change to application state.
///
/// Subscribers re-read whatever views they render; events carry only enough
/// to decide whether that is worth doing.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    LoadingChanged(bool),
    /// Snapshot and series were replaced together
    WeatherUpdated { city: String },
    /// Snapshot and series were discarded after a failed fetch
    WeatherCleared,
    ErrorChanged(Option<String>),
    SelectedCityChanged(String),
    FavoritesChanged,
    SettingsChanged,
    ThemeChanged(Theme),
    /// Everything went back to defaults
    Reset,
}

/// Capacity of the broadcast channel; slow subscribers see `Lagged`
pub const EVENT_CAPACITY: usize = 64;
