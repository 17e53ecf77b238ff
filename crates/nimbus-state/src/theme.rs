//! Light/dark theme preference.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::broadcast;

use nimbus_core::KeyValueStorage;

use crate::events::StoreEvent;

pub const THEME_KEY: &str = "weather-dashboard-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Current theme, persisted as a bare "light"/"dark" string.
pub struct ThemePreference {
    storage: Arc<dyn KeyValueStorage>,
    current: Mutex<Theme>,
    events: broadcast::Sender<StoreEvent>,
}

impl ThemePreference {
    /// Stored theme if there is a valid one, else dark or light per `prefer_dark`.
    pub fn load(
        storage: Arc<dyn KeyValueStorage>,
        prefer_dark: bool,
        events: broadcast::Sender<StoreEvent>,
    ) -> Self {
        let stored = match storage.get(THEME_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<Theme>().ok()),
            Err(e) => {
                tracing::warn!("Error loading theme: {}", e);
                None
            }
        };

        let initial = stored.unwrap_or(if prefer_dark { Theme::Dark } else { Theme::Light });

        Self {
            storage,
            current: Mutex::new(initial),
            events,
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock()
    }

    pub fn is_dark(&self) -> bool {
        self.current() == Theme::Dark
    }

    pub fn set(&self, theme: Theme) {
        *self.current.lock() = theme;
        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            tracing::warn!("Error saving theme: {}", e);
        }
        let _ = self.events.send(StoreEvent::ThemeChanged(theme));
    }

    /// Switch to the other theme and return it.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set(next);
        next
    }
}
