//! Application state for Nimbus
//!
//! The weather state store, its persistence bridge, the theme preference and
//! the context object that wires them to the weather services.

pub mod context;
pub mod events;
pub mod persistence;
pub mod store;
pub mod theme;

pub use context::AppContext;
pub use events::StoreEvent;
pub use persistence::{FavoriteCity, PersistenceBridge, Settings};
pub use store::{StoreState, WeatherStateStore};
pub use theme::{Theme, ThemePreference};
