//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};

use nimbus_core::Unit;
use nimbus_state::Theme;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "nimbus")]
#[command(about = "Current weather, forecasts and favorite cities")]
pub struct Cli {
    /// Defaults to `show` for the detected or default city
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show { city: Vec::new() })
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Current weather and forecast (detected or default city if omitted)
    Show { city: Vec<String> },
    /// Weather for your current location
    Locate,
    /// Look up city names
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List favorite cities
    Favorites,
    /// Add or remove a favorite city
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Set the temperature unit
    Unit { unit: UnitArg },
    /// Set the default city
    Default {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Show or change the theme
    Theme { action: Option<ThemeArg> },
    /// Clear favorites, settings and saved preferences
    Reset,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FavoriteAction {
    /// Fetch a city and save it as a favorite
    Add {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Remove a favorite
    #[command(alias = "rm")]
    Remove {
        #[arg(required = true)]
        city: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitArg {
    Metric,
    Imperial,
}

impl From<UnitArg> for Unit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Metric => Unit::Metric,
            UnitArg::Imperial => Unit::Imperial,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Toggle,
    Light,
    Dark,
}

impl ThemeArg {
    /// Explicit theme, or `None` for a toggle
    pub fn theme(self) -> Option<Theme> {
        match self {
            Self::Toggle => None,
            Self::Light => Some(Theme::Light),
            Self::Dark => Some(Theme::Dark),
        }
    }
}

/// Multi-word city names arrive as separate words.
pub fn join_words(words: &[String]) -> Option<String> {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
