mod command;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use nimbus_core::{Config, Notifier, RuntimeConfig};
use nimbus_state::AppContext;
use nimbus_weather::city_search::DEFAULT_LIMIT;

use command::{join_words, Cli, Command, FavoriteAction};

/// Prints notifications straight to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, title: &str, message: &str) {
        println!("✓ {}: {}", title, message);
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("✗ {}: {}", title, message);
    }

    fn info(&self, title: &str, message: &str) {
        println!("· {}: {}", title, message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    nimbus_core::init()?;

    let command = Cli::parse().command();

    let (config, _) = Config::load_validated()?;
    let runtime = RuntimeConfig::resolve(&config).await;
    if let Err(e) = runtime.require_weather_key() {
        tracing::warn!("{}", e.user_message());
    }

    let ctx = AppContext::build(config, runtime, Arc::new(ConsoleNotifier))?;
    tracing::debug!(?command, "Running command");

    run(&ctx, command).await
}

async fn run(ctx: &AppContext, command: Command) -> Result<()> {
    let store = &ctx.store;

    match command {
        Command::Show { city } => {
            match join_words(&city) {
                Some(city) => store.load_weather_data(&city, true).await,
                None => store.initialize_with_user_location().await,
            }
            print_weather(ctx)?;
        }
        Command::Locate => {
            store.load_weather_by_user_location().await;
            print_weather(ctx)?;
        }
        Command::Search { query } => {
            let query = join_words(&query).unwrap_or_default();
            let results = ctx.city_search.search(&query, DEFAULT_LIMIT).await;
            if results.is_empty() {
                println!("No cities found for \"{}\"", query);
            }
            for city in results {
                println!(
                    "{:<24} {:<20} {} ({:.2}, {:.2})",
                    city.name, city.region, city.country_code, city.latitude, city.longitude
                );
            }
        }
        Command::Favorites => {
            let favorites = store.favorites();
            if favorites.is_empty() {
                println!("No favorite cities yet");
            }
            for favorite in favorites {
                println!(
                    "{:<24} {}  added {}",
                    favorite.name,
                    favorite.country,
                    favorite.added_at.format("%Y-%m-%d")
                );
            }
        }
        Command::Favorite {
            action: FavoriteAction::Add { city },
        } => {
            let city = join_words(&city).unwrap_or_default();
            store.load_weather_data(&city, true).await;
            if let Some(error) = store.error() {
                anyhow::bail!(error);
            }
            match store.current_weather() {
                Some(snapshot) if store.add_to_favorites(&snapshot) => {
                    ctx.notifier
                        .success("Favorites", &format!("{} added to favorites", snapshot.city_name));
                }
                Some(snapshot) => println!("{} is already a favorite", snapshot.city_name),
                None => anyhow::bail!("No weather data for {}", city),
            }
        }
        Command::Favorite {
            action: FavoriteAction::Remove { city },
        } => {
            let city = join_words(&city).unwrap_or_default();
            if store.remove_from_favorites(&city) {
                ctx.notifier
                    .success("Favorites", &format!("{} removed from favorites", city));
            } else {
                println!("{} is not a favorite", city);
            }
        }
        Command::Unit { unit } => {
            let unit = nimbus_core::Unit::from(unit);
            store.set_unit(unit).await;
            println!("Unit set to {}", unit.as_query());
        }
        Command::Default { city } => {
            store.set_default_city(&join_words(&city).unwrap_or_default());
            println!("Default city set to {}", store.settings().default_city);
        }
        Command::Theme { action } => {
            let theme = match action.map(|a| a.theme()) {
                None => ctx.theme.current(),
                Some(None) => ctx.theme.toggle(),
                Some(Some(theme)) => {
                    ctx.theme.set(theme);
                    theme
                }
            };
            println!("Theme: {}", theme);
        }
        Command::Reset => {
            store.reset_all_data();
            ctx.notifier.info("Reset", "All saved data cleared");
        }
    }

    Ok(())
}

fn print_weather(ctx: &AppContext) -> Result<()> {
    let store = &ctx.store;

    let Some(snapshot) = store.current_weather() else {
        match store.error() {
            Some(error) => anyhow::bail!(error),
            None => anyhow::bail!("No weather data available"),
        }
    };

    let temperature = store.current_temperature().unwrap_or_default();
    let star = if store.is_favorite() { " ★" } else { "" };
    let speed_unit = match snapshot.unit {
        nimbus_core::Unit::Metric => "m/s",
        nimbus_core::Unit::Imperial => "mph",
    };

    println!("{}, {}{}", snapshot.city_name, snapshot.country, star);
    println!("  {}  {}", temperature, store.weather_condition());
    println!(
        "  feels like {:.0}°  low {:.0}°  high {:.0}°",
        snapshot.temperature.feels_like, snapshot.temperature.min, snapshot.temperature.max
    );
    println!(
        "  humidity {}%  pressure {} hPa  wind {:.1} {}  clouds {}%",
        snapshot.humidity, snapshot.pressure, snapshot.wind.speed, speed_unit, snapshot.cloud_cover
    );

    if let Some(profile) = store.daily_temperatures() {
        println!(
            "\n  morning {:.0}°  afternoon {:.0}°  evening {:.0}°  night {:.0}°",
            profile.morning, profile.afternoon, profile.evening, profile.night
        );
    }

    let days = store.daily_forecast();
    if !days.is_empty() {
        println!();
        for day in days {
            println!(
                "  {:<10} {:>4.0}°  {:>4.0}° / {:<4.0}°  {}",
                day.day_name, day.temperature, day.temp_max, day.temp_min, day.description
            );
        }
    }

    Ok(())
}
