//! Views derived from the forecast series.
//!
//! Pure functions of the current snapshot/series; callers recompute on every
//! read. Calendar days and hours are taken in the forecast city's own UTC
//! offset.

use chrono::{FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ForecastEntry, ForecastSeries, WeatherSnapshot};

/// At most this many days appear in the daily summary
pub const MAX_FORECAST_DAYS: usize = 5;

/// Entries considered for the time-of-day profile (24h at 3h resolution)
pub const PROFILE_ENTRIES: usize = 8;

/// Used when there is no current snapshot to fall back on
const DEFAULT_CURRENT_TEMP: f64 = 20.0;

/// One calendar day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastSummary {
    pub date: NaiveDate,
    /// Weekday name, e.g. "Monday"
    pub day_name: String,
    /// Rounded temperature of the representative entry
    pub temperature: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Average temperature per time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperatureProfile {
    /// 06:00-12:00
    pub morning: f64,
    /// 12:00-18:00
    pub afternoon: f64,
    /// 18:00-24:00
    pub evening: f64,
    /// 00:00-06:00
    pub night: f64,
}

fn city_offset(series: &ForecastSeries) -> FixedOffset {
    FixedOffset::east_opt(series.city.timezone_offset_secs).unwrap_or_else(|| Utc.fix())
}

/// Group the series into per-day summaries, earliest day first, capped at five days.
pub fn daily_forecast(series: &ForecastSeries) -> Vec<DailyForecastSummary> {
    let offset = city_offset(series);

    let mut ordered: Vec<&ForecastEntry> = series.entries.iter().collect();
    ordered.sort_by_key(|entry| entry.time);

    let mut days: BTreeMap<NaiveDate, Vec<&ForecastEntry>> = BTreeMap::new();
    for entry in ordered {
        let date = entry.time.with_timezone(&offset).date_naive();
        days.entry(date).or_default().push(entry);
    }

    days.into_iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(|(date, entries)| {
            let first = *entries.first()?;
            let temp_max = entries
                .iter()
                .map(|e| e.temperature.max)
                .fold(f64::NEG_INFINITY, f64::max);
            let temp_min = entries
                .iter()
                .map(|e| e.temperature.min)
                .fold(f64::INFINITY, f64::min);

            Some(DailyForecastSummary {
                date,
                day_name: date.format("%A").to_string(),
                temperature: first.temperature.current.round(),
                temp_max,
                temp_min,
                description: first.conditions.description.clone(),
                icon: first.conditions.icon.clone(),
                humidity: first.humidity,
                wind_speed: first.wind.speed,
            })
        })
        .collect()
}

/// Average the first 24h of the series into four time-of-day buckets.
///
/// Empty buckets take a fixed offset from the current temperature
/// (morning -2, afternoon +3, evening +0, night -5).
pub fn daily_temperatures(
    series: &ForecastSeries,
    current: Option<&WeatherSnapshot>,
) -> DailyTemperatureProfile {
    let offset = city_offset(series);

    // [morning, afternoon, evening, night]
    let mut sums = [0.0_f64; 4];
    let mut counts = [0_u32; 4];

    for entry in series.entries.iter().take(PROFILE_ENTRIES) {
        let hour = entry.time.with_timezone(&offset).hour();
        let bucket = match hour {
            6..=11 => 0,
            12..=17 => 1,
            18..=23 => 2,
            _ => 3,
        };
        sums[bucket] += entry.temperature.current;
        counts[bucket] += 1;
    }

    let current_temp = current
        .map(|s| s.temperature.current)
        .unwrap_or(DEFAULT_CURRENT_TEMP);

    let average = |bucket: usize, fallback: f64| {
        if counts[bucket] > 0 {
            sums[bucket] / f64::from(counts[bucket])
        } else {
            fallback
        }
    };

    DailyTemperatureProfile {
        morning: average(0, current_temp - 2.0),
        afternoon: average(1, current_temp + 3.0),
        evening: average(2, current_temp),
        night: average(3, current_temp - 5.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Conditions, Coordinates, ForecastCity, Temperatures, Unit, Wind};
    use chrono::{DateTime, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn entry(time: DateTime<Utc>, temp: f64, min: f64, max: f64, icon: &str) -> ForecastEntry {
        ForecastEntry {
            time,
            time_text: time.format("%Y-%m-%d %H:%M:%S").to_string(),
            conditions: Conditions {
                code: 800,
                main: "Clear".into(),
                description: format!("sky {}", icon),
                icon: icon.into(),
            },
            temperature: Temperatures {
                current: temp,
                feels_like: temp,
                min,
                max,
            },
            humidity: 50,
            pressure: 1013,
            visibility: Some(10000),
            wind: Wind {
                speed: 3.0,
                direction: 90.0,
                gust: None,
            },
            cloud_cover: 0,
            precipitation: None,
            precipitation_probability: 0.0,
        }
    }

    fn series(entries: Vec<ForecastEntry>, offset_secs: i32) -> ForecastSeries {
        ForecastSeries {
            city: ForecastCity {
                id: 1,
                name: "Testville".into(),
                country: "TV".into(),
                coordinates: Coordinates::new(0.0, 0.0),
                timezone_offset_secs: offset_secs,
            },
            entries,
            unit: Unit::Metric,
            fetched_at: at(1, 0),
        }
    }

    #[test]
    fn daily_summary_groups_by_calendar_date() {
        let s = series(
            vec![
                entry(at(1, 9), 10.4, 8.0, 11.0, "01d"),
                entry(at(1, 12), 14.0, 12.0, 15.5, "02d"),
                entry(at(2, 0), 6.0, 4.0, 7.0, "01n"),
            ],
            0,
        );

        let days = daily_forecast(&s);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[0].day_name, "Friday");
        assert_eq!(days[0].temperature, 10.0);
        assert_eq!(days[0].temp_max, 15.5);
        assert_eq!(days[0].temp_min, 8.0);
        assert_eq!(days[0].icon, "01d");
        assert_eq!(days[1].temp_min, 4.0);
    }

    #[test]
    fn daily_summary_caps_at_five_unique_days() {
        let entries = (1..=7)
            .flat_map(|day| [entry(at(day, 3), 5.0, 4.0, 6.0, "x"), entry(at(day, 15), 9.0, 8.0, 10.0, "y")])
            .collect();
        let days = daily_forecast(&series(entries, 0));

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn daily_summary_orders_out_of_order_input() {
        let s = series(
            vec![entry(at(3, 9), 1.0, 1.0, 1.0, "late"), entry(at(2, 9), 2.0, 2.0, 2.0, "early")],
            0,
        );
        let days = daily_forecast(&s);
        assert_eq!(days[0].icon, "early");
        assert_eq!(days[1].icon, "late");
    }

    #[test]
    fn daily_summary_uses_city_offset() {
        // 22:00 UTC is already the next day at UTC+3
        let s = series(vec![entry(at(1, 22), 5.0, 5.0, 5.0, "n")], 3 * 3600);
        let days = daily_forecast(&s);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn daily_summary_empty_series() {
        assert!(daily_forecast(&series(vec![], 0)).is_empty());
    }

    #[test]
    fn temperature_profile_averages_buckets() {
        let s = series(
            vec![
                entry(at(1, 0), 2.0, 0.0, 0.0, ""),
                entry(at(1, 3), 4.0, 0.0, 0.0, ""),
                entry(at(1, 6), 10.0, 0.0, 0.0, ""),
                entry(at(1, 9), 12.0, 0.0, 0.0, ""),
                entry(at(1, 12), 18.0, 0.0, 0.0, ""),
                entry(at(1, 15), 20.0, 0.0, 0.0, ""),
                entry(at(1, 18), 14.0, 0.0, 0.0, ""),
                entry(at(1, 21), 8.0, 0.0, 0.0, ""),
                // ninth entry is ignored
                entry(at(2, 0), 100.0, 0.0, 0.0, ""),
            ],
            0,
        );

        let profile = daily_temperatures(&s, None);
        assert_eq!(profile.night, 3.0);
        assert_eq!(profile.morning, 11.0);
        assert_eq!(profile.afternoon, 19.0);
        assert_eq!(profile.evening, 11.0);
    }

    #[test]
    fn temperature_profile_empty_buckets_fall_back_to_offsets() {
        // Only an afternoon entry; the rest fall back to the default 20 degrees.
        let s = series(vec![entry(at(1, 13), 25.0, 0.0, 0.0, "")], 0);
        let profile = daily_temperatures(&s, None);
        assert_eq!(profile.afternoon, 25.0);
        assert_eq!(profile.morning, 18.0);
        assert_eq!(profile.evening, 20.0);
        assert_eq!(profile.night, 15.0);

        let empty = daily_temperatures(&series(vec![], 0), None);
        assert_eq!(empty.afternoon, 23.0);
    }
}
