//! Weather lookup: city validation, provider abstraction and forecast
//! post-processing.

use std::{fmt::Debug, sync::LazyLock};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use regex::Regex;
use thiserror::Error;

use crate::model::{CurrentWeather, ForecastEntry, Place};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Maximum number of geocoding candidates requested.
pub const GEOCODE_LIMIT: usize = 5;

static CITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ž\s.,'\-]+$").expect("city pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityInputError {
    #[error("Please enter a city/province name.")]
    Empty,
    #[error("Please enter at least 2 characters.")]
    TooShort,
    #[error("Please use letters and common punctuation only.")]
    InvalidCharacters,
}

/// Trims and checks a city name before any request is made.
pub fn validate_city(raw: &str) -> Result<&str, CityInputError> {
    let city = raw.trim();
    if city.is_empty() {
        return Err(CityInputError::Empty);
    }
    if city.chars().count() < 2 {
        return Err(CityInputError::TooShort);
    }
    if !CITY_PATTERN.is_match(city) {
        return Err(CityInputError::InvalidCharacters);
    }

    Ok(city)
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Up to [`GEOCODE_LIMIT`] candidate places for a city name.
    async fn geocode(&self, city: &str) -> anyhow::Result<Vec<Place>>;

    async fn current(&self, place: &Place) -> anyhow::Result<CurrentWeather>;

    /// 3-hourly forecast steps, oldest first.
    async fn forecast(&self, place: &Place) -> anyhow::Result<Vec<ForecastEntry>>;
}

/// Keeps one entry per UTC calendar day: the one closest to 12:00 UTC.
///
/// Days keep the order they first appear in; the earliest entry wins ties.
pub fn pick_daily(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    let mut days: Vec<(NaiveDate, &ForecastEntry, u32)> = Vec::new();

    for entry in entries {
        let Some(dt) = DateTime::<Utc>::from_timestamp(entry.timestamp, 0) else {
            continue;
        };
        let date = dt.date_naive();
        let dist = dt.hour().abs_diff(12);

        match days.iter_mut().find(|(day, ..)| *day == date) {
            Some(slot) if dist < slot.2 => {
                slot.1 = entry;
                slot.2 = dist;
            }
            Some(_) => {}
            None => days.push((date, entry, dist)),
        }
    }

    days.into_iter().map(|(_, entry, _)| entry.clone()).collect()
}

/// Short weekday and `Mon D` date for a unix timestamp in `tz`.
pub fn day_label<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<(String, String)>
where
    Tz::Offset: std::fmt::Display,
{
    let local = DateTime::<Utc>::from_timestamp(timestamp, 0)?.with_timezone(tz);
    Some((local.format("%a").to_string(), local.format("%b %-d").to_string()))
}

/// Emoji for an OpenWeather condition code, refined by its description.
pub fn weather_icon(code: Option<u32>, description: &str) -> &'static str {
    let Some(code) = code else {
        return "🌡️";
    };
    let desc = description.to_lowercase();

    match code {
        200..=299 => "⛈️",
        300..=399 => "🌦️",
        500..=599 if desc.contains("light") => "🌦️",
        500..=599 => "🌧️",
        600..=699 => "❄️",
        700..=799 if desc.contains("sand") || desc.contains("dust") => "🌪️",
        700..=799 => "🌫️",
        800 => "☀️",
        801..=809 if desc.contains("few") => "🌤️",
        801..=809 if desc.contains("scattered") => "⛅",
        801..=809 => "☁️",
        _ => "🌡️",
    }
}
