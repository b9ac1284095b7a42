//! Core library for the `widgets` CLI.
//!
//! This crate defines:
//! - The calculator engine and its input mapping
//! - Weather and dictionary lookups behind provider traits
//! - Stored preferences (theme per widget, API key)
//!
//! It is used by `widgets-cli`, but the engine has no I/O and can be driven by any front end.

pub mod calculator;
pub mod config;
pub mod dictionary;
pub mod model;
pub mod theme;
pub mod weather;

pub use calculator::{Calculator, Display, Input, Operation};
pub use config::Config;
pub use dictionary::DictionaryProvider;
pub use model::{CurrentWeather, DictionaryEntry, ForecastEntry, Place};
pub use theme::{Theme, Widget};
pub use weather::WeatherProvider;
