use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    Calculator,
    Weather,
    Dictionary,
}

impl Widget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Widget::Calculator => "calculator",
            Widget::Weather => "weather",
            Widget::Dictionary => "dictionary",
        }
    }

    pub const fn all() -> &'static [Widget] {
        &[Widget::Calculator, Widget::Weather, Widget::Dictionary]
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown widget '{0}'. Supported widgets: calculator, weather, dictionary.")]
pub struct ParseWidgetError(pub String);

impl TryFrom<&str> for Widget {
    type Error = ParseWidgetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "calculator" | "calc" => Ok(Widget::Calculator),
            "weather" => Ok(Widget::Weather),
            "dictionary" | "dict" => Ok(Widget::Dictionary),
            _ => Err(ParseWidgetError(value.to_string())),
        }
    }
}

/// Colour scheme preference. The weather page calls these day and night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[serde(alias = "day")]
    Light,
    #[default]
    #[serde(alias = "night")]
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

    /// Name of the theme as shown by a given widget.
    pub fn label_for(&self, widget: Widget) -> &'static str {
        match (widget, self) {
            (Widget::Weather, Theme::Light) => "day",
            (Widget::Weather, Theme::Dark) => "night",
            _ => self.as_str(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown theme '{0}'. Use light/day or dark/night.")]
pub struct ParseThemeError(pub String);

impl TryFrom<&str> for Theme {
    type Error = ParseThemeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "light" | "day" => Ok(Theme::Light),
            "dark" | "night" => Ok(Theme::Dark),
            _ => Err(ParseThemeError(value.to_string())),
        }
    }
}
