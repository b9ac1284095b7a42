use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::theme::{Theme, Widget};

/// Environment variable that takes precedence over the stored API key.
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Preferences stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [themes]
    /// weather = "light"
    #[serde(default)]
    pub themes: HashMap<String, Theme>,

    /// OpenWeather API key used by the weather lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweather_api_key: Option<String>,
}

impl Config {
    /// Stored theme for a widget, dark when nothing is stored.
    pub fn theme(&self, widget: Widget) -> Theme {
        self.themes.get(widget.as_str()).copied().unwrap_or_default()
    }

    pub fn set_theme(&mut self, widget: Widget, theme: Theme) {
        self.themes.insert(widget.as_str().to_string(), theme);
    }

    /// Flips the stored theme and returns the new value.
    pub fn toggle_theme(&mut self, widget: Widget) -> Theme {
        let next = self.theme(widget).toggled();
        self.set_theme(widget, next);
        next
    }

    pub fn set_openweather_api_key(&mut self, api_key: String) {
        self.openweather_api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn openweather_api_key(&self) -> Result<String> {
        self.resolve_openweather_api_key(std::env::var(OPENWEATHER_API_KEY_ENV).ok())
    }

    /// Picks `env_key` over the stored key. Blank keys count as absent.
    pub fn resolve_openweather_api_key(&self, env_key: Option<String>) -> Result<String> {
        let non_blank = |k: &String| !k.trim().is_empty();

        env_key
            .filter(non_blank)
            .or_else(|| self.openweather_api_key.clone().filter(non_blank))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `widgets configure` or set {OPENWEATHER_API_KEY_ENV}."
                )
            })
    }

    /// Load config from the platform config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "elec3", "widgets")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
