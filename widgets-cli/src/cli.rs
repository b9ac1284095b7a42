use anyhow::Context;
use clap::{Parser, Subcommand};
use widgets_core::{Config, Theme, Widget};

use crate::{calc, lookup};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "widgets", version, about = "Calculator, weather and dictionary widgets")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the calculator.
    Calc {
        /// Key sequence to evaluate instead of reading from stdin, e.g. "7+3=".
        #[arg(long)]
        keys: Option<String>,

        /// Repaint after every key instead of once per line.
        #[arg(long)]
        steps: bool,
    },

    /// Show current weather and a daily forecast for a city.
    Weather {
        /// City or province name.
        city: String,

        /// Take the first geocoding match instead of prompting.
        #[arg(long)]
        first: bool,
    },

    /// Look up a word.
    Define {
        word: String,
    },

    /// Show or change a widget's theme.
    Theme {
        /// Widget name: calculator, weather or dictionary.
        widget: String,

        /// light/day, dark/night or toggle. Omit to show the stored value.
        mode: Option<String>,
    },

    /// Store the OpenWeather API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Calc { keys, steps } => match keys {
                Some(keys) => calc::run_keys(&keys, steps),
                None => calc::repl(steps),
            },
            Command::Weather { city, first } => lookup::weather(&city, first).await,
            Command::Define { word } => lookup::define(&word).await,
            Command::Theme { widget, mode } => theme(&widget, mode.as_deref()),
            Command::Configure => configure(),
        }
    }
}

fn theme(widget: &str, mode: Option<&str>) -> anyhow::Result<()> {
    let widget = Widget::try_from(widget)?;
    let mut cfg = Config::load()?;

    let theme = match mode {
        None => cfg.theme(widget),
        Some(mode) => {
            let next = if mode.eq_ignore_ascii_case("toggle") {
                cfg.toggle_theme(widget)
            } else {
                let theme = Theme::try_from(mode)?;
                cfg.set_theme(widget, theme);
                theme
            };
            cfg.save()?;
            next
        }
    };

    println!("{widget}: {}", theme.label_for(widget));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_openweather_api_key(api_key.trim().to_string());
    cfg.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
