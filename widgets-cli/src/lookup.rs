use anyhow::Context;
use chrono::Local;
use tracing::info;
use widgets_core::{
    Config, CurrentWeather, DictionaryEntry, DictionaryProvider, ForecastEntry, Place,
    WeatherProvider,
    dictionary::{self, DictionaryApiProvider},
    weather::{self, OpenWeatherProvider},
};

pub async fn weather(city: &str, first: bool) -> anyhow::Result<()> {
    let city = weather::validate_city(city)?;
    let cfg = Config::load()?;
    let provider = OpenWeatherProvider::new(cfg.openweather_api_key()?);

    info!(city, "searching location");
    let places = provider.geocode(city).await?;
    let place = choose_place(places, first)?;

    info!(place = %place.label(), "loading weather");
    let (current, forecast) =
        tokio::try_join!(provider.current(&place), provider.forecast(&place))?;

    print_current(&current, &place);
    print_forecast(&weather::pick_daily(&forecast));
    Ok(())
}

pub async fn define(word: &str) -> anyhow::Result<()> {
    let word = dictionary::validate_word(word)?;
    let provider = DictionaryApiProvider::new();

    info!(word, "looking up word");
    let entries = provider.lookup(word).await.context("Failed")?;

    for entry in &entries {
        print_entry(entry);
    }
    Ok(())
}

fn choose_place(mut places: Vec<Place>, first: bool) -> anyhow::Result<Place> {
    if places.is_empty() {
        anyhow::bail!("Location not found. Check spelling.");
    }
    if first || places.len() == 1 {
        return Ok(places.swap_remove(0));
    }

    let labels: Vec<String> = places.iter().map(Place::label).collect();
    let choice = inquire::Select::new("Which place?", labels)
        .raw_prompt()
        .context("Failed to read place selection")?;

    Ok(places.swap_remove(choice.index))
}

fn whole_degrees(t: f64) -> i64 {
    (t + 0.5).floor() as i64
}

fn print_current(current: &CurrentWeather, place: &Place) {
    let state = place.state.as_deref().filter(|s| !s.is_empty());
    match state {
        Some(state) => println!("{}, {}", current.location_name, state),
        None => println!("{}", current.location_name),
    }
    if !current.country.is_empty() {
        println!("Country: {}", current.country);
    }

    let icon = weather::weather_icon(current.condition_code, &current.description);
    println!("{icon}  {}", current.description);
    println!(
        "Temperature: {}°C (feels like {}°C)",
        whole_degrees(current.temperature_c),
        whole_degrees(current.feels_like_c)
    );
    println!("Humidity: {}%", current.humidity_pct);
    println!("Wind: {} m/s", current.wind_speed_mps);
}

fn print_forecast(daily: &[ForecastEntry]) {
    if daily.is_empty() {
        return;
    }

    println!();
    println!("Forecast");
    for entry in daily {
        let Some((day, date)) = weather::day_label(entry.timestamp, &Local) else {
            continue;
        };
        let icon = weather::weather_icon(entry.condition_code, &entry.description);
        println!(
            "{day:<4}{date:<8}{icon}  {:>4}°C  {}",
            whole_degrees(entry.temperature_c),
            entry.description
        );
    }
}

fn print_entry(entry: &DictionaryEntry) {
    let word = if entry.word.is_empty() { "Unknown" } else { entry.word.as_str() };
    match entry.phonetic.as_deref() {
        Some(phonetic) => println!("{word}  {phonetic}"),
        None => println!("{word}"),
    }
    if !entry.source_urls.is_empty() {
        println!("[Source available]");
    }
    if let Some(audio) = entry.audio_url() {
        println!("Pronunciation audio: {audio}");
    }

    println!("Meanings");
    for meaning in &entry.meanings {
        println!("  [{}]", meaning.part_of_speech.as_deref().unwrap_or("unknown"));
        for def in meaning.shown_definitions() {
            println!("  - {}", def.definition);
            if let Some(example) = &def.example {
                println!("      Example: {example}");
            }
        }
        if !meaning.shown_synonyms().is_empty() {
            println!("  Synonyms: {}", meaning.shown_synonyms().join(", "));
        }
        if !meaning.shown_antonyms().is_empty() {
            println!("  Antonyms: {}", meaning.shown_antonyms().join(", "));
        }
    }
    println!();
}
