use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::model::{CurrentWeather, ForecastEntry, Place};

use super::{GEOCODE_LIMIT, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Points the client at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Body of a successful GET; non-success statuses become errors.
    async fn get_body(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = Url::parse(&format!("{}{}", self.base_url, path))
            .with_context(|| format!("Invalid OpenWeather URL for {path}"))?;
        debug!(%url, "OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({path})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather response body ({path})"))?;

        if !status.is_success() {
            return Err(request_failed(status, &body));
        }

        Ok(body)
    }

    fn coordinates(place: &Place) -> Vec<(&'static str, String)> {
        vec![
            ("lat", place.lat.to_string()),
            ("lon", place.lon.to_string()),
            ("units", "metric".to_string()),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: Option<u32>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

fn condition(weather: &[OwWeather]) -> (Option<u32>, String) {
    let first = weather.first();
    let description =
        first.map(|w| w.description.as_str()).filter(|d| !d.is_empty()).unwrap_or("N/A");

    (first.and_then(|w| w.id), description.to_string())
}

fn parse_current(body: &str, place: &Place) -> Result<CurrentWeather> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let (condition_code, description) = condition(&parsed.weather);

    let location_name = if place.name.is_empty() { parsed.name } else { place.name.clone() };
    let country = if place.country.is_empty() {
        parsed.sys.country.unwrap_or_default()
    } else {
        place.country.clone()
    };

    Ok(CurrentWeather {
        location_name,
        country,
        condition_code,
        description,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        observation_time: parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now),
    })
}

fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>> {
    let parsed: OwForecastResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather forecast JSON")?;

    Ok(parsed
        .list
        .into_iter()
        .map(|e| {
            let (condition_code, description) = condition(&e.weather);
            ForecastEntry {
                timestamp: e.dt,
                temperature_c: e.main.temp,
                condition_code,
                description,
            }
        })
        .collect())
}

fn parse_places(body: &str) -> Result<Vec<Place>> {
    let places: Vec<Place> =
        serde_json::from_str(body).context("Failed to parse OpenWeather geocoding JSON")?;

    if places.is_empty() {
        return Err(anyhow!("Location not found. Check spelling."));
    }
    Ok(places)
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, city: &str) -> Result<Vec<Place>> {
        let query = [("q", city.to_string()), ("limit", GEOCODE_LIMIT.to_string())];
        let body = self.get_body("/geo/1.0/direct", &query).await?;
        parse_places(&body)
    }

    async fn current(&self, place: &Place) -> Result<CurrentWeather> {
        let body = self.get_body("/data/2.5/weather", &Self::coordinates(place)).await?;
        parse_current(&body, place)
    }

    async fn forecast(&self, place: &Place) -> Result<Vec<ForecastEntry>> {
        let body = self.get_body("/data/2.5/forecast", &Self::coordinates(place)).await?;
        parse_forecast(&body)
    }
}

fn request_failed(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    let extra = serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| format!(" ({m})"))
        .unwrap_or_default();

    anyhow!("Request failed: {status}{extra}")
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place() -> Place {
        Place {
            name: "London".into(),
            lat: 51.5,
            lon: -0.12,
            country: "GB".into(),
            state: Some("England".into()),
        }
    }

    #[test]
    fn parses_current_weather() {
        let body = r#"{
            "name": "City of London",
            "dt": 1709294400,
            "main": {"temp": 11.6, "feels_like": 10.9, "humidity": 81},
            "weather": [{"id": 803, "description": "broken clouds"}],
            "wind": {"speed": 4.1},
            "sys": {"country": "GB"}
        }"#;

        let current = parse_current(body, &place()).expect("current should parse");
        assert_eq!(current.location_name, "London");
        assert_eq!(current.country, "GB");
        assert_eq!(current.condition_code, Some(803));
        assert_eq!(current.description, "broken clouds");
        assert_eq!(current.humidity_pct, 81);
        assert_eq!(current.observation_time.timestamp(), 1_709_294_400);
    }

    #[test]
    fn current_falls_back_to_response_location() {
        let body = r#"{"name": "Paris", "main": {"temp": 1.0}, "sys": {"country": "FR"}}"#;
        let anonymous = Place { name: String::new(), country: String::new(), ..place() };

        let current = parse_current(body, &anonymous).expect("current should parse");
        assert_eq!(current.location_name, "Paris");
        assert_eq!(current.country, "FR");
        assert_eq!(current.description, "N/A");
        assert_eq!(current.condition_code, None);
    }

    #[test]
    fn parses_forecast_list() {
        let body = r#"{"list": [
            {"dt": 1709251200, "main": {"temp": 5.2}, "weather": [{"id": 500, "description": "light rain"}]},
            {"dt": 1709262000, "main": {"temp": 6.0}, "weather": []}
        ]}"#;

        let entries = parse_forecast(body).expect("forecast should parse");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].condition_code, Some(500));
        assert_eq!(entries[1].description, "N/A");
    }

    #[test]
    fn empty_geocode_is_not_found() {
        let err = parse_places("[]").unwrap_err();
        assert_eq!(err.to_string(), "Location not found. Check spelling.");

        let places = parse_places(r#"[{"name":"Lyon","lat":45.7,"lon":4.8,"country":"FR"}]"#)
            .expect("places should parse");
        assert_eq!(places[0].label(), "Lyon, FR");
    }

    #[test]
    fn request_failed_includes_service_message() {
        let body = r#"{"cod":401,"message":"Invalid API key"}"#;
        let err = request_failed(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.to_string(), "Request failed: 401 Unauthorized (Invalid API key)");

        let err = request_failed(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.to_string(), "Request failed: 502 Bad Gateway");
    }

    #[tokio::test]
    async fn invalid_base_url_is_reported_before_sending() {
        let provider: Box<dyn WeatherProvider> =
            Box::new(OpenWeatherProvider::with_base_url("KEY".into(), "not a url"));

        let err = provider.geocode("London").await.unwrap_err();
        assert!(err.to_string().contains("Invalid OpenWeather URL"));
    }
}
