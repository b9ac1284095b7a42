use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::model::DictionaryEntry;

use super::DictionaryProvider;

const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Client for the free dictionaryapi.dev service. Needs no key.
#[derive(Debug, Clone)]
pub struct DictionaryApiProvider {
    base_url: String,
    http: Client,
}

impl Default for DictionaryApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    fn word_url(&self, word: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid dictionary base URL: {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Dictionary base URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push(word);

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn parse_entries(status: StatusCode, body: &str) -> Result<Vec<DictionaryEntry>> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| "Word not found.".to_string());
        return Err(anyhow!(message));
    }

    let entries: Vec<DictionaryEntry> =
        serde_json::from_str(body).context("Failed to parse dictionary JSON")?;

    if entries.is_empty() {
        return Err(anyhow!("No results found."));
    }
    Ok(entries)
}

#[async_trait]
impl DictionaryProvider for DictionaryApiProvider {
    async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>> {
        let url = self.word_url(word)?;
        debug!(%url, "dictionary request");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to dictionaryapi.dev")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read dictionary response body")?;

        parse_entries(status, &body)
    }
}
