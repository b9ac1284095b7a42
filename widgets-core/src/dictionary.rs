//! Dictionary lookup: word validation and provider abstraction.

use std::{fmt::Debug, sync::LazyLock};

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::model::DictionaryEntry;

pub mod dictionaryapi;

pub use dictionaryapi::DictionaryApiProvider;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z'\-]+$").expect("word pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordInputError {
    #[error("Please enter a word.")]
    Empty,
    #[error("Invalid input. Use letters, apostrophe (') or hyphen (-) only.")]
    InvalidCharacters,
}

pub fn normalize_word(raw: &str) -> &str {
    raw.trim()
}

/// Accepts words like `don't` or `mother-in-law`.
pub fn validate_word(raw: &str) -> Result<&str, WordInputError> {
    let word = normalize_word(raw);
    if word.is_empty() {
        return Err(WordInputError::Empty);
    }
    if !WORD_PATTERN.is_match(word) {
        return Err(WordInputError::InvalidCharacters);
    }

    Ok(word)
}

#[async_trait]
pub trait DictionaryProvider: Send + Sync + Debug {
    /// All entries for a word. Never returns an empty list.
    async fn lookup(&self, word: &str) -> anyhow::Result<Vec<DictionaryEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_apostrophes_and_hyphens() {
        assert_eq!(validate_word("  don't "), Ok("don't"));
        assert_eq!(validate_word("mother-in-law"), Ok("mother-in-law"));
    }

    #[test]
    fn rejects_empty_and_invalid() {
        assert_eq!(validate_word(" \t"), Err(WordInputError::Empty));
        assert_eq!(validate_word("two words"), Err(WordInputError::InvalidCharacters));
        assert_eq!(validate_word("café"), Err(WordInputError::InvalidCharacters));
        assert_eq!(WordInputError::Empty.to_string(), "Please enter a word.");
    }
}
