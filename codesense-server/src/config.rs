use anyhow::{Context, Result};
use std::env;

#[derive(Clone)]
pub struct Config {
    /// Gemini API credential. Absence does not fail startup; the service
    /// runs degraded and every /analyze call returns 503.
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub port: u16,
    /// Character cap applied to uploaded code before prompting.
    pub max_snippet_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = parse_api_key(env::var("GEMINI_API_KEY").ok());

        let model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| codesense_core::gemini::DEFAULT_MODEL.to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        let max_snippet_chars = env::var("MAX_SNIPPET_CHARS")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<usize>()
            .context("MAX_SNIPPET_CHARS must be a valid number")?;

        Ok(Config {
            gemini_api_key,
            model,
            port,
            max_snippet_chars,
        })
    }
}

/// Parse GEMINI_API_KEY from an optional string value.
///
/// Returns None if the value is missing, empty, or contains only whitespace,
/// so a blank credential degrades to the unavailable path instead of being
/// sent upstream.
pub fn parse_api_key(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
