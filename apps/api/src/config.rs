use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gpt2";
const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Application configuration loaded from environment variables.
///
/// The Hugging Face token is optional at startup: without it the service still
/// boots, but both generation endpoints answer 500.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_api_token: Option<String>,
    pub hf_model: String,
    pub hf_api_base: String,
    pub generation_timeout: Duration,
    pub pdf_temp_dir: PathBuf,
    /// Highest `N.` marker the formatter treats as a list item.
    pub max_list_item: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hf_api_token: optional_env("HUGGING_FACE_API_TOKEN"),
            hf_model: optional_env("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            hf_api_base: optional_env("HF_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            generation_timeout: Duration::from_secs(
                parse_env("GENERATION_TIMEOUT_SECS", 10)
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            pdf_temp_dir: optional_env("PDF_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_list_item: parse_max_list_item()?,
            port: parse_env("PORT", 8001).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `MAX_LIST_ITEM`: highest `N.` marker treated as a list item. Zero would
/// turn every numbered line into a paragraph, so it is rejected.
fn parse_max_list_item() -> Result<u32> {
    parse_positive("MAX_LIST_ITEM", 5).context("MAX_LIST_ITEM must be a positive integer")
}

fn parse_positive(key: &str, default: u32) -> Result<u32> {
    let value: u32 = parse_env(key, default)?;
    if value == 0 {
        anyhow::bail!("'{key}' must be at least 1, got 0");
    }
    Ok(value)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for '{key}'")),
        None => Ok(default),
    }
}
