use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::render::DEFAULT_COMPILE_URL;

/// Runtime configuration loaded from environment variables (and `.env`).
/// Fails at startup if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    /// Unset means company research runs without web search.
    pub tavily_api_key: Option<String>,
    pub latex_compile_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            anthropic_api_key: require(get("ANTHROPIC_API_KEY"), "ANTHROPIC_API_KEY")?,
            llm_model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tavily_api_key: get("TAVILY_API_KEY"),
            latex_compile_url: get("LATEX_COMPILE_URL")
                .unwrap_or_else(|| DEFAULT_COMPILE_URL.to_string()),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require(value: Option<String>, key: &str) -> Result<String> {
    value.with_context(|| format!("Required environment variable '{key}' is not set"))
}
