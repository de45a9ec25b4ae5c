// src/config.rs

use std::env;

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LLM_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LLM_MAX_TOOL_ROUNDS: usize = 4;

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// API key for the hosted text-generation service. Never logged.
    pub llm_api_key: String,
    /// Model identifier, e.g. `gemini-2.0-flash`
    pub llm_model: String,
    /// Base URL of the generation API (without trailing slash)
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_temperature: Option<f32>,
    /// Upper bound on model -> tool -> model round trips in one generation
    pub llm_max_tool_rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            llm_api_key: String::new(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            llm_temperature: None,
            llm_max_tool_rounds: DEFAULT_LLM_MAX_TOOL_ROUNDS,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("GEMINI_API_KEY must be set")?;

        let llm_base_url = lookup("LLM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        Url::parse(&llm_base_url).context("LLM_BASE_URL must be a valid URL")?;
        let llm_base_url = llm_base_url.trim_end_matches('/').to_string();

        let llm_temperature = match lookup("LLM_TEMPERATURE") {
            Some(raw) => Some(
                raw.parse::<f32>()
                    .context("LLM_TEMPERATURE must be a valid number")?,
            ),
            None => None,
        };

        let llm_max_tool_rounds: usize = lookup("LLM_MAX_TOOL_ROUNDS")
            .unwrap_or_else(|| DEFAULT_LLM_MAX_TOOL_ROUNDS.to_string())
            .parse()
            .context("LLM_MAX_TOOL_ROUNDS must be a valid number")?;
        if llm_max_tool_rounds == 0 {
            anyhow::bail!("LLM_MAX_TOOL_ROUNDS must be at least 1");
        }

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid number")?,

            llm_api_key,
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_base_url,
            llm_timeout_secs: lookup("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| DEFAULT_LLM_TIMEOUT_SECS.to_string())
                .parse()
                .context("LLM_TIMEOUT_SECS must be a valid number")?,
            llm_temperature,
            llm_max_tool_rounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm_max_tool_rounds, DEFAULT_LLM_MAX_TOOL_ROUNDS);
        assert!(config.llm_temperature.is_none());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("PORT", "9000"),
            ("LLM_BASE_URL", "http://127.0.0.1:1234/"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_MAX_TOOL_ROUNDS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.llm_base_url, "http://127.0.0.1:1234");
        assert_eq!(config.llm_temperature, Some(0.2));
        assert_eq!(config.llm_max_tool_rounds, 2);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k"), ("PORT", "x")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k"), ("LLM_BASE_URL", "nope")]))
                .is_err()
        );
        assert!(Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("LLM_MAX_TOOL_ROUNDS", "0")
        ]))
        .is_err());
    }
}
