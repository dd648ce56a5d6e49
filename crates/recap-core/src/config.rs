use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RecapError;

/// Top-level recap configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub recap: RecapConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecapConfig {
    /// Language the triage report is written in.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Slack access and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// User-scoped token (xoxp-). The `SLACK_USER_TOKEN` env var overrides.
    #[serde(default)]
    pub user_token: String,
    /// Per-message character budget. Slack's hard cap is 40,000; staying
    /// well under keeps messages readable and avoids truncation.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
    /// Search page size. Only one page is fetched, so in-window mentions
    /// beyond this count are dropped (documented limitation).
    #[serde(default = "default_search_count")]
    pub search_count: u32,
    /// Include each mention's permalink in the triage prompt.
    #[serde(default)]
    pub include_permalinks: bool,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            user_token: String::new(),
            max_message_len: default_max_message_len(),
            search_count: default_search_count(),
            include_permalinks: false,
        }
    }
}

/// Anthropic API provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key. The `ANTHROPIC_API_KEY` env var overrides.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
    /// Output token ceiling for the triage completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

// --- Default value functions ---

fn default_language() -> String {
    "English".to_string()
}
fn default_max_message_len() -> usize {
    3900
}
fn default_search_count() -> u32 {
    100
}
fn default_anthropic_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}
fn default_max_tokens() -> u32 {
    2000
}

impl Config {
    /// Apply environment overrides for the two secrets.
    ///
    /// Missing or invalid credentials are not validated here; they surface
    /// as auth failures from the respective endpoint.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("SLACK_USER_TOKEN") {
            if !token.is_empty() {
                self.slack.user_token = token;
            }
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                self.anthropic.api_key = key;
            }
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, RecapError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!("config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| RecapError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
