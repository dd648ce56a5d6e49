//! Anthropic Messages API provider.
//!
//! One synchronous completion per run: the triage prompt goes in as a
//! single user-role message, the first content block comes back as the
//! report text.

use async_trait::async_trait;
use recap_core::{config::AnthropicConfig, error::RecapError, traits::Provider};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create from config values.
    pub fn from_config(config: AnthropicConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Option<Vec<AnthropicContentBlock>>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecapError> {
        let body = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!("anthropic: POST {ANTHROPIC_API_URL} model={}", self.config.model);

        let resp = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RecapError::Analysis(format!("anthropic request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(RecapError::Analysis(format!(
                "anthropic returned {status}: {text}"
            )));
        }

        let parsed: AnthropicResponse = resp.json().await.map_err(|e| {
            RecapError::Analysis(format!("anthropic: failed to parse response: {e}"))
        })?;

        parsed
            .content
            .as_ref()
            .and_then(|blocks| blocks.first())
            .map(|b| b.text.clone())
            .ok_or_else(|| RecapError::Analysis("anthropic: response had no content".to_string()))
    }

    async fn is_available(&self) -> bool {
        if self.config.api_key.is_empty() {
            warn!("anthropic: no API key configured");
            return false;
        }
        // No lightweight health endpoint; we trust the key is valid.
        true
    }
}
