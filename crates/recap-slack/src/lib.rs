//! Slack Web API platform client.
//!
//! Uses a user-scoped token (xoxp-) so `search.messages` covers every
//! channel the account can see and the self-DM opens under the caller's
//! own identity. Docs: <https://api.slack.com/methods>

mod platform;
pub(crate) mod types;


use recap_core::config::SlackConfig;

const SLACK_API_URL: &str = "https://slack.com/api";

/// Slack Web API client holding the user token for one run.
pub struct SlackClient {
    config: SlackConfig,
    client: reqwest::Client,
    base_url: String,
}

impl SlackClient {
    /// Create a new Slack client from config.
    pub fn new(config: SlackConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            base_url: SLACK_API_URL.to_string(),
        }
    }
}
