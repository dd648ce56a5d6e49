//! `ChatPlatform` implementation over the Slack Web API.

use super::SlackClient;
use crate::types::{
    self, AuthTestResponse, ConversationsOpenResponse, PostMessageResponse, SearchResponse,
};
use async_trait::async_trait;
use recap_core::{error::RecapError, mention::Mention, traits::ChatPlatform};
use tracing::{debug, warn};

#[async_trait]
impl ChatPlatform for SlackClient {
    fn name(&self) -> &str {
        "slack"
    }

    async fn identity(&self) -> Result<String, RecapError> {
        let url = format!("{}/auth.test", self.base_url);
        debug!("slack: POST auth.test");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.user_token)
            .send()
            .await
            .map_err(|e| RecapError::Auth(format!("auth.test request failed: {e}")))?;

        let body: AuthTestResponse = resp
            .json()
            .await
            .map_err(|e| RecapError::Auth(format!("auth.test: failed to parse response: {e}")))?;

        if !body.ok {
            return Err(RecapError::Auth(format!(
                "auth.test returned: {}",
                body.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        body.user_id
            .ok_or_else(|| RecapError::Auth("auth.test: response missing user_id".to_string()))
    }

    async fn search_mentions(&self, user_id: &str) -> Result<Vec<Mention>, RecapError> {
        let url = format!("{}/search.messages", self.base_url);
        let query = format!("<@{user_id}>");
        let count = self.config.search_count.to_string();
        debug!("slack: GET search.messages query={query}");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.config.user_token)
            .query(&[
                ("query", query.as_str()),
                ("sort", "timestamp"),
                ("sort_dir", "desc"),
                ("count", count.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RecapError::Collection(format!("search.messages request failed: {e}")))?;

        let body: SearchResponse = resp.json().await.map_err(|e| {
            RecapError::Collection(format!("search.messages: failed to parse response: {e}"))
        })?;

        if !body.ok {
            return Err(RecapError::Collection(format!(
                "search.messages returned: {}",
                body.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        let matches = body.messages.unwrap_or_default().matches;
        if matches.len() as u32 >= self.config.search_count {
            // Single page only: anything older in the window is dropped.
            warn!(
                "search.messages returned a full page ({}); older in-window mentions may be missing",
                matches.len()
            );
        }

        Ok(matches.into_iter().filter_map(types::to_mention).collect())
    }

    async fn open_dm(&self, user_id: &str) -> Result<String, RecapError> {
        let url = format!("{}/conversations.open", self.base_url);
        let body = serde_json::json!({ "users": user_id });
        debug!("slack: POST conversations.open users={user_id}");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.user_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecapError::Delivery(format!("conversations.open request failed: {e}")))?;

        let parsed: ConversationsOpenResponse = resp.json().await.map_err(|e| {
            RecapError::Delivery(format!("conversations.open: failed to parse response: {e}"))
        })?;

        if !parsed.ok {
            return Err(RecapError::Delivery(format!(
                "conversations.open returned: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        parsed
            .channel
            .map(|c| c.id)
            .ok_or_else(|| RecapError::Delivery("conversations.open: response missing channel".to_string()))
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), RecapError> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let body = serde_json::json!({
            "channel": channel_id,
            "text": text,
            "mrkdwn": true,
            "unfurl_links": false,
            "unfurl_media": false,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.user_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecapError::Delivery(format!("chat.postMessage request failed: {e}")))?;

        let parsed: PostMessageResponse = resp.json().await.map_err(|e| {
            RecapError::Delivery(format!("chat.postMessage: failed to parse response: {e}"))
        })?;

        if !parsed.ok {
            return Err(RecapError::Delivery(format!(
                "chat.postMessage returned: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(())
    }
}
