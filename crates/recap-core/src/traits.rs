use crate::{error::RecapError, mention::Mention};
use async_trait::async_trait;

/// Chat platform seam — identity, mention search, and DM delivery.
///
/// The production implementation talks to the Slack Web API; tests
/// substitute fakes with call counters.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Human-readable platform name.
    fn name(&self) -> &str;

    /// Resolve the caller's own account id.
    async fn identity(&self) -> Result<String, RecapError>;

    /// One search page of messages mentioning `user_id`, newest first.
    /// Window filtering happens in the pipeline, not here.
    async fn search_mentions(&self, user_id: &str) -> Result<Vec<Mention>, RecapError>;

    /// Open (or reuse) a DM channel with `user_id`; returns the channel id.
    async fn open_dm(&self, user_id: &str) -> Result<String, RecapError>;

    /// Send one message into a channel, with link previews disabled.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), RecapError>;
}

/// LLM provider seam — one prompt in, one completion out.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Send a single user-role prompt and return the completion text.
    async fn complete(&self, prompt: &str) -> Result<String, RecapError>;

    /// Check if the provider is ready (credentials present, etc).
    async fn is_available(&self) -> bool;
}
