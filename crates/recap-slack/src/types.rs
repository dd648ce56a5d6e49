//! Serde wire types for the Slack Web API responses we consume.
//!
//! Every Slack response carries `ok` plus an `error` string when `ok` is
//! false; payload fields are optional so a failed call still parses.

use recap_core::mention::Mention;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct AuthTestResponse {
    pub ok: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub ok: bool,
    #[serde(default)]
    pub messages: Option<SearchMessages>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchMessages {
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

/// One `search.messages` match. Slack omits `username`, `channel`, and
/// `permalink` in some contexts (bots, connected channels), so all of them
/// default.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchMatch {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub channel: Option<SearchChannel>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub permalink: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchChannel {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsOpenResponse {
    pub ok: bool,
    #[serde(default)]
    pub channel: Option<OpenedChannel>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenedChannel {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Convert a search match into a [`Mention`], substituting the documented
/// defaults for missing fields. A match with an unparsable `ts` is dropped
/// with a warning rather than failing the whole page.
pub(crate) fn to_mention(m: SearchMatch) -> Option<Mention> {
    let timestamp = match m.ts.parse::<f64>() {
        Ok(ts) => ts,
        Err(_) => {
            warn!("search.messages: skipping match with unparsable ts {:?}", m.ts);
            return None;
        }
    };

    Some(Mention {
        text: m.text,
        author: m.username.unwrap_or_else(|| "Unknown User".to_string()),
        channel: m
            .channel
            .and_then(|c| c.name)
            .unwrap_or_else(|| "Unknown Channel".to_string()),
        timestamp,
        permalink: m.permalink.unwrap_or_default(),
    })
}
