use serde::{Deserialize, Serialize};

/// Trailing collection window, in hours.
pub const WINDOW_HOURS: i64 = 24;

/// One platform message that mentioned the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    /// Message text as returned by search.
    pub text: String,
    /// Display name of whoever wrote the message.
    pub author: String,
    /// Channel the message was posted in, without the leading '#'.
    pub channel: String,
    /// Epoch seconds, fractional (Slack `ts` precision).
    pub timestamp: f64,
    /// Link back to the original message; empty when the platform omits it.
    pub permalink: String,
}

impl Mention {
    /// Whether this mention falls inside the trailing window.
    pub fn in_window(&self, oldest_allowed: f64) -> bool {
        self.timestamp >= oldest_allowed
    }
}

/// Lower bound of the collection window for a run starting at `now`
/// (epoch seconds).
pub fn oldest_allowed(now: f64) -> f64 {
    now - (WINDOW_HOURS * 3600) as f64
}
