//! The one-shot triage pipeline: identity → collection → triage → delivery.
//!
//! Strictly linear and synchronous; each stage feeds the next, and no stage
//! runs twice in one invocation. Only identity and delivery failures abort
//! the run. A failed search degrades to an empty mention list and a failed
//! triage call degrades to a fallback report, so the caller still receives
//! a DM for those runs.

use chrono::{Local, Utc};
use recap_core::{
    chunk,
    config::Config,
    error::RecapError,
    mention::{self, Mention},
    report,
    traits::{ChatPlatform, Provider},
};
use tracing::{debug, error, info, warn};

/// Outcome of one successful run.
#[derive(Debug)]
pub struct RunReport {
    pub mentions: usize,
    pub messages_sent: usize,
}

/// Drive one full pipeline run against live clocks.
pub async fn run(
    platform: &dyn ChatPlatform,
    provider: &dyn Provider,
    config: &Config,
) -> Result<RunReport, RecapError> {
    info!("resolving caller identity via {}", platform.name());
    let user_id = platform.identity().await?;
    info!("caller id: {user_id}");

    info!("collecting mentions from the last {}h", mention::WINDOW_HOURS);
    let oldest = mention::oldest_allowed(Utc::now().timestamp() as f64);
    let mentions = collect_mentions(platform, &user_id, oldest).await;
    info!("{} mention(s) inside the window", mentions.len());

    info!("triaging with {}", provider.name());
    let report_text = triage(provider, &mentions, config).await;

    info!("delivering triage report");
    let messages_sent =
        deliver(platform, &user_id, &report_text, config.slack.max_message_len).await?;
    info!("delivered {messages_sent} message(s)");

    Ok(RunReport {
        mentions: mentions.len(),
        messages_sent,
    })
}

/// One search page, filtered to the trailing window.
///
/// Search failures are logged and flattened to an empty list rather than
/// aborting the run; the caller is still told "no mentions".
pub async fn collect_mentions(
    platform: &dyn ChatPlatform,
    user_id: &str,
    oldest_allowed: f64,
) -> Vec<Mention> {
    match platform.search_mentions(user_id).await {
        Ok(found) => found
            .into_iter()
            .filter(|m| m.in_window(oldest_allowed))
            .collect(),
        Err(e) => {
            warn!("mention search failed, continuing with empty set: {e}");
            Vec::new()
        }
    }
}

/// Build the triage prompt and ask the provider for a categorized report.
///
/// An empty mention list short-circuits to the fixed no-mentions report
/// without touching the provider.
pub async fn triage(provider: &dyn Provider, mentions: &[Mention], config: &Config) -> String {
    if mentions.is_empty() {
        return report::NO_MENTIONS.to_string();
    }

    let prompt = report::triage_prompt(
        mentions,
        &config.recap.language,
        config.slack.include_permalinks,
    );

    match provider.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("triage call failed, falling back to failure notice: {e}");
            report::ANALYSIS_FAILED.to_string()
        }
    }
}

/// Open the self-DM and send the report, chunked to the message budget.
///
/// Sends are sequential. The first failure stops the run with the remaining
/// buffers unsent; already-sent buffers are not rolled back.
pub async fn deliver(
    platform: &dyn ChatPlatform,
    user_id: &str,
    report_text: &str,
    max_message_len: usize,
) -> Result<usize, RecapError> {
    let channel_id = platform.open_dm(user_id).await?;

    let header = report::header(Local::now());
    let messages = chunk::outbound_messages(&header, report_text, max_message_len);
    let total = messages.len();

    for (i, message) in messages.iter().enumerate() {
        if let Err(e) = platform.post_message(&channel_id, message).await {
            error!("send {}/{} failed, stopping delivery: {e}", i + 1, total);
            return Err(e);
        }
        debug!("sent message {}/{}", i + 1, total);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use recap_core::report::{ANALYSIS_FAILED, NO_MENTIONS};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn mention_at(ts: f64, author: &str) -> Mention {
        Mention {
            text: format!("ping from {author}"),
            author: author.into(),
            channel: "general".into(),
            timestamp: ts,
            permalink: String::new(),
        }
    }

    #[derive(Default)]
    struct FakePlatform {
        fail_identity: bool,
        fail_search: bool,
        mentions: Vec<Mention>,
        /// Fail `post_message` once this many sends have succeeded.
        fail_post_after: Option<usize>,
        search_calls: AtomicUsize,
        open_calls: AtomicUsize,
        posted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatPlatform for FakePlatform {
        fn name(&self) -> &str {
            "fake"
        }

        async fn identity(&self) -> Result<String, RecapError> {
            if self.fail_identity {
                return Err(RecapError::Auth("invalid_auth".into()));
            }
            Ok("U123".into())
        }

        async fn search_mentions(&self, _user_id: &str) -> Result<Vec<Mention>, RecapError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_search {
                return Err(RecapError::Collection("search_unavailable".into()));
            }
            Ok(self.mentions.clone())
        }

        async fn open_dm(&self, _user_id: &str) -> Result<String, RecapError> {
            self.open_calls.fetch_add(1, Ordering::SeqCst);
            Ok("D456".into())
        }

        async fn post_message(&self, _channel_id: &str, text: &str) -> Result<(), RecapError> {
            let mut posted = self.posted.lock().unwrap();
            if let Some(limit) = self.fail_post_after {
                if posted.len() >= limit {
                    return Err(RecapError::Delivery("msg_too_long".into()));
                }
            }
            posted.push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeProvider {
        calls: AtomicUsize,
        fail: bool,
        available: bool,
    }

    #[async_trait]
    impl Provider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, RecapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RecapError::Analysis("overloaded".into()));
            }
            Ok("*Urgent*\n\u{2022} review PR (alice / #general)".into())
        }

        async fn is_available(&self) -> bool {
            self.available
        }
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_before_any_downstream_call() {
        let platform = FakePlatform {
            fail_identity: true,
            ..Default::default()
        };
        let provider = FakeProvider::default();

        let result = run(&platform, &provider, &Config::default()).await;
        assert!(matches!(result, Err(RecapError::Auth(_))));
        assert_eq!(platform.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(platform.open_calls.load(Ordering::SeqCst), 0);
        assert!(platform.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_window_filter_keeps_order_and_drops_stale() {
        let now = 1_700_000_000.0;
        let oldest = mention::oldest_allowed(now);
        let platform = FakePlatform {
            // Newest first, as the platform sorts: three within 20h, one 25h old.
            mentions: vec![
                mention_at(now - 3600.0, "alice"),
                mention_at(now - 36_000.0, "bob"),
                mention_at(now - 72_000.0, "carol"),
                mention_at(now - 90_000.0, "dave"),
            ],
            ..Default::default()
        };

        let collected = collect_mentions(&platform, "U123", oldest).await;
        let authors: Vec<&str> = collected.iter().map(|m| m.author.as_str()).collect();
        assert_eq!(authors, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_empty() {
        let platform = FakePlatform {
            fail_search: true,
            ..Default::default()
        };
        let collected = collect_mentions(&platform, "U123", 0.0).await;
        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn test_empty_mentions_skip_the_provider() {
        let provider = FakeProvider::default();
        let text = triage(&provider, &[], &Config::default()).await;
        assert_eq!(text, NO_MENTIONS);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_still_delivers_notice() {
        let platform = FakePlatform {
            mentions: vec![mention_at(f64::MAX / 2.0, "alice")],
            ..Default::default()
        };
        let provider = FakeProvider {
            fail: true,
            ..Default::default()
        };

        let outcome = run(&platform, &provider, &Config::default()).await.unwrap();
        assert_eq!(outcome.messages_sent, 1);

        let posted = platform.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        assert!(posted[0].ends_with(ANALYSIS_FAILED));
    }

    #[tokio::test]
    async fn test_unavailable_provider_does_not_block_the_run() {
        // Missing credentials surface as an auth failure at the completion
        // endpoint, not as a pre-run gate; the failure notice is still DM'd.
        let platform = FakePlatform {
            mentions: vec![mention_at(f64::MAX / 2.0, "alice")],
            ..Default::default()
        };
        let provider = FakeProvider {
            fail: true,
            available: false,
            ..Default::default()
        };
        assert!(!provider.is_available().await);

        let outcome = run(&platform, &provider, &Config::default()).await.unwrap();
        assert_eq!(outcome.messages_sent, 1);

        let posted = platform.posted.lock().unwrap();
        assert!(posted[0].ends_with(ANALYSIS_FAILED));
    }

    #[tokio::test]
    async fn test_full_run_sends_single_report() {
        let platform = FakePlatform {
            mentions: vec![mention_at(f64::MAX / 2.0, "alice")],
            ..Default::default()
        };
        let provider = FakeProvider::default();

        let outcome = run(&platform, &provider, &Config::default()).await.unwrap();
        assert_eq!(outcome.mentions, 1);
        assert_eq!(outcome.messages_sent, 1);
        assert_eq!(platform.open_calls.load(Ordering::SeqCst), 1);

        let posted = platform.posted.lock().unwrap();
        assert!(posted[0].contains("Mention triage report"));
        assert!(posted[0].contains("review PR"));
    }

    #[tokio::test]
    async fn test_long_report_is_chunked_with_markers() {
        let platform = FakePlatform::default();
        let report_text = (0..5)
            .map(|_| "a".repeat(2000))
            .collect::<Vec<_>>()
            .join("\n\n");

        let sent = deliver(&platform, "U123", &report_text, 3900).await.unwrap();
        assert_eq!(sent, 5);

        let posted = platform.posted.lock().unwrap();
        assert!(posted[0].contains("Mention triage report"));
        assert!(!posted[0].starts_with("(continued"));
        for (i, msg) in posted.iter().enumerate().skip(1) {
            assert!(msg.starts_with(&format!("(continued {}/5)\n\n", i + 1)));
        }
    }

    #[tokio::test]
    async fn test_send_failure_stops_remaining_buffers() {
        let platform = FakePlatform {
            fail_post_after: Some(1),
            ..Default::default()
        };
        let report_text = (0..5)
            .map(|_| "b".repeat(2000))
            .collect::<Vec<_>>()
            .join("\n\n");

        let result = deliver(&platform, "U123", &report_text, 3900).await;
        assert!(matches!(result, Err(RecapError::Delivery(_))));
        assert_eq!(platform.posted.lock().unwrap().len(), 1);
    }
}
