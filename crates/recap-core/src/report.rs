//! Triage report literals, the DM header, and the prompt template.

use crate::mention::Mention;
use chrono::{DateTime, Local};

/// Report delivered when the window held no mentions. The provider is not
/// called for this case.
pub const NO_MENTIONS: &str = "No mentions in the last 24 hours.";

/// Report delivered when the triage completion fails. Still sent, so the
/// scheduled run leaves a trace in the DM instead of going silent.
pub const ANALYSIS_FAILED: &str =
    "Mention triage failed. Check the agent logs for details.";

/// First-message header, stamped with the send time.
pub fn header(sent_at: DateTime<Local>) -> String {
    format!(
        "\u{01f4cb} Mention triage report ({})\n\n",
        sent_at.format("%Y/%m/%d %H:%M")
    )
}

/// Render one mention as a numbered block for the prompt.
fn render_mention(index: usize, mention: &Mention, include_permalink: bool) -> String {
    let mut block = format!(
        "[{}] {} in #{}\n{}",
        index + 1,
        mention.author,
        mention.channel,
        mention.text
    );
    if include_permalink && !mention.permalink.is_empty() {
        block.push('\n');
        block.push_str(&mention.permalink);
    }
    block
}

/// Assemble the full triage prompt around the rendered mentions.
///
/// The template pins the section headers, the per-item line format, the
/// bullet glyph, and a total length target so the completion chunks cleanly.
pub fn triage_prompt(mentions: &[Mention], language: &str, include_permalinks: bool) -> String {
    let mentions_text = mentions
        .iter()
        .enumerate()
        .map(|(i, m)| render_mention(i, m, include_permalinks))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "The following Slack messages mentioned me in the last 24 hours.\n\
         Treat each one as a potential task and organize them into exactly these sections:\n\
         \n\
         *\u{01f534} Urgent and important (today)*\n\
         \n\
         *\u{01f7e1} Important (this week)*\n\
         \n\
         *\u{01f7e2} Lower priority (next week or later)*\n\
         \n\
         *\u{026aa} Informational only (no action needed)*\n\
         \n\
         Write each task as a single line:\n\
         \u{02022} task summary (requester / #channel)\n\
         \n\
         Rules:\n\
         - No bold (**) or decoration outside the section headers\n\
         - One concise line per task\n\
         - Omit links; the original message can be looked up if needed\n\
         - Use \u{02022} as the only bullet glyph\n\
         - Keep the whole report under 2000 characters\n\
         - Write the report in {language}\n\
         \n\
         ---\n\
         \n\
         Mentions:\n\
         {mentions_text}\n"
    )
}
