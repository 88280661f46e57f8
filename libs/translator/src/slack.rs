//! Helpers for translating [`PostRecord`] instances into Slack block payloads.

use crate::telemetry::translate_with_span;
use serde_json::{Value, json};
use sprout_relay_core::PostRecord;

pub const MAX_POST_TEXT_CHARS: usize = 500;
pub const NO_TEXT_PLACEHOLDER: &str = "_No text content_";
pub const GENERIC_ICON: &str = "📣";

const NETWORK_ICONS: [(&str, &str); 5] = [
    ("twitter", "🐦"),
    ("x", "𝕏"),
    ("instagram", "📸"),
    ("facebook", "📘"),
    ("linkedin", "💼"),
];

/// Icon for a network name, matched case-insensitively.
///
/// ```
/// use sprout_relay_translator::network_icon;
///
/// assert_eq!(network_icon("LinkedIn"), "💼");
/// assert_eq!(network_icon("Mastodon"), "📣");
/// ```
pub fn network_icon(network: &str) -> &'static str {
    NETWORK_ICONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(network))
        .map(|(_, icon)| *icon)
        .unwrap_or(GENERIC_ICON)
}

/// Prefix of `text` holding at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Builds the notification for one post. Always succeeds.
pub fn to_slack_payload(record: &PostRecord) -> Value {
    translate_with_span(record, "slack", || {
        let title = format!(
            "{} New {} Post",
            network_icon(&record.network),
            record.network
        );
        let blocks = record_to_blocks(record, &title);
        json!({
          "text": title,
          "blocks": blocks,
        })
    })
}

fn record_to_blocks(record: &PostRecord, title: &str) -> Vec<Value> {
    let mut blocks = vec![
        json!({
          "type": "header",
          "text": { "type": "plain_text", "text": title, "emoji": true }
        }),
        section_md(&profile_line(record)),
    ];

    let content = match record.text.as_deref() {
        Some(text) if !text.is_empty() => truncate_chars(text, MAX_POST_TEXT_CHARS),
        _ => NO_TEXT_PLACEHOLDER,
    };
    blocks.push(section_md(content));

    if let Some(count) = record.media_count.filter(|count| *count > 0) {
        let noun = if count == 1 { "attachment" } else { "attachments" };
        blocks.push(json!({
          "type": "context",
          "elements": [
            { "type": "mrkdwn", "text": format!("📎 {count} media {noun}") }
          ]
        }));
    }

    if let Some(url) = record.url.as_deref().filter(|url| !url.is_empty()) {
        blocks.push(json!({
          "type": "actions",
          "elements": [{
            "type": "button",
            "text": { "type": "plain_text", "text": "View Post" },
            "url": url,
            "style": "primary"
          }]
        }));
    }

    blocks.push(json!({ "type": "divider" }));
    blocks
}

fn profile_line(record: &PostRecord) -> String {
    let mut line = format!("*Profile:* {}", record.profile_name);
    if let Some(created_at) = record.created_at.as_deref() {
        line.push_str(&format!("\n*Published:* {created_at}"));
    }
    line
}

fn section_md(text: &str) -> Value {
    json!({
      "type": "section",
      "text": { "type": "mrkdwn", "text": text }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PostRecord {
        PostRecord {
            network: "Twitter".into(),
            url: Some("http://x".into()),
            text: Some("hi".into()),
            profile_name: "Acme".into(),
            created_at: None,
            media_count: None,
        }
    }

    fn blocks(payload: &Value) -> &Vec<Value> {
        payload["blocks"].as_array().unwrap()
    }

    fn block_types(payload: &Value) -> Vec<&str> {
        blocks(payload)
            .iter()
            .map(|b| b["type"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn full_record_renders_all_blocks_in_order() {
        let mut rec = record();
        rec.media_count = Some(3);
        let payload = to_slack_payload(&rec);
        assert_eq!(
            block_types(&payload),
            vec!["header", "section", "section", "context", "actions", "divider"]
        );
        assert_eq!(payload["text"], "🐦 New Twitter Post");
        assert_eq!(blocks(&payload)[0]["text"]["text"], "🐦 New Twitter Post");
        assert_eq!(blocks(&payload)[1]["text"]["text"], "*Profile:* Acme");
        assert_eq!(blocks(&payload)[2]["text"]["text"], "hi");
        assert_eq!(
            blocks(&payload)[3]["elements"][0]["text"],
            "📎 3 media attachments"
        );
    }

    #[test]
    fn missing_text_uses_placeholder() {
        for text in [None, Some(String::new())] {
            let mut rec = record();
            rec.text = text;
            let payload = to_slack_payload(&rec);
            assert_eq!(blocks(&payload)[2]["text"]["text"], NO_TEXT_PLACEHOLDER);
        }
    }

    #[test]
    fn long_text_is_cut_to_exactly_500_chars() {
        let mut rec = record();
        rec.text = Some("é".repeat(600));
        let payload = to_slack_payload(&rec);
        let rendered = blocks(&payload)[2]["text"]["text"].as_str().unwrap();
        assert_eq!(rendered.chars().count(), 500);

        rec.text = Some("a".repeat(500));
        let payload = to_slack_payload(&rec);
        let rendered = blocks(&payload)[2]["text"]["text"].as_str().unwrap();
        assert_eq!(rendered.len(), 500);
    }

    #[test]
    fn icon_lookup_ignores_case_and_falls_back() {
        assert_eq!(network_icon("twitter"), "🐦");
        assert_eq!(network_icon("TWITTER"), "🐦");
        assert_eq!(network_icon("X"), "𝕏");
        assert_eq!(network_icon("instagram"), "📸");
        assert_eq!(network_icon("Facebook"), "📘");
        assert_eq!(network_icon("linkedin"), "💼");
        assert_eq!(network_icon("TikTok"), GENERIC_ICON);
        assert_eq!(network_icon("Unknown"), GENERIC_ICON);
        assert_eq!(network_icon(""), GENERIC_ICON);
    }

    #[test]
    fn button_only_when_url_present() {
        let payload = to_slack_payload(&record());
        let actions: Vec<_> = blocks(&payload)
            .iter()
            .filter(|b| b["type"] == "actions")
            .collect();
        assert_eq!(actions.len(), 1);
        let elements = actions[0]["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0]["type"], "button");
        assert_eq!(elements[0]["url"], "http://x");
        assert_eq!(elements[0]["style"], "primary");

        for url in [None, Some(String::new())] {
            let mut rec = record();
            rec.url = url;
            let payload = to_slack_payload(&rec);
            assert!(!block_types(&payload).contains(&"actions"));
        }
    }

    #[test]
    fn media_note_needs_a_non_empty_list() {
        for media in [None, Some(0)] {
            let mut rec = record();
            rec.media_count = media;
            assert!(!block_types(&to_slack_payload(&rec)).contains(&"context"));
        }
        let mut rec = record();
        rec.media_count = Some(1);
        let payload = to_slack_payload(&rec);
        assert_eq!(blocks(&payload)[3]["elements"][0]["text"], "📎 1 media attachment");
    }

    #[test]
    fn published_timestamp_joins_profile_section() {
        let mut rec = record();
        rec.created_at = Some("2024-05-01T09:30:00Z".into());
        let payload = to_slack_payload(&rec);
        assert_eq!(
            blocks(&payload)[1]["text"]["text"],
            "*Profile:* Acme\n*Published:* 2024-05-01T09:30:00Z"
        );
    }

    #[test]
    fn empty_record_is_still_well_formed() {
        let payload = to_slack_payload(&PostRecord::default());
        assert_eq!(
            block_types(&payload),
            vec!["header", "section", "section", "divider"]
        );
        assert_eq!(blocks(&payload)[0]["text"]["text"], "📣 New Unknown Post");
        assert_eq!(blocks(&payload)[1]["text"]["text"], "*Profile:* ");
    }

    #[test]
    fn truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 3), "");
    }
}
