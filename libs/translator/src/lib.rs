//! Helpers for translating inbound post records into chat payloads.
//!
//! Only Slack's block format is produced today; see [`slack::to_slack_payload`].

pub mod slack;
mod telemetry;

pub use slack::{
    GENERIC_ICON, MAX_POST_TEXT_CHARS, NO_TEXT_PLACEHOLDER, network_icon, to_slack_payload,
    truncate_chars,
};
