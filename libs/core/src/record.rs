//! Inbound post records and the alias tables used to read them.
//!
//! Neither the webhook payload nor the published-posts API has a schema we can
//! rely on, so every field is looked up through an ordered list of candidate
//! keys. The first candidate holding a non-empty value wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_NETWORK: &str = "Unknown";

/// Ordered candidate keys for each field of a [`PostRecord`].
///
/// A key containing dots (`profile.name`) walks nested objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    pub network: Vec<String>,
    pub url: Vec<String>,
    pub text: Vec<String>,
    pub profile_name: Vec<String>,
    pub created_at: Vec<String>,
    pub media: Vec<String>,
}

impl FieldAliases {
    /// Keys sent by the platform's push webhook.
    pub fn webhook() -> Self {
        Self {
            network: keys(&["network"]),
            url: keys(&["post_url"]),
            text: keys(&["post_text"]),
            profile_name: keys(&["profile_name"]),
            created_at: keys(&["created_at"]),
            media: keys(&["media"]),
        }
    }

    /// Keys seen on records returned by the published-posts endpoint.
    pub fn polled() -> Self {
        Self {
            network: keys(&["network_type", "network"]),
            url: keys(&["url", "permalink"]),
            text: keys(&["text", "content"]),
            profile_name: keys(&["profile_name", "profile.name"]),
            created_at: keys(&["created_at", "published_at"]),
            media: keys(&["media"]),
        }
    }
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| (*k).to_string()).collect()
}

/// One post, normalized from whichever source delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub network: String,
    pub url: Option<String>,
    pub text: Option<String>,
    pub profile_name: String,
    pub created_at: Option<String>,
    /// Number of media attachments; `None` when no list was supplied.
    pub media_count: Option<usize>,
}

impl Default for PostRecord {
    fn default() -> Self {
        Self {
            network: UNKNOWN_NETWORK.to_string(),
            url: None,
            text: None,
            profile_name: String::new(),
            created_at: None,
            media_count: None,
        }
    }
}

impl PostRecord {
    /// Reads a record out of arbitrary JSON. Never fails: anything missing or
    /// of the wrong shape falls back to the defaults.
    ///
    /// ```
    /// use serde_json::json;
    /// use sprout_relay_core::{FieldAliases, PostRecord};
    ///
    /// let record = PostRecord::from_value(
    ///     &json!({"network_type": "LinkedIn", "permalink": "https://lnkd.in/p/1"}),
    ///     &FieldAliases::polled(),
    /// );
    /// assert_eq!(record.network, "LinkedIn");
    /// assert_eq!(record.url.as_deref(), Some("https://lnkd.in/p/1"));
    /// assert!(record.text.is_none());
    /// ```
    pub fn from_value(value: &Value, aliases: &FieldAliases) -> Self {
        Self {
            network: first_text(value, &aliases.network)
                .map(|network| network.trim().to_string())
                .filter(|network| !network.is_empty())
                .unwrap_or_else(|| UNKNOWN_NETWORK.to_string()),
            url: first_text(value, &aliases.url),
            text: first_text(value, &aliases.text),
            profile_name: first_text(value, &aliases.profile_name).unwrap_or_default(),
            created_at: first_text(value, &aliases.created_at),
            media_count: first_list_len(value, &aliases.media),
        }
    }
}

/// Resolves a dotted path against nested JSON objects.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

fn first_text(value: &Value, aliases: &[String]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|alias| lookup_path(value, alias))
        .find_map(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_list_len(value: &Value, aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .filter_map(|alias| lookup_path(value, alias))
        .find_map(|candidate| candidate.as_array().map(Vec::len))
}
