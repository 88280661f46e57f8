//! Core types shared by the Sprout relay services.
//!
//! The webhook receiver and the poller both turn loosely structured JSON into a
//! [`PostRecord`], hand it to the translator, and deliver the result through a
//! [`Notifier`]. The poller additionally talks to the upstream API through a
//! [`PostSource`] and remembers its progress in a [`CheckpointStore`].

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod notifier;
pub mod record;
pub mod upstream;

pub use checkpoint::{CheckpointStore, DEFAULT_LOOKBACK};
pub use config::{FieldAliasOverrides, FieldAliasesFile, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use notifier::{Notifier, SlackWebhookNotifier};
pub use record::{FieldAliases, PostRecord, lookup_path};
pub use upstream::{POSTS_PAGE_LIMIT, PostSource, SproutClient};
