//! Poll cycle: read the checkpoint, fetch posts published since then, relay
//! each to Slack, then advance the checkpoint.
//!
//! A cycle is meant to be triggered by an external scheduler. Delivery
//! failures are counted but never abort the batch; only a failed checkpoint
//! write fails the cycle, leaving the previous checkpoint in place.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sprout_relay_core::{
    CheckpointStore, FieldAliases, Notifier, PostRecord, PostSource, RelayResult,
};
use sprout_relay_translator::to_slack_payload;
use time::OffsetDateTime;
use tracing::{Instrument, info, warn};

const DELIVERY_COUNTER: &str = "sprout_poll_deliveries_total";

#[derive(Debug, Clone, Default)]
pub struct CycleOptions {
    /// Lower bound to use instead of the stored checkpoint.
    pub since: Option<OffsetDateTime>,
    pub persist_checkpoint: bool,
}

impl CycleOptions {
    pub fn scheduled() -> Self {
        Self {
            since: None,
            persist_checkpoint: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    #[serde(with = "time::serde::rfc3339")]
    pub since: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub until: OffsetDateTime,
    pub fetched: usize,
    pub delivered: usize,
    pub failed: usize,
    pub checkpoint_written: bool,
}

pub async fn run_cycle<S, N>(
    source: &S,
    notifier: &N,
    store: &CheckpointStore,
    fields: &FieldAliases,
    options: &CycleOptions,
) -> RelayResult<CycleReport>
where
    S: PostSource + ?Sized,
    N: Notifier + ?Sized,
{
    let since = options.since.unwrap_or_else(|| store.read());
    let until = OffsetDateTime::now_utc();
    let span = tracing::info_span!("poll.cycle", %since, %until);

    async move {
        let posts = source.published_since(since).await;
        let mut report = CycleReport {
            since,
            until,
            fetched: posts.len(),
            delivered: 0,
            failed: 0,
            checkpoint_written: false,
        };

        for post in &posts {
            if relay_post(notifier, post, fields).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }

        if options.persist_checkpoint {
            store.write(until)?;
            report.checkpoint_written = true;
        }

        info!(
            fetched = report.fetched,
            delivered = report.delivered,
            failed = report.failed,
            checkpoint_written = report.checkpoint_written,
            "poll cycle finished"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

/// Renders and delivers one raw post. Returns whether delivery succeeded.
pub async fn relay_post<N>(notifier: &N, post: &Value, fields: &FieldAliases) -> bool
where
    N: Notifier + ?Sized,
{
    let record = PostRecord::from_value(post, fields);
    let message = to_slack_payload(&record);
    match notifier.notify(&message).await {
        Ok(()) => {
            metrics::counter!(DELIVERY_COUNTER, "outcome" => "ok").increment(1);
            true
        }
        Err(err) => {
            metrics::counter!(DELIVERY_COUNTER, "outcome" => err.code()).increment(1);
            warn!(
                network = %record.network,
                profile = %record.profile_name,
                code = err.code(),
                error = %err,
                "failed to relay post"
            );
            false
        }
    }
}

/// Writes rendered payloads to `out` instead of delivering them.
///
/// The binary points this at stderr so stdout stays reserved for the report.
pub struct DryRunNotifier<W> {
    out: Mutex<W>,
}

impl<W> DryRunNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> Notifier for DryRunNotifier<W> {
    async fn notify(&self, payload: &Value) -> RelayResult<()> {
        let text = match serde_json::to_string_pretty(payload) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "failed to encode payload");
                return Ok(());
            }
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{text}") {
            warn!(error = %err, "failed to write dry-run payload");
        }
        Ok(())
    }
}
