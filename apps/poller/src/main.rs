use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sprout_relay_core::{
    CheckpointStore, Notifier, RelayConfig, SlackWebhookNotifier, SproutClient,
};
use sprout_relay_poller::{CycleOptions, DryRunNotifier, run_cycle};
use sprout_relay_telemetry::{TelemetryConfig, init_telemetry};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Parser, Debug)]
#[command(author, version, about = "Relay newly published Sprout posts to Slack")]
struct Cli {
    /// Checkpoint file to read and update (overrides CHECKPOINT_PATH)
    #[arg(long)]
    checkpoint: Option<PathBuf>,
    /// Fetch posts published after this RFC 3339 instant instead of the checkpoint
    #[arg(long, value_parser = parse_rfc3339)]
    since: Option<OffsetDateTime>,
    /// Print rendered messages to stderr instead of posting them; leaves the checkpoint untouched
    #[arg(long)]
    dry_run: bool,
    /// Emit the cycle report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn parse_rfc3339(raw: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map_err(|err| format!("expected RFC 3339 timestamp: {err}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = TelemetryConfig::from_env("sprout-relay-poller", env!("CARGO_PKG_VERSION"));
    init_telemetry(telemetry)?;

    let config = RelayConfig::from_env()?;
    let checkpoint_path = cli.checkpoint.unwrap_or_else(|| config.checkpoint_path.clone());
    let store = CheckpointStore::new(checkpoint_path);

    let http = reqwest::Client::new();
    let source = SproutClient::from_config(http.clone(), &config);
    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(DryRunNotifier::new(std::io::stderr()))
    } else {
        Box::new(SlackWebhookNotifier::new(http, config.slack_webhook_url.clone()))
    };

    let options = CycleOptions {
        since: cli.since,
        persist_checkpoint: !cli.dry_run,
    };
    let report = run_cycle(&source, notifier.as_ref(), &store, &config.poll_fields, &options)
        .await
        .with_context(|| format!("poll cycle failed; checkpoint {}", store.path().display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
