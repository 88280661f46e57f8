use anyhow::Result;
use sprout_relay_core::RelayConfig;
use sprout_relay_telemetry::{TelemetryConfig, init_telemetry};
use sprout_relay_webhook::{AppState, router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env("sprout-relay-webhook", env!("CARGO_PKG_VERSION"));
    init_telemetry(telemetry)?;

    let config = RelayConfig::from_env()?;
    if config.slack_webhook_url.is_empty() {
        tracing::warn!("SLACK_WEBHOOK_URL is not set; deliveries will fail");
    }

    let app = router(AppState::from_config(reqwest::Client::new(), &config));
    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("sprout-relay-webhook listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    Ok(())
}
