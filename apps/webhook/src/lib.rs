//! Sprout publishing webhook receiver.
//!
//! Exposes `GET /` for liveness and `POST /sprout-webhook`, which renders the
//! pushed post into a Slack block message and delivers it synchronously. The
//! response mirrors the delivery outcome.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use sprout_relay_core::{FieldAliases, Notifier, PostRecord, RelayConfig, SlackWebhookNotifier};
use sprout_relay_translator::to_slack_payload;
use tracing::Instrument;

pub const WEBHOOK_PATH: &str = "/sprout-webhook";
const DELIVERY_COUNTER: &str = "sprout_webhook_deliveries_total";

#[derive(Clone)]
pub struct AppState {
    notifier: Arc<dyn Notifier>,
    fields: Arc<FieldAliases>,
}

impl AppState {
    pub fn new(notifier: Arc<dyn Notifier>, fields: FieldAliases) -> Self {
        Self {
            notifier,
            fields: Arc::new(fields),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &RelayConfig) -> Self {
        let notifier = SlackWebhookNotifier::new(http, config.slack_webhook_url.clone());
        Self::new(Arc::new(notifier), config.webhook_fields.clone())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route(WEBHOOK_PATH, post(handle_post))
        .with_state(state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Running")
}

// The body is read as raw bytes so a missing or wrong content-type header
// does not reject the request.
async fn handle_post(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, "sprout webhook body is not JSON");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid JSON body: {error}"),
            );
        }
    };

    let record = PostRecord::from_value(&payload, &state.fields);
    let span = tracing::info_span!(
        "webhook.relay",
        network = %record.network,
        profile = %record.profile_name
    );
    relay(&state, &record).instrument(span).await
}

async fn relay(state: &AppState, record: &PostRecord) -> Response {
    let message = to_slack_payload(record);
    match state.notifier.notify(&message).await {
        Ok(()) => {
            metrics::counter!(DELIVERY_COUNTER, "outcome" => "ok").increment(1);
            tracing::info!("relayed sprout post to slack");
            (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
        }
        Err(err) => {
            metrics::counter!(DELIVERY_COUNTER, "outcome" => err.code()).increment(1);
            tracing::error!(code = err.code(), error = %err, "slack delivery failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.detail())
        }
    }
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "status": "error", "detail": detail }))).into_response()
}
