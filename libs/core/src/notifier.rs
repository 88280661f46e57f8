use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};

/// Delivers one rendered chat payload.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, payload: &Value) -> RelayResult<()>;
}

/// Posts payloads to a Slack incoming-webhook URL. One attempt per message.
#[derive(Clone)]
pub struct SlackWebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl SlackWebhookNotifier {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for SlackWebhookNotifier {
    async fn notify(&self, payload: &Value) -> RelayResult<()> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            debug!("slack webhook accepted message");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "slack webhook rejected message");
        Err(RelayError::Delivery {
            status: status.as_u16(),
            body,
        })
    }
}
