//! Client for the published-posts endpoint polled by the relay.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};

/// Page size requested from the API. No further pages are fetched.
pub const POSTS_PAGE_LIMIT: u32 = 50;

/// Anything that can list posts published after an instant.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Raw post records newer than `since`. Errors are absorbed: an upstream
    /// failure yields an empty list for the cycle.
    async fn published_since(&self, since: OffsetDateTime) -> Vec<Value>;
}

#[derive(Debug, Default, Deserialize)]
struct PublishedPosts {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Clone)]
pub struct SproutClient {
    http: reqwest::Client,
    api_base: String,
    customer_id: String,
    api_key: String,
}

impl SproutClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        customer_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            customer_id: customer_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self::new(
            http,
            config.sprout_api_base.clone(),
            config.sprout_customer_id.clone(),
            config.sprout_api_key.clone(),
        )
    }

    fn published_url(&self) -> String {
        format!(
            "{}/{}/posts/published",
            self.api_base.trim_end_matches('/'),
            self.customer_id.trim_matches('/')
        )
    }

    /// Single request for posts newer than `since`, surfacing every failure.
    pub async fn fetch_published(&self, since: OffsetDateTime) -> RelayResult<Vec<Value>> {
        let since = since
            .format(&Rfc3339)
            .unwrap_or_else(|_| since.unix_timestamp().to_string());
        let limit = POSTS_PAGE_LIMIT.to_string();
        let response = self
            .http
            .get(self.published_url())
            .bearer_auth(&self.api_key)
            .query(&[("since", since.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamFetch {
                status: status.as_u16(),
                body,
            });
        }

        let page: PublishedPosts = response.json().await?;
        Ok(page.data)
    }
}

#[async_trait]
impl PostSource for SproutClient {
    async fn published_since(&self, since: OffsetDateTime) -> Vec<Value> {
        match self.fetch_published(since).await {
            Ok(posts) => {
                info!(count = posts.len(), "fetched published posts");
                posts
            }
            Err(err) => {
                error!(code = err.code(), error = %err, "failed to fetch published posts");
                Vec::new()
            }
        }
    }
}
