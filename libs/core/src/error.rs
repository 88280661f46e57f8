use std::path::PathBuf;

pub type RelayResult<T> = Result<T, RelayError>;

/// Failure categories surfaced by the relay components.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("upstream returned status {status}: {body}")]
    UpstreamFetch { status: u16, body: String },
    #[error("chat webhook returned status {status}")]
    Delivery { status: u16, body: String },
    #[error("http transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("checkpoint {}: {source}", path.display())]
    Checkpoint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    /// Stable identifier used in logs and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::UpstreamFetch { .. } => "upstream_fetch",
            RelayError::Delivery { .. } => "delivery",
            RelayError::Transport(_) => "transport",
            RelayError::Checkpoint { .. } => "checkpoint",
        }
    }

    /// Text handed back to webhook callers. Delivery failures expose the chat
    /// endpoint's own response body.
    pub fn detail(&self) -> String {
        match self {
            RelayError::Delivery { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub(crate) fn checkpoint(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RelayError::Checkpoint {
            path: path.into(),
            source,
        }
    }
}
