//! Last-checked timestamp persisted between poll cycles.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use crate::error::{RelayError, RelayResult};

/// Lookback used when no usable checkpoint exists.
pub const DEFAULT_LOOKBACK: Duration = Duration::minutes(15);

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointFile {
    last_check: String,
}

/// File-backed store for the poller's checkpoint. Assumes a single writer.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored instant, or now minus [`DEFAULT_LOOKBACK`] when the file is
    /// missing, unreadable or malformed.
    pub fn read(&self) -> OffsetDateTime {
        self.read_at(OffsetDateTime::now_utc())
    }

    pub fn read_at(&self, now: OffsetDateTime) -> OffsetDateTime {
        match self.load() {
            Ok(Some(ts)) => ts,
            Ok(None) => {
                debug!(path = %self.path.display(), "no checkpoint yet; using default lookback");
                now - DEFAULT_LOOKBACK
            }
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "ignoring unusable checkpoint");
                now - DEFAULT_LOOKBACK
            }
        }
    }

    fn load(&self) -> Result<Option<OffsetDateTime>, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.to_string()),
        };
        let file: CheckpointFile = serde_json::from_str(&raw).map_err(|err| err.to_string())?;
        OffsetDateTime::parse(file.last_check.trim(), &Rfc3339)
            .map(Some)
            .map_err(|err| format!("bad last_check {:?}: {err}", file.last_check))
    }

    /// Replaces the stored checkpoint. The new contents are written to a
    /// sibling temp file and renamed over the old one, so readers never see a
    /// partial write.
    pub fn write(&self, ts: OffsetDateTime) -> RelayResult<()> {
        let last_check = ts
            .format(&Rfc3339)
            .map_err(|err| self.fail(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
        let payload = serde_json::to_vec(&CheckpointFile { last_check })
            .map_err(|err| self.fail(err.into()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|err| self.fail(err))?;
        tmp.write_all(&payload).map_err(|err| self.fail(err))?;
        tmp.as_file().sync_all().map_err(|err| self.fail(err))?;
        tmp.persist(&self.path).map_err(|err| self.fail(err.error))?;
        debug!(path = %self.path.display(), "checkpoint written");
        Ok(())
    }

    fn fail(&self, source: std::io::Error) -> RelayError {
        RelayError::checkpoint(&self.path, source)
    }
}
