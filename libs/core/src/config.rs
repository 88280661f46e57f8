//! Process configuration, resolved once at startup.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::record::FieldAliases;

pub const DEFAULT_SPROUT_API_BASE: &str = "https://api.sproutsocial.com/v1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CHECKPOINT_PATH: &str = "last_check.json";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub slack_webhook_url: String,
    pub sprout_api_key: String,
    pub sprout_customer_id: String,
    pub sprout_api_base: String,
    pub port: u16,
    pub checkpoint_path: PathBuf,
    pub webhook_fields: FieldAliases,
    pub poll_fields: FieldAliases,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Credentials are not
    /// checked here; a missing URL or key shows up as a failed request later.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let mut webhook_fields = FieldAliases::webhook();
        let mut poll_fields = FieldAliases::polled();
        if let Some(path) = get("FIELD_ALIASES_PATH") {
            let file = FieldAliasesFile::load(Path::new(&path))?;
            if let Some(overrides) = file.webhook {
                overrides.apply(&mut webhook_fields);
            }
            if let Some(overrides) = file.poll {
                overrides.apply(&mut poll_fields);
            }
        }

        Ok(Self {
            slack_webhook_url: get("SLACK_WEBHOOK_URL").unwrap_or_default(),
            sprout_api_key: get("SPROUT_API_KEY").unwrap_or_default(),
            sprout_customer_id: get("SPROUT_CUSTOMER_ID").unwrap_or_default(),
            sprout_api_base: get("SPROUT_API_BASE")
                .unwrap_or_else(|| DEFAULT_SPROUT_API_BASE.to_string()),
            port,
            checkpoint_path: get("CHECKPOINT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT_PATH)),
            webhook_fields,
            poll_fields,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

/// On-disk alias overrides, one optional section per entry mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldAliasesFile {
    #[serde(default)]
    pub webhook: Option<FieldAliasOverrides>,
    #[serde(default)]
    pub poll: Option<FieldAliasOverrides>,
}

impl FieldAliasesFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read field aliases {}", path.display()))?;
        serde_yaml_bw::from_str(&raw)
            .with_context(|| format!("parse field aliases {}", path.display()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldAliasOverrides {
    #[serde(default)]
    pub network: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<Vec<String>>,
    #[serde(default)]
    pub profile_name: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<Vec<String>>,
    #[serde(default)]
    pub media: Option<Vec<String>>,
}

impl FieldAliasOverrides {
    /// Replaces each listed field's aliases wholesale; unlisted fields keep
    /// their defaults.
    pub fn apply(self, target: &mut FieldAliases) {
        let Self {
            network,
            url,
            text,
            profile_name,
            created_at,
            media,
        } = self;
        if let Some(v) = network {
            target.network = v;
        }
        if let Some(v) = url {
            target.url = v;
        }
        if let Some(v) = text {
            target.text = v;
        }
        if let Some(v) = profile_name {
            target.profile_name = v;
        }
        if let Some(v) = created_at {
            target.created_at = v;
        }
        if let Some(v) = media {
            target.media = v;
        }
    }
}
