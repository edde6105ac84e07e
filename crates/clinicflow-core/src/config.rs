//! Library configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

fn default_webhook_timeout() -> u64 {
    10
}

/// Runtime configuration, loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicConfig {
    /// Path of the SQLite database file
    pub database_path: PathBuf,
    /// Follow-up scheduling webhook; the integration is disabled when unset
    #[serde(default)]
    pub follow_up_webhook_url: Option<String>,
    /// Chat-assistant webhook; the assistant is disabled when unset
    #[serde(default)]
    pub assistant_webhook_url: Option<String>,
    /// Timeout for outbound webhook calls, in seconds
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,
}

impl ClinicConfig {
    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Configuration with defaults for a database at `path`.
    pub fn with_database<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            database_path: path.into(),
            follow_up_webhook_url: None,
            assistant_webhook_url: None,
            webhook_timeout_secs: default_webhook_timeout(),
        }
    }
}
