//! Service configuration. JSON file with per-section defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory searched for the model, metadata and encoder files
    pub artifact_dir: PathBuf,
    /// Assessment store and audit log
    pub data_dir: PathBuf,
    /// Application records waiting to be scored (`*.json`)
    pub inbox_dir: PathBuf,
    pub orchestrator: OrchestratorConfig,
    pub notify: NotifyConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// At-most-one scoring per application id within this lease
    pub lease_minutes: u64,
    /// Attempts per application including the first
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles each retry
    pub base_delay_ms: u64,
    /// Inbox poll interval; 0 runs a single pass
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

fn default_base_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("credit-scoring"))
        .unwrap_or_else(|| PathBuf::from(".credit-scoring"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let base = default_base_dir();
        Self {
            artifact_dir: base.join("models"),
            data_dir: base.join("data"),
            inbox_dir: base.join("inbox"),
            orchestrator: OrchestratorConfig::default(),
            notify: NotifyConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            lease_minutes: 30,
            max_attempts: 3,
            base_delay_ms: 500,
            poll_interval_secs: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

impl ServiceConfig {
    /// Missing file means defaults. A file that exists must parse; absent
    /// keys inside it still take their section defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
