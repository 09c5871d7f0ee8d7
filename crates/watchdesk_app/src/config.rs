//! Optional RON configuration file.
//!
//! A missing file means defaults. A file that cannot be read or parsed is
//! reported and then ignored, so a broken config never keeps the app from
//! starting.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use desk_logging::LogDestination;
use serde::{Deserialize, Serialize};
use watchdesk_engine::ClientSettings;

pub const DEFAULT_CONFIG_FILE: &str = "watchdesk.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub assistant_url: Option<String>,
    pub log: LogDestination,
    pub log_file: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    /// Route opened at startup, e.g. `/watch/3/timeline`.
    pub start_route: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            backend_url: settings.base_url,
            assistant_url: settings.assistant_url,
            log: LogDestination::default(),
            log_file: None,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            probe_timeout_secs: settings.probe_timeout.as_secs(),
            start_route: None,
        }
    }
}

impl AppConfig {
    /// `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Like [`AppConfig::load`], but falls back to defaults. The returned
    /// error is only for reporting once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::load(path) {
            Ok(config) => (config.unwrap_or_default(), None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.backend_url.clone(),
            assistant_url: self.assistant_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
        }
    }
}
