use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use feed_core::DEFAULT_PAGE_SIZE;
use feed_engine::{EngineConfig, FetchSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

const CONFIG_FILENAME: &str = "feed_browser.ron";
const ENV_CONFIG_PATH: &str = "FEED_BROWSER_CONFIG";
const ENV_ENDPOINT_BASE: &str = "FEED_ENDPOINT_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub debounce_window_ms: u64,
    pub page_size: u32,
    pub endpoint_base: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub log_destination: LogDestination,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            debounce_window_ms: 350,
            page_size: DEFAULT_PAGE_SIZE,
            endpoint_base: fetch.endpoint_base,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_body_bytes: fetch.max_bytes,
            log_destination: LogDestination::File,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl FeedConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1"));
        }
        if self.endpoint_base.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint_base must not be empty"));
        }
        Ok(self)
    }

    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint_base = endpoint;
        }
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                endpoint_base: self.endpoint_base.clone(),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                max_bytes: self.max_body_bytes,
            },
            debounce_window: Duration::from_millis(self.debounce_window_ms),
        }
    }
}

/// Loads configuration from `$FEED_BROWSER_CONFIG` or `./feed_browser.ron`.
///
/// A missing default file means defaults; an explicitly named file must exist.
pub fn load() -> Result<FeedConfig, ConfigError> {
    let config = match std::env::var_os(ENV_CONFIG_PATH) {
        Some(path) => load_from(Path::new(&path))?,
        None => {
            let path = PathBuf::from(CONFIG_FILENAME);
            if path.exists() {
                load_from(&path)?
            } else {
                FeedConfig::default()
            }
        }
    };
    config
        .with_endpoint_override(std::env::var(ENV_ENDPOINT_BASE).ok())
        .validate()
}

pub fn load_from(path: &Path) -> Result<FeedConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
