use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{RelayError, Result};

const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 3;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_POLL_SECONDS: u64 = 60;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    pub base_url: String,
    pub address: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

impl RelayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            address: None,
            password: None,
            connect_timeout_seconds: None,
            timeout_seconds: None,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_seconds
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECONDS),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Credentials are only used when both halves are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.address.as_deref(), self.password.as_deref()) {
            (Some(address), Some(password)) if !address.trim().is_empty() => {
                Some((address, password))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FetcherConfig {
    pub poll_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub relay: RelayConfig,
    pub fetcher: Option<FetcherConfig>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| RelayError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| RelayError::Config(e.to_string()))?;
        if config.relay.base_url.trim().is_empty() {
            return Err(RelayError::Config("relay.base_url is empty".to_string()));
        }
        Ok(config)
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        if let Some(password) = password.filter(|value| !value.is_empty()) {
            self.relay.password = Some(password);
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        let seconds = self
            .fetcher
            .as_ref()
            .and_then(|fetcher| fetcher.poll_seconds)
            .unwrap_or(DEFAULT_POLL_SECONDS);
        Duration::from_secs(seconds.max(1))
    }
}
