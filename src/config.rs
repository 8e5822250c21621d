//! Runtime configuration
//!
//! Everything a component needs (API base URL, local store location, timeouts)
//! is carried in [`WardrobeConfig`] and handed to constructors explicitly.

use std::path::PathBuf;
use std::time::Duration;

use crate::database::StoreLocation;
use crate::error::{Result, WardrobeError};
use crate::DEFAULT_API_BASE_URL;

/// Environment variable overriding the API base URL
pub const API_URL_ENV_VAR: &str = "WARDROBE_API_URL";

/// Environment variable pointing at an on-disk local store
pub const LOCAL_DB_ENV_VAR: &str = "WARDROBE_LOCAL_DB";

/// Environment variable setting a request timeout in whole seconds
pub const REQUEST_TIMEOUT_ENV_VAR: &str = "WARDROBE_REQUEST_TIMEOUT_SECS";

/// Wardrobe client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WardrobeConfig {
    /// Base URL of the REST API, including the `/v1/` segment
    pub api_base_url: String,
    /// Where the local object store lives
    pub local_store: StoreLocation,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for WardrobeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            local_store: StoreLocation::InMemory,
            request_timeout: None,
        }
    }
}

impl WardrobeConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(path) = lookup(LOCAL_DB_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            config.local_store = StoreLocation::File(PathBuf::from(path.trim()));
        }

        if let Some(secs) = lookup(REQUEST_TIMEOUT_ENV_VAR) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                WardrobeError::InvalidConfig(format!(
                    "{REQUEST_TIMEOUT_ENV_VAR} must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Set the API base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the local store location
    pub fn with_local_store(mut self, location: StoreLocation) -> Self {
        self.local_store = location;
        self
    }
}
