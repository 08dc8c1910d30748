//! Application settings.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::{Catalog, ConfigError, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

/// Resolved settings used to build the admin client.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend root, always ending in `/`.
    pub base_url: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    pub catalog: Catalog,
    /// Config file the settings came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            username: None,
            password: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            catalog: Catalog::default(),
            config_path: None,
        }
    }
}

impl Settings {
    /// Parse and store a base URL, normalizing the trailing slash so that
    /// relative endpoint paths join under it.
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        self.base_url = Url::parse(&normalized).map_err(|source| ConfigError::BaseUrl {
            url: raw.to_string(),
            source,
        })?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
