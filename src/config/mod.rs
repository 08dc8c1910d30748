//! Configuration management for collector-admin using the prefer crate.

mod catalog;
mod loader;
mod settings;

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{Catalog, ProductGroup};
pub use loader::{load_settings_with_options, LoadOptions};
pub use settings::Settings;

/// Name used for config file discovery (`collector-admin.toml`, ...).
pub const CONFIG_NAME: &str = "collector-admin";

/// Default backend address (the Flask app listens on port 5000).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    #[error("Invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend address, e.g. `http://collector.local:5000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Admin login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Admin password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Server id -> display name. Keys are strings so every format can carry them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub servers: BTreeMap<String, String>,
    /// Product id -> display name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub products: BTreeMap<String, String>,
    /// Product groups in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_groups: Vec<ProductGroup>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no file is found or it cannot be parsed.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default_with_env()
                        }
                    }
                } else {
                    Self::default_with_env()
                }
            }
            Err(_) => Self::default_with_env(),
        }
    }

    /// Defaults with environment overrides applied.
    pub fn default_with_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a specific file path.
    /// The format is chosen by extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;

        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Apply `COLLECTOR_ADMIN_*` environment variables on top of file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env("COLLECTOR_ADMIN_URL") {
            self.base_url = Some(url);
        }
        if let Some(user) = non_empty_env("COLLECTOR_ADMIN_USERNAME") {
            self.username = Some(user);
        }
        if let Some(pass) = non_empty_env("COLLECTOR_ADMIN_PASSWORD") {
            self.password = Some(pass);
        }
        self
    }

    /// Build the lookup catalog from the raw tables.
    pub fn catalog(&self) -> Catalog {
        Catalog::from_tables(&self.servers, &self.products, &self.product_groups)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if let Some(ref url) = self.base_url {
            settings.set_base_url(url)?;
        }
        if self.username.is_some() {
            settings.username = self.username.clone();
        }
        if self.password.is_some() {
            settings.password = self.password.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        settings.catalog = self.catalog();
        settings.config_path = self.source_path.clone();
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = Config::parse(
            r#"
base_url = "http://collector:5000"
username = "admin"
request_timeout = 10

[servers]
0 = "Magnates"
1 = "Entrepreneurs"

[products]
1 = "Seeds"

[[product_groups]]
name = "Farm"
products = [1, 2]
"#,
            "toml",
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://collector:5000"));
        assert_eq!(config.request_timeout, Some(10));
        let catalog = config.catalog();
        assert_eq!(catalog.server_name(1), Some("Entrepreneurs"));
        assert_eq!(catalog.product_groups.len(), 1);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = Config::parse("username: ops\nservers:\n  \"2\": Test\n", "yml").unwrap();
        assert_eq!(yaml.username.as_deref(), Some("ops"));
        assert!(yaml.catalog().is_known_server(2));

        let json = Config::parse(r#"{"request_timeout": 5}"#, "json").unwrap();
        assert_eq!(json.request_timeout, Some(5));
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = Config::parse("base_url = ", "toml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse TOML config"));
    }

    #[tokio::test]
    async fn test_load_from_path_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector-admin.json");
        tokio::fs::write(&path, r#"{"request_timeout": 7}"#)
            .await
            .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.request_timeout, Some(7));
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_load_from_missing_path() {
        let err = Config::load_from_path(Path::new("/nonexistent/collector-admin.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
