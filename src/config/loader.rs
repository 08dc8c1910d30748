//! Configuration loading and merging logic.

use std::path::PathBuf;

use super::{Config, ConfigError, Settings};

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Backend URL from the command line (overrides config and env).
    pub base_url: Option<String>,
}

/// Load config from the explicit path or via discovery.
async fn load_file_config(options: &LoadOptions) -> Result<Config, ConfigError> {
    if let Some(ref config_path) = options.config_path {
        let expanded = shellexpand::tilde(&config_path.to_string_lossy()).into_owned();
        return Config::load_from_path(&PathBuf::from(expanded)).await;
    }
    Ok(Config::load().await)
}

/// Resolve settings: defaults, then config file (with env overrides), then CLI.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = load_file_config(&options).await?;

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings)?;

    if let Some(ref url) = options.base_url {
        settings.set_base_url(url)?;
    }

    Ok((settings, config))
}
