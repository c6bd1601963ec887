//! Connection settings from `sibtools.toml` and the command line.
//!
//! ```toml
//! [wfs]
//! url = "https://example.org/publicWFS/WFS"
//! username = "sib"
//! password = "secret"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use sib_wfs::ConnectionConfig;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sibtools.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no publicWFS URL configured (set [wfs] url in {DEFAULT_CONFIG_FILE} or pass --url)")]
    MissingUrl,
}

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub wfs: ConnectionConfig,
}

/// Connection values given on the command line; each wins over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Parse config file contents.
pub fn parse_config(path: &Path, content: &str) -> Result<ConfigFile, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path`, or the default file if it exists.
///
/// An explicitly named file must exist; a missing default file yields an
/// empty config.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file");
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    parse_config(&path, &content)
}

/// Merge file settings with command-line overrides.
pub fn resolve_connection(
    file: ConfigFile,
    overrides: ConnectionOverrides,
) -> Result<ConnectionConfig, ConfigError> {
    let mut config = file.wfs;
    if let Some(url) = overrides.url {
        config.url = url;
    }
    if overrides.username.is_some() {
        config.username = overrides.username;
    }
    if overrides.password.is_some() {
        config.password = overrides.password;
    }
    if config.url.trim().is_empty() {
        return Err(ConfigError::MissingUrl);
    }
    Ok(config)
}
