//! core::config
//!
//! Configuration resolution.
//!
//! # Design
//!
//! Configuration is an explicit value handed to the components that need
//! it; nothing reads process-wide mutable state. Values resolve with the
//! precedence:
//!
//! 1. CLI flags (highest)
//! 2. Environment (`CASK_ADDRESS`, `CASK_NAMESPACE`, `CASK_DATA_ROOT`)
//! 3. Config file (`<config_dir>/cask/config.toml`, TOML)
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```no_run
//! use caskwork::core::config::{Config, Overrides};
//!
//! let config = Config::resolve(Overrides::default(), None).unwrap();
//! assert!(!config.namespace.is_empty());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default runtime bridge address.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:10350";

/// Default namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default data root.
pub const DEFAULT_DATA_ROOT: &str = "/var/lib/cask";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but cannot be read.
    #[error("cannot read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML.
    #[error("cannot parse config file {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Resolved configuration.
///
/// Every field has a value once resolution completes; components never
/// fall back to defaults on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Runtime bridge address (HTTP endpoint).
    pub address: String,
    /// Namespace scoping all container lookups.
    pub namespace: String,
    /// Root of the local data store.
    pub data_root: PathBuf,
}

/// Values supplied on the command line, overriding everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub namespace: Option<String>,
    pub data_root: Option<PathBuf>,
}

/// On-disk config file schema. All fields optional; missing fields fall
/// through to the next precedence level.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    address: Option<String>,
    namespace: Option<String>,
    data_root: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from flags, environment, and the config file.
    ///
    /// `config_path` overrides the default config file location. A missing
    /// file at the default location is not an error; a missing file at an
    /// explicitly requested path is.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed.
    pub fn resolve(overrides: Overrides, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => Self::load_file(path, true)?,
            None => match default_config_path() {
                Some(path) => Self::load_file(&path, false)?,
                None => FileConfig::default(),
            },
        };

        let address = overrides
            .address
            .or_else(|| std::env::var("CASK_ADDRESS").ok())
            .or(file.address)
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let namespace = overrides
            .namespace
            .or_else(|| std::env::var("CASK_NAMESPACE").ok())
            .or(file.namespace)
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let data_root = overrides
            .data_root
            .or_else(|| std::env::var("CASK_DATA_ROOT").ok().map(PathBuf::from))
            .or(file.data_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT));

        Ok(Self {
            address,
            namespace,
            data_root,
        })
    }

    /// Load a config file. When `required` is false, a missing file yields
    /// the empty config.
    fn load_file(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FileConfig::default());
            }
            Err(err) => {
                return Err(ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        toml::from_str(&text).map_err(|err| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

/// Default config file location: `<config_dir>/cask/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cask").join("config.toml"))
}
