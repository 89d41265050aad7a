//! Archive configuration.
//!
//! Configuration is YAML. The `archive` key holds one backend spec or a list
//! of specs; a list becomes a composite archive.
//!
//! ```yaml
//! archive:
//!   - backend: file
//!     path: /var/cache/artifacts
//!   - backend: http
//!     url: https://cache.example.com/artifacts
//!     flags: [download]
//! whitelist: [PATH, HOME]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::archive::Operation;
use crate::consts::CONFIG_ENV_VAR;
use crate::platform::paths::config_dir;
use crate::whitelist::EnvWhitelist;

const CONFIG_FILENAME: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}

fn default_backend() -> String {
  "none".to_string()
}

/// Declarative description of one archive backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSpec {
  /// `none`, `file`, `http` or `shell`.
  #[serde(default = "default_backend")]
  pub backend: String,

  /// Allowed directions; both when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub flags: Option<Vec<Operation>>,

  /// Base directory (`file`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<PathBuf>,

  /// Base URL (`http`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,

  /// Upload command (`shell`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub upload: Option<String>,

  /// Download command (`shell`).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub download: Option<String>,
}

impl ArchiveSpec {
  pub fn none() -> Self {
    Self {
      backend: default_backend(),
      flags: None,
      path: None,
      url: None,
      upload: None,
      download: None,
    }
  }

  pub fn allowed_operations(&self) -> Vec<Operation> {
    match &self.flags {
      Some(flags) => flags.clone(),
      None => Operation::ALL.to_vec(),
    }
  }
}

impl Default for ArchiveSpec {
  fn default() -> Self {
    Self::none()
  }
}

/// One backend or an ordered list of backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArchiveConfig {
  Many(Vec<ArchiveSpec>),
  One(ArchiveSpec),
}

impl Default for ArchiveConfig {
  fn default() -> Self {
    ArchiveConfig::One(ArchiveSpec::none())
  }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
  #[serde(default)]
  pub archive: ArchiveConfig,

  /// Environment names forwarded to `shell` backends.
  #[serde(default)]
  pub whitelist: EnvWhitelist,
}

impl CacheConfig {
  pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(content)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded archive config");
    Ok(config)
  }

  /// Load from the default location; a missing file yields the default config.
  pub fn load_default() -> Result<Self, ConfigError> {
    let path = default_config_path();
    match path.try_exists() {
      Ok(true) => Self::load(&path),
      Ok(false) => {
        debug!(path = %path.display(), "no archive config, using defaults");
        Ok(Self::default())
      }
      Err(source) => Err(ConfigError::Read { path, source }),
    }
  }
}

/// Config file location: `$ARTIFACT_CACHE_CONFIG`, else `<config_dir>/config.yaml`.
pub fn default_config_path() -> PathBuf {
  if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
    return PathBuf::from(path);
  }
  config_dir().join(CONFIG_FILENAME)
}
