//! Build identifiers and their sharded storage keys.
//!
//! A build identifier is the digest of a build step's inputs. It is never
//! interpreted, only rendered as lowercase hex and split into a three level
//! key so that no single directory (or URL prefix) grows too large:
//!
//! ```text
//! aabbccddeeff...  ->  aa/bb/ccddeeff....tgz
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::ARTIFACT_EXT;

/// Errors raised while constructing a [`BuildId`].
#[derive(Debug, Error)]
pub enum BuildIdError {
  #[error("build id is empty")]
  Empty,

  #[error("invalid build id '{value}': {source}")]
  InvalidHex {
    value: String,
    #[source]
    source: hex::FromHexError,
  },

  #[error("failed to read build id file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Opaque, fixed-length digest naming a build step's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(Vec<u8>);

impl BuildId {
  pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, BuildIdError> {
    let bytes = bytes.into();
    if bytes.is_empty() {
      return Err(BuildIdError::Empty);
    }
    Ok(Self(bytes))
  }

  /// Parse a hex rendering, in either case.
  pub fn from_hex(value: &str) -> Result<Self, BuildIdError> {
    let value = value.trim();
    let bytes = hex::decode(value).map_err(|source| BuildIdError::InvalidHex {
      value: value.to_string(),
      source,
    })?;
    Self::from_bytes(bytes)
  }

  /// Read a materialized build-id file (raw digest bytes).
  pub fn read_from_file(path: &Path) -> Result<Self, BuildIdError> {
    let bytes = fs::read(path).map_err(|source| BuildIdError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_bytes(bytes)
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  /// Lowercase hex rendering.
  pub fn to_hex(&self) -> String {
    hex::encode(&self.0)
  }

  /// Split the hex rendering into its storage shards.
  pub fn shard(&self) -> ShardPath {
    ShardPath::from_hex(&self.to_hex())
  }
}

impl fmt::Display for BuildId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_hex())
  }
}

/// The three segments of a sharded artifact key.
///
/// `first` and `second` are two hex characters each, `rest` holds the
/// remaining characters. For single-byte identifiers `second` and `rest`
/// are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPath {
  pub first: String,
  pub second: String,
  pub rest: String,
}

impl ShardPath {
  fn from_hex(hex: &str) -> Self {
    // Hex output is ASCII, byte offsets are char offsets.
    let first_end = hex.len().min(2);
    let second_end = hex.len().min(4);
    Self {
      first: hex[..first_end].to_string(),
      second: hex[first_end..second_end].to_string(),
      rest: hex[second_end..].to_string(),
    }
  }

  /// File name of the artifact inside its shard directory.
  pub fn file_name(&self) -> String {
    format!("{}.{}", self.rest, ARTIFACT_EXT)
  }

  /// Relative key without any base prefix, e.g. `aa/bb/ccdd.tgz`.
  pub fn relative_key(&self) -> String {
    format!("{}/{}/{}", self.first, self.second, self.file_name())
  }

  /// Directory holding the artifact below a filesystem base.
  pub fn dir_under(&self, base: &Path) -> PathBuf {
    base.join(&self.first).join(&self.second)
  }

  /// Full artifact path below a filesystem base.
  pub fn file_under(&self, base: &Path) -> PathBuf {
    self.dir_under(base).join(self.file_name())
  }

  /// Full artifact URL below a base URL.
  pub fn url_under(&self, base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), self.relative_key())
  }
}
