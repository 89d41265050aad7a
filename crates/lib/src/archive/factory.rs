//! Build archives from configuration.

use tracing::debug;

use super::types::ArchiveError;
use super::{Archive, HttpArchive, LocalArchive, MultiArchive, NoneArchive, ShellArchive, Wanted};
use crate::config::{ArchiveConfig, ArchiveSpec};
use crate::whitelist::EnvWhitelist;

/// Create the backend described by `spec`.
///
/// `whitelist` is only used by `shell` backends.
pub fn create_single_archive(
  spec: &ArchiveSpec,
  wanted: Wanted,
  whitelist: &EnvWhitelist,
) -> Result<Box<dyn Archive>, ArchiveError> {
  let allowed = spec.allowed_operations();
  debug!(backend = %spec.backend, allowed = ?allowed, wanted = ?wanted, "creating archive");

  match spec.backend.as_str() {
    "none" => Ok(Box::new(NoneArchive)),
    "file" => {
      let path = spec.path.as_deref().ok_or(ArchiveError::MissingField {
        backend: "file",
        field: "path",
      })?;
      Ok(Box::new(LocalArchive::new(path, &allowed, wanted)?))
    }
    "http" => {
      let url = spec.url.as_deref().ok_or(ArchiveError::MissingField {
        backend: "http",
        field: "url",
      })?;
      Ok(Box::new(HttpArchive::new(url, &allowed, wanted)?))
    }
    "shell" => Ok(Box::new(ShellArchive::new(
      spec.upload.as_deref(),
      spec.download.as_deref(),
      whitelist.clone(),
      &allowed,
      wanted,
    ))),
    other => Err(ArchiveError::InvalidBackend(other.to_string())),
  }
}

/// Create the archive described by `config`; a list becomes a [`MultiArchive`].
pub fn create_archive(
  config: &ArchiveConfig,
  wanted: Wanted,
  whitelist: &EnvWhitelist,
) -> Result<Box<dyn Archive>, ArchiveError> {
  match config {
    ArchiveConfig::One(spec) => create_single_archive(spec, wanted, whitelist),
    ArchiveConfig::Many(specs) => {
      let archives = specs
        .iter()
        .map(|spec| create_single_archive(spec, wanted, whitelist))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(Box::new(MultiArchive::new(archives)))
    }
  }
}
