//! Several archives behind one interface.
//!
//! Uploads fan out to every member able to upload; downloads try members in
//! configured order and stop at the first hit.

use std::path::Path;

use tracing::debug;

use super::Archive;
use super::types::{ArchiveError, UploadOutcome};
use crate::build_id::BuildId;

pub struct MultiArchive {
  archives: Vec<Box<dyn Archive>>,
}

impl MultiArchive {
  pub fn new(archives: Vec<Box<dyn Archive>>) -> Self {
    Self { archives }
  }

  pub fn len(&self) -> usize {
    self.archives.len()
  }

  pub fn is_empty(&self) -> bool {
    self.archives.is_empty()
  }
}

impl std::fmt::Debug for MultiArchive {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MultiArchive").field("members", &self.archives.len()).finish()
  }
}

impl Archive for MultiArchive {
  fn can_upload(&self) -> bool {
    self.archives.iter().any(|a| a.can_upload())
  }

  fn can_download(&self) -> bool {
    self.archives.iter().any(|a| a.can_download())
  }

  fn upload_package(&self, build_id: &BuildId, dir: &Path) -> Result<UploadOutcome, ArchiveError> {
    let mut outcome = UploadOutcome::Disabled;
    for (index, archive) in self.archives.iter().enumerate() {
      if !archive.can_upload() {
        continue;
      }
      let member = archive.upload_package(build_id, dir)?;
      debug!(member = index, outcome = ?member, "composite upload");
      outcome = outcome.max(member);
    }
    Ok(outcome)
  }

  fn download_package(&self, build_id: &BuildId, dir: &Path) -> Result<bool, ArchiveError> {
    for (index, archive) in self.archives.iter().enumerate() {
      if !archive.can_download() {
        continue;
      }
      if archive.download_package(build_id, dir)? {
        debug!(member = index, "composite download hit");
        return Ok(true);
      }
    }
    Ok(false)
  }

  fn upload_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    self
      .archives
      .iter()
      .filter(|a| a.can_upload())
      .map(|a| a.upload_script(build_id_file, result_file))
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn download_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    self
      .archives
      .iter()
      .filter(|a| a.can_download())
      .map(|a| a.download_script(build_id_file, result_file))
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join("\n")
  }
}
