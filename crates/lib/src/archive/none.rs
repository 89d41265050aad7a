//! The archive used when no cache is configured.

use std::path::Path;

use super::Archive;
use super::types::{ArchiveError, UploadOutcome};
use crate::build_id::BuildId;

/// Never uploads, never finds anything, emits no script.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneArchive;

impl Archive for NoneArchive {
  fn can_upload(&self) -> bool {
    false
  }

  fn can_download(&self) -> bool {
    false
  }

  fn upload_package(&self, _build_id: &BuildId, _dir: &Path) -> Result<UploadOutcome, ArchiveError> {
    Ok(UploadOutcome::Disabled)
  }

  fn download_package(&self, _build_id: &BuildId, _dir: &Path) -> Result<bool, ArchiveError> {
    Ok(false)
  }

  fn upload_script(&self, _build_id_file: &Path, _result_file: &Path) -> String {
    String::new()
  }

  fn download_script(&self, _build_id_file: &Path, _result_file: &Path) -> String {
    String::new()
  }
}
