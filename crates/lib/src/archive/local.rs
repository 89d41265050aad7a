//! Archive backed by a local (or mounted) directory.
//!
//! # Layout
//!
//! ```text
//! <base>/
//! └── aa/
//!     └── bb/
//!         └── ccddeeff....tgz
//! ```

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::policy::{Operation, Policy, Wanted};
use super::script;
use super::tarball;
use super::types::{ArchiveError, UploadOutcome};
use super::Archive;
use crate::build_id::BuildId;
use crate::consts::{LOCAL_ARTIFACT_VAR, REMOTE_ARTIFACT_VAR};

/// Shell variable holding the archive file inside generated fragments.
const SCRIPT_FILE_VAR: &str = "ARCHIVE_FILE";

#[derive(Debug, Clone)]
pub struct LocalArchive {
  base: PathBuf,
  policy: Policy,
}

impl LocalArchive {
  /// Create an archive rooted at `base`, made absolute against the current directory.
  pub fn new(base: &Path, allowed: &[Operation], wanted: Wanted) -> Result<Self, ArchiveError> {
    Ok(Self {
      base: std::path::absolute(base)?,
      policy: Policy::new(allowed, wanted),
    })
  }

  pub fn base(&self) -> &Path {
    &self.base
  }

  /// Path where the artifact for `build_id` is stored.
  pub fn artifact_path(&self, build_id: &BuildId) -> PathBuf {
    build_id.shard().file_under(&self.base)
  }

  /// Pack `dir` next to `target` and move it into place unless someone beat us to it.
  fn store(&self, dir: &Path, target: &Path, shard_dir: &Path) -> Result<UploadOutcome, ArchiveError> {
    fs::create_dir_all(shard_dir)?;

    let mut temp = NamedTempFile::new_in(shard_dir)?;
    {
      let mut writer = tarball::pack_dir(dir, BufWriter::new(temp.as_file_mut()))?;
      writer.flush()?;
    }
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644))?;
    }

    match temp.persist_noclobber(target) {
      Ok(_) => Ok(UploadOutcome::Uploaded),
      Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
        info!(path = %dir.display(), "upload skipped, artifact appeared in archive concurrently");
        Ok(UploadOutcome::Skipped)
      }
      Err(e) => Err(ArchiveError::Io(e.error)),
    }
  }
}

impl Archive for LocalArchive {
  fn can_upload(&self) -> bool {
    self.policy.can_upload()
  }

  fn can_download(&self) -> bool {
    self.policy.can_download()
  }

  fn upload_package(&self, build_id: &BuildId, dir: &Path) -> Result<UploadOutcome, ArchiveError> {
    if !self.can_upload() {
      return Ok(UploadOutcome::Disabled);
    }

    let shard = build_id.shard();
    let target = shard.file_under(&self.base);
    if target.is_file() {
      info!(path = %dir.display(), archive = %target.display(), "upload skipped, artifact exists in archive");
      return Ok(UploadOutcome::Skipped);
    }

    info!(path = %dir.display(), archive = %target.display(), "uploading artifact");
    self.store(dir, &target, &shard.dir_under(&self.base))
  }

  fn download_package(&self, build_id: &BuildId, dir: &Path) -> Result<bool, ArchiveError> {
    if !self.can_download() {
      return Ok(false);
    }

    let source = self.artifact_path(build_id);
    if !source.is_file() {
      warn!(path = %dir.display(), archive = %source.display(), "download: artifact not found");
      return Ok(false);
    }

    tarball::replace_dir_from_file(&source, dir)?;
    info!(path = %dir.display(), archive = %source.display(), "download ok");
    Ok(true)
  }

  fn upload_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    if !self.can_upload() {
      return String::new();
    }

    let body = format!(
      "{SCRIPT_FILE_VAR}={}/\"${REMOTE_ARTIFACT_VAR}\"\n\
       if [[ ! -e \"${SCRIPT_FILE_VAR}\" ]] ; then\n\
       {}\n\
       fi",
      script::quote_path(&self.base),
      script::indent(&format!(
        "{{ mkdir -p \"${{{SCRIPT_FILE_VAR}%/*}}\" && cp \"${LOCAL_ARTIFACT_VAR}\" \"${SCRIPT_FILE_VAR}\" ; }} {}",
        script::upload_fallback()
      )),
    );
    script::upload_fragment(build_id_file, result_file, &body)
  }

  fn download_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    if !self.can_download() {
      return String::new();
    }

    let body = format!(
      "{SCRIPT_FILE_VAR}={}/\"${REMOTE_ARTIFACT_VAR}\"\n\
       cp \"${SCRIPT_FILE_VAR}\" \"${LOCAL_ARTIFACT_VAR}\" {}",
      script::quote_path(&self.base),
      script::download_fallback(),
    );
    script::download_fragment(build_id_file, result_file, &script::indent(&body))
  }
}
