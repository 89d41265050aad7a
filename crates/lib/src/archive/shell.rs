//! Archive driven by user-supplied shell commands.
//!
//! The configured commands see only whitelisted environment variables plus:
//! - `LOCAL_ARTIFACT`: absolute path of the local tarball (read on upload, written on download)
//! - `REMOTE_ARTIFACT`: sharded relative key, e.g. `aa/bb/ccdd....tgz`
//!
//! Commands run under `bash -e` with stdin and stdout closed, from a private
//! scratch directory. Generated fragments run them under `bash -e` as well.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::Archive;
use super::policy::{Operation, Policy, Wanted};
use super::script;
use super::tarball;
use super::types::{ArchiveError, UploadOutcome};
use crate::build_id::BuildId;
use crate::consts::{COMMAND_SHELL, COMMAND_SHELL_ARGS, LOCAL_ARTIFACT_VAR, REMOTE_ARTIFACT_VAR};
use crate::whitelist::EnvWhitelist;

#[derive(Debug, Clone)]
pub struct ShellArchive {
  upload_cmd: Option<String>,
  download_cmd: Option<String>,
  whitelist: EnvWhitelist,
  policy: Policy,
}

fn non_empty(cmd: Option<&str>) -> Option<String> {
  cmd.filter(|c| !c.trim().is_empty()).map(str::to_string)
}

impl ShellArchive {
  /// A missing or blank command disables that direction.
  pub fn new(
    upload_cmd: Option<&str>,
    download_cmd: Option<&str>,
    whitelist: EnvWhitelist,
    allowed: &[Operation],
    wanted: Wanted,
  ) -> Self {
    Self {
      upload_cmd: non_empty(upload_cmd),
      download_cmd: non_empty(download_cmd),
      whitelist,
      policy: Policy::new(allowed, wanted),
    }
  }

  /// Run `cmd` with the restricted environment and return its exit status.
  fn run(&self, cmd: &str, local: &Path, remote: &str) -> Result<ExitStatus, ArchiveError> {
    let workdir = tempfile::tempdir()?;
    let local = std::path::absolute(local)?;
    let env = self.whitelist.capture();

    debug!(
      shell = COMMAND_SHELL,
      cwd = %workdir.path().display(),
      local = %local.display(),
      remote = %remote,
      inherited = env.len(),
      "spawning archive command"
    );

    let status = Command::new(COMMAND_SHELL)
      .args(COMMAND_SHELL_ARGS)
      .arg(cmd)
      .current_dir(workdir.path())
      .env_clear()
      .envs(&env)
      .env(LOCAL_ARTIFACT_VAR, &local)
      .env(REMOTE_ARTIFACT_VAR, remote)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .status()?;

    debug!(status = ?status.code(), "archive command finished");
    Ok(status)
  }
}

impl Archive for ShellArchive {
  fn can_upload(&self) -> bool {
    self.policy.can_upload() && self.upload_cmd.is_some()
  }

  fn can_download(&self) -> bool {
    self.policy.can_download() && self.download_cmd.is_some()
  }

  fn upload_package(&self, build_id: &BuildId, dir: &Path) -> Result<UploadOutcome, ArchiveError> {
    let cmd = match &self.upload_cmd {
      Some(cmd) if self.can_upload() => cmd,
      _ => return Ok(UploadOutcome::Disabled),
    };

    info!(path = %dir.display(), "uploading artifact");
    let mut temp = NamedTempFile::new()?;
    {
      let mut writer = tarball::pack_dir(dir, BufWriter::new(temp.as_file_mut()))?;
      writer.flush()?;
    }

    let remote = build_id.shard().relative_key();
    let status = self.run(cmd, temp.path(), &remote)?;
    if !status.success() {
      return Err(ArchiveError::UploadCommandFailed { code: status.code() });
    }

    Ok(UploadOutcome::Uploaded)
  }

  fn download_package(&self, build_id: &BuildId, dir: &Path) -> Result<bool, ArchiveError> {
    let cmd = match &self.download_cmd {
      Some(cmd) if self.can_download() => cmd,
      _ => return Ok(false),
    };

    let temp = NamedTempFile::new()?;
    let remote = build_id.shard().relative_key();
    let status = self.run(cmd, temp.path(), &remote)?;
    if !status.success() {
      warn!(path = %dir.display(), remote = %remote, code = ?status.code(), "download failed");
      return Ok(false);
    }

    tarball::replace_dir_from_file(temp.path(), dir)?;
    info!(path = %dir.display(), remote = %remote, "download ok");
    Ok(true)
  }

  fn upload_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    match &self.upload_cmd {
      Some(cmd) if self.can_upload() => {
        let body = script::errexit_command(cmd, script::upload_fallback());
        script::upload_fragment(build_id_file, result_file, &body)
      }
      _ => String::new(),
    }
  }

  fn download_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    match &self.download_cmd {
      Some(cmd) if self.can_download() => {
        let body = script::errexit_command(cmd, &script::download_fallback());
        script::download_fragment(build_id_file, result_file, &body)
      }
      _ => String::new(),
    }
  }
}
