//! Archive served over plain HTTP.
//!
//! Artifacts live at `<url>/aa/bb/rest.tgz`. Uploads probe with `HEAD` and
//! `PUT` the tarball only when the server answers 404; downloads `GET` the
//! tarball into a scratch file before replacing the target directory.

use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::Archive;
use super::policy::{Operation, Policy, Wanted};
use super::script;
use super::tarball;
use super::types::{ArchiveError, UploadOutcome};
use crate::build_id::BuildId;
use crate::consts::{LOCAL_ARTIFACT_VAR, REMOTE_ARTIFACT_VAR};

/// Shell variable holding the artifact URL inside generated fragments.
const SCRIPT_URL_VAR: &str = "ARCHIVE_URL";

#[derive(Debug, Clone)]
pub struct HttpArchive {
  url: String,
  client: Client,
  policy: Policy,
}

fn transfer_error(url: &str, err: impl std::fmt::Display) -> ArchiveError {
  ArchiveError::Http {
    url: url.to_string(),
    message: err.to_string(),
  }
}

/// Copy the response body into `out`.
///
/// The outer error is a local write failure; the inner one a body read
/// (transport) failure.
fn stream_body(body: &mut impl Read, out: &mut impl Write) -> Result<Result<u64, io::Error>, ArchiveError> {
  let mut buf = [0u8; 64 * 1024];
  let mut total = 0u64;
  loop {
    let n = match body.read(&mut buf) {
      Ok(0) => break,
      Ok(n) => n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
      Err(e) => return Ok(Err(e)),
    };
    out.write_all(&buf[..n])?;
    total += n as u64;
  }
  out.flush()?;
  Ok(Ok(total))
}

impl HttpArchive {
  pub fn new(url: &str, allowed: &[Operation], wanted: Wanted) -> Result<Self, ArchiveError> {
    let client = Client::builder().build().map_err(|e| transfer_error(url, e))?;
    Ok(Self {
      url: url.trim_end_matches('/').to_string(),
      client,
      policy: Policy::new(allowed, wanted),
    })
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// URL of the artifact for `build_id`.
  pub fn artifact_url(&self, build_id: &BuildId) -> String {
    build_id.shard().url_under(&self.url)
  }

  /// Whether the server already has the artifact.
  ///
  /// Only a 404 means absent; any other failure status is fatal.
  fn exists(&self, url: &str) -> Result<bool, ArchiveError> {
    let response = self.client.head(url).send().map_err(|e| transfer_error(url, e))?;
    let status = response.status();
    debug!(url = %url, status = %status, "HEAD artifact");

    if status.is_success() {
      Ok(true)
    } else if status == StatusCode::NOT_FOUND {
      Ok(false)
    } else {
      Err(transfer_error(url, format!("HEAD returned HTTP {}", status)))
    }
  }
}

impl Archive for HttpArchive {
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

    let url = self.artifact_url(build_id);
    if self.exists(&url)? {
      info!(path = %dir.display(), url = %url, "upload skipped, artifact exists in archive");
      return Ok(UploadOutcome::Skipped);
    }

    info!(path = %dir.display(), url = %url, "uploading artifact");
    let mut file = tempfile::tempfile()?;
    {
      let mut writer = tarball::pack_dir(dir, BufWriter::new(&mut file))?;
      writer.flush()?;
    }
    file.seek(SeekFrom::Start(0))?;

    let response = self
      .client
      .put(&url)
      .body(file)
      .send()
      .map_err(|e| transfer_error(&url, e))?;
    let status = response.status();
    if !status.is_success() {
      return Err(transfer_error(&url, format!("PUT returned HTTP {}", status)));
    }

    debug!(url = %url, status = %status, "upload complete");
    Ok(UploadOutcome::Uploaded)
  }

  fn download_package(&self, build_id: &BuildId, dir: &Path) -> Result<bool, ArchiveError> {
    if !self.can_download() {
      return Ok(false);
    }

    let url = self.artifact_url(build_id);
    let mut response = match self.client.get(&url).send() {
      Ok(response) => response,
      Err(e) => {
        warn!(path = %dir.display(), url = %url, error = %e, "download: archive unreachable");
        return Ok(false);
      }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      warn!(path = %dir.display(), url = %url, "download: artifact not found");
      return Ok(false);
    }
    if !status.is_success() {
      return Err(transfer_error(&url, format!("GET returned HTTP {}", status)));
    }

    let mut temp = NamedTempFile::new()?;
    if let Err(e) = stream_body(&mut response, temp.as_file_mut())? {
      warn!(path = %dir.display(), url = %url, error = %e, "download: transfer interrupted");
      return Ok(false);
    }

    tarball::replace_dir_from_file(temp.path(), dir)?;
    info!(path = %dir.display(), url = %url, "download ok");
    Ok(true)
  }

  fn upload_script(&self, build_id_file: &Path, result_file: &Path) -> String {
    if !self.can_upload() {
      return String::new();
    }

    let body = format!(
      "{SCRIPT_URL_VAR}={}/\"${REMOTE_ARTIFACT_VAR}\"\n\
       if ! curl --output /dev/null --silent --head --fail \"${SCRIPT_URL_VAR}\" ; then\n\
       {}\n\
       fi",
      script::quote(&self.url),
      script::indent(&format!(
        "curl -sSg --fail -T \"${LOCAL_ARTIFACT_VAR}\" \"${SCRIPT_URL_VAR}\" {}",
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
      "{SCRIPT_URL_VAR}={}/\"${REMOTE_ARTIFACT_VAR}\"\n\
       curl -sSg --fail -o \"${LOCAL_ARTIFACT_VAR}\" \"${SCRIPT_URL_VAR}\" {}",
      script::quote(&self.url),
      script::download_fallback(),
    );
    script::download_fragment(build_id_file, result_file, &script::indent(&body))
  }
}
