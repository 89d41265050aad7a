//! Error and outcome types shared by all archive backends.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an archive operation.
///
/// A missing artifact is never an error: downloads report it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum ArchiveError {
  /// The configured backend kind is not known.
  #[error("invalid archive backend: {0}")]
  InvalidBackend(String),

  /// A backend was configured without a parameter it cannot work without.
  #[error("archive backend '{backend}' requires '{field}'")]
  MissingField {
    backend: &'static str,
    field: &'static str,
  },

  /// HTTP transfer failed with something other than a clean "not found".
  #[error("http transfer failed for {url}: {message}")]
  Http { url: String, message: String },

  /// The configured upload command exited unsuccessfully.
  #[error("upload failed: command returned with status {}", display_code(.code))]
  UploadCommandFailed { code: Option<i32> },

  /// Serializing a directory into a compressed tarball failed.
  #[error("failed to pack {path}: {source}")]
  Pack {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Extracting a compressed tarball into a directory failed.
  #[error("failed to unpack into {path}: {source}")]
  Unpack {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Any other local I/O failure (temp files, directories, spawning commands).
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "unknown (terminated by signal)".to_string(),
  }
}

/// What an upload call did.
///
/// Ordered by strength so a composite can report the strongest outcome of
/// its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadOutcome {
  /// Upload is not enabled for this backend; nothing happened.
  Disabled,
  /// The artifact was already present, nothing was written.
  Skipped,
  /// The artifact was written.
  Uploaded,
}

impl UploadOutcome {
  pub fn as_str(self) -> &'static str {
    match self {
      UploadOutcome::Disabled => "disabled",
      UploadOutcome::Skipped => "skipped",
      UploadOutcome::Uploaded => "uploaded",
    }
  }
}
