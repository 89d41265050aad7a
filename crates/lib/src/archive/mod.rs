//! Pluggable artifact archives.
//!
//! An archive stores the output directory of a build step under its build
//! identifier and restores it later. Every backend supports two modes:
//! - direct transfer from this process (`upload_package`/`download_package`)
//! - shell fragments performing the same transfer from inside a generated
//!   build script (`upload_script`/`download_script`)
//!
//! Direct transfers surface failures as errors, except a missing artifact.
//! Script fragments never abort the enclosing script on cache failures.

pub mod factory;
pub mod http;
pub mod local;
pub mod multi;
pub mod none;
pub mod policy;
pub mod script;
pub mod shell;
pub mod tarball;
pub mod types;

use std::path::Path;

use crate::build_id::BuildId;

pub use factory::{create_archive, create_single_archive};
pub use http::HttpArchive;
pub use local::LocalArchive;
pub use multi::MultiArchive;
pub use none::NoneArchive;
pub use policy::{Operation, Wanted};
pub use shell::ShellArchive;
pub use types::{ArchiveError, UploadOutcome};

/// Common interface of all archive backends.
///
/// Implementations may be called concurrently for different build steps.
/// Capabilities are fixed at construction and evaluated on every call.
pub trait Archive: Send + Sync {
  /// Whether `upload_package` would do anything.
  fn can_upload(&self) -> bool;

  /// Whether `download_package` would do anything.
  fn can_download(&self) -> bool;

  /// Store the contents of `dir` under `build_id`.
  ///
  /// Never overwrites an artifact that already exists.
  fn upload_package(&self, build_id: &BuildId, dir: &Path) -> Result<UploadOutcome, ArchiveError>;

  /// Replace `dir` with the artifact stored under `build_id`.
  ///
  /// Returns `Ok(false)` when the artifact is not available.
  fn download_package(&self, build_id: &BuildId, dir: &Path) -> Result<bool, ArchiveError>;

  /// Shell fragment uploading `result_file` under the id stored in `build_id_file`.
  ///
  /// Empty when upload is disabled.
  fn upload_script(&self, build_id_file: &Path, result_file: &Path) -> String;

  /// Shell fragment fetching `result_file` unless it already exists.
  ///
  /// Empty when download is disabled.
  fn download_script(&self, build_id_file: &Path, result_file: &Path) -> String;
}
