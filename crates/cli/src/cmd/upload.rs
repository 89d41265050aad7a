//! Upload command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use artifact_cache_lib::{UploadOutcome, Wanted};

use crate::output::{format_duration, print_info, print_json, print_success, print_warning};

use super::{open_archive, parse_build_id};

/// Archive `dir` under `build_id` in every configured backend that accepts uploads.
///
/// An artifact already present is reported and left untouched.
pub fn cmd_upload(config: Option<&Path>, build_id: &str, dir: &Path, json: bool) -> Result<()> {
  let build_id = parse_build_id(build_id)?;
  let archive = open_archive(config, Wanted::upload_only())?;
  let key = build_id.shard().relative_key();

  let start = Instant::now();
  let outcome = archive
    .upload_package(&build_id, dir)
    .with_context(|| format!("Failed to upload {}", dir.display()))?;
  let elapsed = start.elapsed();

  if json {
    return print_json(&serde_json::json!({
      "build_id": build_id.to_hex(),
      "key": key,
      "outcome": outcome.as_str(),
      "elapsed_ms": elapsed.as_millis() as u64,
    }));
  }

  match outcome {
    UploadOutcome::Uploaded => print_success(&format!(
      "Uploaded {} as {} ({})",
      dir.display(),
      key,
      format_duration(elapsed)
    )),
    UploadOutcome::Skipped => print_info(&format!("{} is already archived", key)),
    UploadOutcome::Disabled => print_warning("No configured archive accepts uploads"),
  }
  Ok(())
}
