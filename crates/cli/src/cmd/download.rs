//! Download command implementation.
//!
//! A missing artifact is a normal outcome and exits successfully.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use artifact_cache_lib::Wanted;

use crate::output::{format_duration, print_info, print_json, print_success, print_warning};

use super::{open_archive, parse_build_id};

pub fn cmd_download(config: Option<&Path>, build_id: &str, dir: &Path, json: bool) -> Result<()> {
  let build_id = parse_build_id(build_id)?;
  let archive = open_archive(config, Wanted::download_only())?;
  let key = build_id.shard().relative_key();

  if !archive.can_download() && !json {
    print_warning("No configured archive serves downloads");
  }

  let start = Instant::now();
  let found = archive
    .download_package(&build_id, dir)
    .with_context(|| format!("Failed to download {}", key))?;
  let elapsed = start.elapsed();

  if json {
    return print_json(&serde_json::json!({
      "build_id": build_id.to_hex(),
      "key": key,
      "found": found,
      "elapsed_ms": elapsed.as_millis() as u64,
    }));
  }

  if found {
    print_success(&format!(
      "Restored {} into {} ({})",
      key,
      dir.display(),
      format_duration(elapsed)
    ));
  } else {
    print_info(&format!("{} not found in archive", key));
  }
  Ok(())
}
