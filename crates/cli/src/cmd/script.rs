use std::path::Path;

use anyhow::Result;
use artifact_cache_lib::Wanted;

use crate::Direction;
use crate::output::print_json;

use super::open_archive;

/// Print the combined fragment of all capable backends; nothing when none are.
pub fn cmd_script(
  config: Option<&Path>,
  direction: Direction,
  build_id_file: &Path,
  result: &Path,
  json: bool,
) -> Result<()> {
  let script = match direction {
    Direction::Upload => open_archive(config, Wanted::upload_only())?.upload_script(build_id_file, result),
    Direction::Download => open_archive(config, Wanted::download_only())?.download_script(build_id_file, result),
  };

  if json {
    print_json(&serde_json::json!({ "script": script }))?;
  } else {
    print!("{}", script);
  }
  Ok(())
}
