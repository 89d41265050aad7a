mod download;
mod script;
mod shard;
mod upload;

use std::path::Path;

use anyhow::{Context, Result};
use artifact_cache_lib::{Archive, BuildId, CacheConfig, Wanted, create_archive};
use tracing::debug;

pub use download::cmd_download;
pub use script::cmd_script;
pub use shard::cmd_shard;
pub use upload::cmd_upload;

fn load_config(path: Option<&Path>) -> Result<CacheConfig> {
  match path {
    Some(path) => CacheConfig::load(path).with_context(|| format!("Failed to load config {}", path.display())),
    None => CacheConfig::load_default().context("Failed to load default config"),
  }
}

/// Build the configured archive for the given directions.
fn open_archive(config: Option<&Path>, wanted: Wanted) -> Result<Box<dyn Archive>> {
  let config = load_config(config)?;
  let archive = create_archive(&config.archive, wanted, &config.whitelist).context("Invalid archive configuration")?;
  debug!(
    can_upload = archive.can_upload(),
    can_download = archive.can_download(),
    "archive ready"
  );
  Ok(archive)
}

fn parse_build_id(hex: &str) -> Result<BuildId> {
  BuildId::from_hex(hex).with_context(|| format!("Invalid build id '{}'", hex))
}
