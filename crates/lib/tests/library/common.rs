//! Shared helpers for archive integration tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use artifact_cache_lib::{Archive, BuildId, CacheConfig, Wanted, create_archive};
use walkdir::WalkDir;

/// Entry in a flattened directory tree: `None` for directories, file bytes otherwise.
pub type Tree = BTreeMap<PathBuf, Option<Vec<u8>>>;

pub fn build_id(hex: &str) -> BuildId {
  BuildId::from_hex(hex).unwrap()
}

/// Write a small but nested artifact below `root/name`.
pub fn write_artifact(root: &Path, name: &str) -> PathBuf {
  let dir = root.join(name);
  fs::create_dir_all(dir.join("bin")).unwrap();
  fs::create_dir_all(dir.join("share").join("doc")).unwrap();
  fs::create_dir_all(dir.join("empty")).unwrap();
  fs::write(dir.join("bin").join("app"), b"\x7fELF fake binary").unwrap();
  fs::write(dir.join("share").join("doc").join("README"), "docs\n").unwrap();
  fs::write(dir.join("manifest.json"), r#"{"name":"app"}"#).unwrap();
  dir
}

/// Flatten a directory into relative paths and contents.
pub fn read_tree(root: &Path) -> Tree {
  WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .map(|entry| {
      let entry = entry.unwrap();
      let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
      let content = entry.file_type().is_file().then(|| fs::read(entry.path()).unwrap());
      (rel, content)
    })
    .collect()
}

/// Build an archive from inline YAML.
pub fn archive_from_yaml(yaml: &str, wanted: Wanted) -> Box<dyn Archive> {
  let config = CacheConfig::from_yaml(yaml).unwrap();
  create_archive(&config.archive, wanted, &config.whitelist).unwrap()
}

pub fn file_archive(store: &Path, wanted: Wanted) -> Box<dyn Archive> {
  archive_from_yaml(
    &format!("archive:\n  backend: file\n  path: '{}'\n", store.display()),
    wanted,
  )
}

/// Write raw build id bytes to `root/build-id`, as a build step would.
pub fn build_id_file(root: &Path, bytes: &[u8]) -> PathBuf {
  let path = root.join("build-id");
  fs::write(&path, bytes).unwrap();
  path
}
