//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment with a `file` archive under the temp directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Environment whose config stores artifacts in `<temp>/store`.
  pub fn with_file_store() -> Self {
    let env = Self::empty();
    let store = env.path("store");
    env.write_config(&format!("archive:\n  backend: file\n  path: '{}'\n", store.display()));
    env
  }

  /// Environment without a config file.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.yaml");
    Self { temp, config_path }
  }

  pub fn write_config(&self, content: &str) {
    std::fs::write(&self.config_path, content).unwrap();
  }

  /// Absolute path below the temp directory.
  pub fn path(&self, relative: &str) -> PathBuf {
    let root = dunce::canonicalize(self.temp.path()).unwrap_or_else(|_| self.temp.path().to_path_buf());
    root.join(relative)
  }

  /// Write a small artifact directory and return its path.
  pub fn write_artifact(&self, name: &str) -> PathBuf {
    let dir = self.path(name);
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    std::fs::write(dir.join("bin").join("tool"), "#!/bin/sh\necho tool\n").unwrap();
    std::fs::write(dir.join("VERSION"), "1.2.3\n").unwrap();
    dir
  }

  /// Command for the acache binary reading this environment's config.
  ///
  /// The user config directory is redirected so a developer's own config is never read.
  pub fn acache_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("acache");
    cmd.env("ARTIFACT_CACHE_CONFIG", &self.config_path);
    cmd.env("XDG_CONFIG_HOME", self.path("xdg"));
    cmd.env("APPDATA", self.path("xdg"));
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

pub fn read(path: &Path) -> String {
  std::fs::read_to_string(path).unwrap()
}
