//! artifact-cache-lib: build artifact archives.
//!
//! This crate stores and restores the output directories of build steps,
//! keyed by a digest of each step's inputs:
//! - `BuildId`: the digest and its sharded storage key
//! - `Archive`: the backend interface (none, file, http, shell, composite)
//! - `CacheConfig`: declarative configuration the backends are built from

pub mod archive;
pub mod build_id;
pub mod config;
pub mod consts;
pub mod platform;
pub mod whitelist;

pub use archive::{Archive, ArchiveError, UploadOutcome, Wanted, create_archive};
pub use build_id::{BuildId, BuildIdError, ShardPath};
pub use config::{ArchiveConfig, ArchiveSpec, CacheConfig, ConfigError};
pub use whitelist::EnvWhitelist;
