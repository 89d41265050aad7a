//! Artifact encoding: gzip-compressed tar streams.
//!
//! The archive root maps to the artifact directory itself, so entries are
//! stored as `./file`, `./sub/file` and never under a wrapping directory.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{Archive, Builder};
use tracing::debug;

use super::types::ArchiveError;

/// Write a compressed tarball of `dir`'s contents into `writer`.
///
/// Returns the writer once the gzip trailer has been flushed.
pub fn pack_dir<W: Write>(dir: &Path, writer: W) -> Result<W, ArchiveError> {
  let pack_err = |source| ArchiveError::Pack {
    path: dir.to_path_buf(),
    source,
  };

  let mut builder = Builder::new(GzEncoder::new(writer, Compression::default()));
  builder.follow_symlinks(false);
  builder.append_dir_all(".", dir).map_err(pack_err)?;
  let encoder = builder.into_inner().map_err(pack_err)?;
  let writer = encoder.finish().map_err(pack_err)?;

  debug!(dir = %dir.display(), "packed artifact");
  Ok(writer)
}

/// Extract a compressed tarball read from `reader` into `dir`.
pub fn unpack_into<R: Read>(reader: R, dir: &Path) -> Result<(), ArchiveError> {
  let mut archive = Archive::new(GzDecoder::new(reader));
  archive.set_preserve_permissions(true);
  archive.unpack(dir).map_err(|source| ArchiveError::Unpack {
    path: dir.to_path_buf(),
    source,
  })?;

  debug!(dir = %dir.display(), "unpacked artifact");
  Ok(())
}

/// Replace `dir` with the contents of the tarball at `archive_file`.
///
/// Whatever was at `dir` before is removed first.
pub fn replace_dir_from_file(archive_file: &Path, dir: &Path) -> Result<(), ArchiveError> {
  let file = File::open(archive_file)?;
  recreate_dir(dir)?;
  unpack_into(BufReader::new(file), dir)
}

/// Remove whatever is at `dir` and create it again, empty.
pub fn recreate_dir(dir: &Path) -> io::Result<()> {
  match fs::symlink_metadata(dir) {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(dir)?,
    Ok(_) => fs::remove_file(dir)?,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(e),
  }
  fs::create_dir_all(dir)
}
