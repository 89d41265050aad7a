//! Per-backend enable/disable policy.
//!
//! A backend may act in a direction only when the configuration allows it
//! (`flags`) and the caller wants it for the current invocation. Both halves
//! are fixed at construction; the conjunction is evaluated on every check.

use serde::{Deserialize, Serialize};

/// A transfer direction as named in configuration `flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
  Upload,
  Download,
}

impl Operation {
  pub const ALL: [Operation; 2] = [Operation::Upload, Operation::Download];
}

/// Directions the caller wants for this invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wanted {
  pub upload: bool,
  pub download: bool,
}

impl Wanted {
  pub fn both() -> Self {
    Self {
      upload: true,
      download: true,
    }
  }

  pub fn upload_only() -> Self {
    Self {
      upload: true,
      download: false,
    }
  }

  pub fn download_only() -> Self {
    Self {
      upload: false,
      download: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
  allow_upload: bool,
  allow_download: bool,
  wanted: Wanted,
}

impl Policy {
  pub fn new(allowed: &[Operation], wanted: Wanted) -> Self {
    Self {
      allow_upload: allowed.contains(&Operation::Upload),
      allow_download: allowed.contains(&Operation::Download),
      wanted,
    }
  }

  pub fn can_upload(&self) -> bool {
    self.allow_upload && self.wanted.upload
  }

  pub fn can_download(&self) -> bool {
    self.allow_download && self.wanted.download
  }
}
