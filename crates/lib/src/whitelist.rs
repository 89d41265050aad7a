//! Environment variables allowed to reach external cache commands.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ENV_WHITELIST;

/// Names of environment variables forwarded to spawned cache commands.
///
/// Everything not listed here is stripped from the subprocess environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvWhitelist(BTreeSet<String>);

impl EnvWhitelist {
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(names.into_iter().map(Into::into).collect())
  }

  pub fn empty() -> Self {
    Self(BTreeSet::new())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  /// Keep only the whitelisted entries of `vars`.
  pub fn filter<I>(&self, vars: I) -> BTreeMap<String, String>
  where
    I: IntoIterator<Item = (String, String)>,
  {
    vars.into_iter().filter(|(name, _)| self.contains(name)).collect()
  }

  /// Whitelisted entries of the current process environment.
  pub fn capture(&self) -> BTreeMap<String, String> {
    self.filter(std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))))
  }
}

impl Default for EnvWhitelist {
  fn default() -> Self {
    Self::new(DEFAULT_ENV_WHITELIST.iter().copied())
  }
}
