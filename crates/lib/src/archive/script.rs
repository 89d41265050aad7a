//! Shell fragments for cache transfers inside generated build scripts.
//!
//! Every fragment derives the same two values as the direct mode hands to
//! shell backends: `LOCAL_ARTIFACT` (the result tarball) and
//! `REMOTE_ARTIFACT` (the sharded key, computed from a hex dump of the
//! build-id file). Transfers are always followed by a fallback that only
//! reports the failure, so an unreachable cache never aborts the script.

use std::path::Path;

use crate::consts::{ARTIFACT_EXT, LOCAL_ARTIFACT_VAR, REMOTE_ARTIFACT_VAR, SCRIPT_BID_VAR, WORKSPACE_VAR};

const INDENT: &str = "    ";

/// Heredoc delimiter around spliced user commands.
const COMMAND_DELIMITER: &str = "ARTIFACT_COMMAND";

/// POSIX single-quote `value` unless it only holds shell-safe characters.
pub fn quote(value: &str) -> String {
  let safe = !value.is_empty()
    && value
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | '@' | '%' | ',' | '='));
  if safe {
    value.to_string()
  } else {
    format!("'{}'", value.replace('\'', "'\\''"))
  }
}

pub fn quote_path(path: &Path) -> String {
  quote(&path.to_string_lossy())
}

/// Lines defining the hex build id, `LOCAL_ARTIFACT` and `REMOTE_ARTIFACT`.
fn artifact_vars(build_id_file: &Path, result_file: &Path) -> Vec<String> {
  vec![
    format!(
      "{SCRIPT_BID_VAR}=\"$(hexdump -ve '/1 \"%02x\"' {})\"",
      quote_path(build_id_file)
    ),
    format!("{LOCAL_ARTIFACT_VAR}={}", quote_path(result_file)),
    format!(
      "{REMOTE_ARTIFACT_VAR}=\"${{{SCRIPT_BID_VAR}:0:2}}/${{{SCRIPT_BID_VAR}:2:2}}/${{{SCRIPT_BID_VAR}:4}}.{ARTIFACT_EXT}\""
    ),
  ]
}

/// Non-aborting suffix for an upload transfer command.
pub fn upload_fallback() -> &'static str {
  "|| echo \"Upload failed: $?\""
}

/// Non-aborting suffix for a download transfer command.
///
/// Drops any partial result so the step still rebuilds.
pub fn download_fallback() -> String {
  format!("|| {{ ARTIFACT_STATUS=$? ; rm -f \"${LOCAL_ARTIFACT_VAR}\" ; echo \"Download failed: $ARTIFACT_STATUS\" ; }}")
}

/// Run a user command verbatim under `bash -e`, followed by `fallback`.
///
/// The command reads `LOCAL_ARTIFACT` and `REMOTE_ARTIFACT` from the environment,
/// so both are exported first. A quoted heredoc keeps the text unexpanded
/// and the delimiter must stay unindented.
pub fn errexit_command(cmd: &str, fallback: &str) -> String {
  format!(
    "export {LOCAL_ARTIFACT_VAR} {REMOTE_ARTIFACT_VAR}\n\
     bash -e <<'{COMMAND_DELIMITER}' {fallback}\n\
     {}\n\
     {COMMAND_DELIMITER}",
    cmd.trim_end()
  )
}

/// Wrap `body` as an upload fragment.
///
/// The body runs from the workspace root after the artifact variables are set.
pub fn upload_fragment(build_id_file: &Path, result_file: &Path, body: &str) -> String {
  let mut script = String::from("# upload artifact\n");
  script.push_str(&format!("cd \"${WORKSPACE_VAR}\"\n"));
  for line in artifact_vars(build_id_file, result_file) {
    script.push_str(&line);
    script.push('\n');
  }
  script.push_str(body.trim_end_matches('\n'));
  script.push('\n');
  script
}

/// Wrap `body` as a download fragment that only runs when the result is missing.
///
/// Generated lines are indented, `body` is spliced as given.
pub fn download_fragment(build_id_file: &Path, result_file: &Path, body: &str) -> String {
  let mut script = format!("if [[ ! -e {} ]] ; then\n", quote_path(result_file));
  for line in artifact_vars(build_id_file, result_file) {
    script.push_str(INDENT);
    script.push_str(&line);
    script.push('\n');
  }
  script.push_str(body.trim_end_matches('\n'));
  script.push_str("\nfi\n");
  script
}

/// Indent every non-empty line of generated text for use inside a block.
pub fn indent(text: &str) -> String {
  text
    .lines()
    .map(|line| {
      if line.is_empty() {
        String::new()
      } else {
        format!("{INDENT}{line}")
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}
