pub const APP_NAME: &str = "artifact-cache";

/// File extension of every stored artifact.
pub const ARTIFACT_EXT: &str = "tgz";

/// Environment variable naming the config file, overriding the default location.
pub const CONFIG_ENV_VAR: &str = "ARTIFACT_CACHE_CONFIG";

/// Absolute path of the local artifact file handed to shell backends.
pub const LOCAL_ARTIFACT_VAR: &str = "LOCAL_ARTIFACT";

/// Sharded relative key (`aa/bb/rest.tgz`) handed to shell backends.
pub const REMOTE_ARTIFACT_VAR: &str = "REMOTE_ARTIFACT";

/// Workspace root variable referenced by generated upload fragments.
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// Hex rendering of the build-id file inside generated fragments.
pub const SCRIPT_BID_VAR: &str = "ARTIFACT_BID";

/// Shell used to run configured upload/download commands (abort on error).
pub const COMMAND_SHELL: &str = "/bin/bash";
pub const COMMAND_SHELL_ARGS: &[&str] = &["-e", "-c"];

/// Environment names forwarded to shell backends when no whitelist is configured.
pub const DEFAULT_ENV_WHITELIST: &[&str] = &["PATH", "HOME", "USER", "LANG", "TERM", "TMPDIR"];
