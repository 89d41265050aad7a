mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// acache - store and restore build step outputs
#[derive(Parser)]
#[command(name = "acache")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Archive config file (default: $ARTIFACT_CACHE_CONFIG, then the user config dir)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the archive key of a build id
  Shard {
    /// Build id as hex
    build_id: String,
  },

  /// Archive a build output directory
  Upload {
    /// Build id as hex
    build_id: String,
    /// Directory to archive
    dir: PathBuf,
  },

  /// Restore a build output directory from the archive
  Download {
    /// Build id as hex
    build_id: String,
    /// Directory to replace with the archived contents
    dir: PathBuf,
  },

  /// Print the shell fragment transferring a build result
  Script {
    #[arg(value_enum)]
    direction: Direction,

    /// File holding the raw build id bytes, read when the fragment runs
    #[arg(long)]
    build_id_file: PathBuf,

    /// Result tarball read on upload or written on download
    #[arg(long)]
    result: PathBuf,
  },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
  Upload,
  Download,
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let config = cli.config.as_deref();
  let json = cli.output.is_json();

  match cli.command {
    Commands::Shard { build_id } => cmd::cmd_shard(&build_id, json),
    Commands::Upload { build_id, dir } => cmd::cmd_upload(config, &build_id, &dir, json),
    Commands::Download { build_id, dir } => cmd::cmd_download(config, &build_id, &dir, json),
    Commands::Script {
      direction,
      build_id_file,
      result,
    } => cmd::cmd_script(config, direction, &build_id_file, &result, json),
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
