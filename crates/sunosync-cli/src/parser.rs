//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface of the feed mirror.
#[derive(Parser)]
#[command(name = "sunosync")]
#[command(about = "Mirror a Suno feed to a local folder and keep it complete")]
#[command(version)]
pub struct Cli {
    /// Output directory (falls back to $SUNOSYNC_OUT_DIR, then ./out)
    #[arg(long = "out-dir", global = true)]
    pub out_dir: Option<String>,

    /// Log file (defaults to <out-dir>/<command>.log)
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
