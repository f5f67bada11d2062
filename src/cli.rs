//! CLI argument parsing for nrgen

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nrgen")]
#[command(version)]
#[command(
    about = "Generate per-architecture syscall number tables from a Linux source tree",
    long_about = None
)]
pub struct Cli {
    /// Root of the Linux source tree to scan
    #[arg(value_name = "LINUX_PATH", default_value = ".")]
    pub linux_path: PathBuf,

    /// Directory receiving one <target>/nr.rs per architecture
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// TOML file overriding the built-in target table and settings
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only generate these targets (repeatable, e.g. -a linux-x86_64)
    #[arg(short = 'a', long = "arch", value_name = "LABEL")]
    pub arch: Vec<String>,

    /// C preprocessor program (default: gcc)
    #[arg(long = "cc", value_name = "PROGRAM")]
    pub cc: Option<String>,

    /// Print the configured targets and exit
    #[arg(long = "list-targets")]
    pub list_targets: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
