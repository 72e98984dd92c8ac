//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// AutoPkg Runner - Configure AutoPkg and run recipes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "autopkg-runner")]
pub struct Args {
    /// Upload munki repository to SFTP server without running recipes
    #[arg(long)]
    pub upload: bool,

    /// Path to config.yaml file (default: config.yaml beside the executable)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
