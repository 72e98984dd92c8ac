//! # AutoPkg Runner
//!
//! Drives AutoPkg from a single `config.yaml`: points it at a Munki
//! repository, registers recipe repositories and runs a list of recipes. A
//! separate upload mode mirrors the Munki repository to an SFTP server.
//!
//! AutoPkg itself is only ever invoked as a subprocess, behind the
//! [`autopkg::AutoPkg`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use autopkg_runner::{autopkg::AutoPkgCli, config::Config, core::Runner};
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("config.yaml"), Path::new("."))?;
//! let summary = Runner::new(&config, &AutoPkgCli::new(false)).run();
//! println!("{} recipe(s) failed", summary.recipes.failed.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod autopkg;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod upload;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
