//! Command implementations for the CLI

use crate::{
    autopkg::AutoPkgCli,
    cli::Args,
    config::{Config, DEFAULT_CONFIG_FILE},
    core::Runner,
    upload,
    utils::fs::FileSystemUtils,
};
use anyhow::Context;
use tracing::{info, instrument};

/// Load the configuration and run the mode selected on the command line
#[instrument(skip(args))]
pub fn execute_command(args: &Args) -> anyhow::Result<()> {
    let install_dir = FileSystemUtils::new().install_dir();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| install_dir.join(DEFAULT_CONFIG_FILE));

    let config = Config::load(&config_path, &install_dir)?;

    if args.upload {
        execute_upload_command(&config)
    } else {
        execute_run_command(&config, args.debug)
    }
}

/// Configure AutoPkg, add repositories and run recipes
#[instrument(skip(config, verbose))]
fn execute_run_command(config: &Config, verbose: bool) -> anyhow::Result<()> {
    let autopkg = AutoPkgCli::new(verbose);
    Runner::new(config, &autopkg).run();
    Ok(())
}

/// Mirror the Munki repository to the SFTP server
#[instrument(skip(config))]
fn execute_upload_command(config: &Config) -> anyhow::Result<()> {
    let target = config
        .sftp_host
        .clone()
        .unwrap_or_else(|| String::from("<unset>"));
    upload::upload_repository(config)
        .with_context(|| format!("SFTP upload to {target} failed"))?;
    info!("Upload finished");
    Ok(())
}
