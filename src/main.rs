#![allow(clippy::cargo_common_metadata)]
use autopkg_runner::{cli, setup_logging};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = cli::parse_args();

    // Setup logging based on debug flag
    if let Err(e) = setup_logging(args.debug) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    // Execute the selected mode; any error escaping it is fatal
    match cli::execute_command(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("AutoPkg runner failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
