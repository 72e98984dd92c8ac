//! Utility modules for common functionality
//!
//! Provides reusable utilities for local path handling, the process
//! environment and process execution.

pub mod env;
pub mod fs;
pub mod process;

pub use env::EnvUtils;
pub use fs::FileSystemUtils;
pub use process::{ProcessResult, ProcessRunner};
