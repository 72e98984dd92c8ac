//! AutoPkg command-line interface
//!
//! Everything the runner asks of AutoPkg goes through the [`AutoPkg`] trait so
//! the components can be exercised without the real binary. [`AutoPkgCli`]
//! shells out to `autopkg` and `defaults` and only looks at exit codes and
//! captured text.

use crate::{
    error::Result,
    utils::process::{ProcessResult, ProcessRunner},
};
use std::fmt;
use tracing::instrument;

/// Preference domain AutoPkg reads its settings from
pub const PREFERENCE_DOMAIN: &str = "com.github.autopkg";

/// Preference key holding the Munki repository location
pub const MUNKI_REPO_KEY: &str = "MUNKI_REPO";

/// Preference (and environment variable) controlling trust-info failures
pub const TRUST_INFO_KEY: &str = "FAIL_RECIPES_WITHOUT_TRUST_INFO";

/// Value written to the AutoPkg preference store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    String(String),
    Bool(bool),
}

impl PreferenceValue {
    /// `defaults write` arguments following the key
    fn to_args(&self) -> Vec<String> {
        match self {
            Self::String(value) => vec![value.clone()],
            Self::Bool(value) => vec!["-bool".to_string(), value.to_string()],
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Operations the runner needs from AutoPkg
#[cfg_attr(test, mockall::automock)]
pub trait AutoPkg {
    /// Persist a preference in the AutoPkg preference domain
    fn write_preference(&self, key: &str, value: &PreferenceValue) -> Result<()>;

    /// `autopkg repo-add`; a non-zero exit is returned, not raised
    fn add_repository(&self, name: &str) -> Result<ProcessResult>;

    /// `autopkg repo-list` standard output
    fn list_repositories(&self) -> Result<String>;

    /// `autopkg run -v`, returning the exit code (`None` if killed by a signal)
    fn run_recipe(&self, recipe: &str, env_vars: &[(String, String)]) -> Result<Option<i32>>;
}

/// [`AutoPkg`] backed by the real `autopkg` and `defaults` executables
#[derive(Debug, Clone)]
pub struct AutoPkgCli {
    autopkg: String,
    defaults: String,
    process_runner: ProcessRunner,
}

impl AutoPkgCli {
    /// Use `autopkg` and `defaults` from `PATH`
    #[must_use]
    pub fn new(debug: bool) -> Self {
        Self::with_programs("autopkg", "defaults", debug)
    }

    /// Use explicit program names or paths
    #[must_use]
    pub fn with_programs(
        autopkg: impl Into<String>,
        defaults: impl Into<String>,
        debug: bool,
    ) -> Self {
        Self {
            autopkg: autopkg.into(),
            defaults: defaults.into(),
            process_runner: ProcessRunner::new(debug),
        }
    }
}

impl AutoPkg for AutoPkgCli {
    #[instrument(skip(self))]
    fn write_preference(&self, key: &str, value: &PreferenceValue) -> Result<()> {
        let mut args = vec!["write".to_string(), PREFERENCE_DOMAIN.to_string(), key.to_string()];
        args.extend(value.to_args());

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.process_runner.run_command(&self.defaults, &args)
    }

    #[instrument(skip(self))]
    fn add_repository(&self, name: &str) -> Result<ProcessResult> {
        self.process_runner
            .run_command_with_output(&self.autopkg, &["repo-add", name])
    }

    #[instrument(skip(self))]
    fn list_repositories(&self) -> Result<String> {
        let result = self
            .process_runner
            .run_command_with_output(&self.autopkg, &["repo-list"])?;
        Ok(result.stdout)
    }

    #[instrument(skip(self, env_vars))]
    fn run_recipe(&self, recipe: &str, env_vars: &[(String, String)]) -> Result<Option<i32>> {
        self.process_runner
            .run_command_with_env(&self.autopkg, &["run", "-v", recipe], env_vars)
    }
}
