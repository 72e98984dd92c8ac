//! AutoPkg preference configuration
//!
//! Writes the Munki repository location and disables trust-info failures.
//! Neither step can abort a run.

use crate::{
    autopkg::{AutoPkg, MUNKI_REPO_KEY, PreferenceValue, TRUST_INFO_KEY},
    config::Config,
    utils::EnvUtils,
};
use tracing::{error, info, instrument, warn};

/// What happened to a single preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceOutcome {
    /// The preference was persisted
    Written,
    /// Nothing to write (unset or nonexistent path)
    Skipped,
    /// The write was attempted and failed
    Failed,
}

/// Applies runner preferences through an [`AutoPkg`] implementation
pub struct PreferenceConfigurator<'a, A: AutoPkg + ?Sized> {
    autopkg: &'a A,
}

impl<'a, A: AutoPkg + ?Sized> PreferenceConfigurator<'a, A> {
    pub fn new(autopkg: &'a A) -> Self {
        Self { autopkg }
    }

    /// Persist `MUNKI_REPO` when the configured path exists on disk
    #[instrument(skip(self, config))]
    pub fn configure_repository_path(&self, config: &Config) -> PreferenceOutcome {
        let Some(repo_path) = config.resolved_repo_path() else {
            warn!("No repo_path specified in config, skipping MUNKI_REPO configuration");
            return PreferenceOutcome::Skipped;
        };

        if !repo_path.exists() {
            warn!("MUNKI_REPO path does not exist: {}", repo_path.display());
            warn!("Skipping MUNKI_REPO configuration");
            return PreferenceOutcome::Skipped;
        }

        info!("Configuring MUNKI_REPO: {}", repo_path.display());
        let value = PreferenceValue::String(repo_path.to_string_lossy().into_owned());
        match self.autopkg.write_preference(MUNKI_REPO_KEY, &value) {
            Ok(()) => {
                info!("MUNKI_REPO configured successfully");
                PreferenceOutcome::Written
            }
            Err(e) => {
                error!("Failed to configure MUNKI_REPO: {}", e);
                PreferenceOutcome::Failed
            }
        }
    }

    /// Stop AutoPkg from failing recipes that lack trust info.
    ///
    /// The environment variable is set for this process and its children even
    /// when the preference write fails; some AutoPkg versions read it first.
    #[instrument(skip(self))]
    pub fn configure_trust_suppression(&self) -> PreferenceOutcome {
        info!("Configuring AutoPkg trust info preference...");

        let outcome = match self
            .autopkg
            .write_preference(TRUST_INFO_KEY, &PreferenceValue::Bool(false))
        {
            Ok(()) => {
                info!("{} configured", TRUST_INFO_KEY);
                PreferenceOutcome::Written
            }
            Err(e) => {
                warn!("Failed to configure trust info preference: {}", e);
                PreferenceOutcome::Failed
            }
        };

        EnvUtils::set_var(TRUST_INFO_KEY, "false");

        outcome
    }
}
