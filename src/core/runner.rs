//! Default run sequence
//!
//! MUNKI_REPO, trust preference, repositories, recipes. Every step contains
//! its own per-item failures, so the sequence always reaches the recipes.

use crate::{
    autopkg::AutoPkg,
    config::Config,
    core::{
        preferences::{PreferenceConfigurator, PreferenceOutcome},
        recipes::{RecipeExecutor, RecipeReport},
        repositories::{RegistrationReport, RepositoryRegistrar},
    },
};
use tracing::{info, instrument};

/// Summary of one default-mode run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub repo_path: PreferenceOutcome,
    pub trust_info: PreferenceOutcome,
    pub repositories: RegistrationReport,
    pub recipes: RecipeReport,
}

/// Drives the default sequence against an [`AutoPkg`] implementation
pub struct Runner<'a, A: AutoPkg + ?Sized> {
    config: &'a Config,
    autopkg: &'a A,
}

impl<'a, A: AutoPkg + ?Sized> Runner<'a, A> {
    pub fn new(config: &'a Config, autopkg: &'a A) -> Self {
        Self { config, autopkg }
    }

    #[instrument(skip(self))]
    pub fn run(&self) -> RunSummary {
        info!("Starting AutoPkg configuration and recipe execution...");

        let preferences = PreferenceConfigurator::new(self.autopkg);
        let repo_path = preferences.configure_repository_path(self.config);
        let trust_info = preferences.configure_trust_suppression();

        let repositories = RepositoryRegistrar::new(self.autopkg).register_all(&self.config.repos);
        let recipes = RecipeExecutor::new(self.autopkg).run_all(self.config.recipe_names());

        info!(
            "Repositories: {} added, {} already present, {} failed, {} skipped",
            repositories.added.len(),
            repositories.already_present.len(),
            repositories.failed.len(),
            repositories.skipped
        );
        info!(
            "Recipes: {} succeeded, {} failed",
            recipes.succeeded.len(),
            recipes.failed.len()
        );
        info!("AutoPkg runner completed successfully");

        RunSummary {
            repo_path,
            trust_info,
            repositories,
            recipes,
        }
    }
}
