//! Default-mode steps
//!
//! Preference configuration, repository registration and recipe execution,
//! plus the runner that sequences them.

pub mod preferences;
pub mod recipes;
pub mod repositories;
pub mod runner;

pub use preferences::{PreferenceConfigurator, PreferenceOutcome};
pub use recipes::{RecipeExecutor, RecipeReport};
pub use repositories::{RegistrationReport, RepositoryRegistrar};
pub use runner::{RunSummary, Runner};
