//! Recipe repository registration
//!
//! `autopkg repo-add` fails for a repository that is already registered, so a
//! failed add is checked against `repo-list` before it is counted as a failure.
//! Each repository is handled independently.

use crate::{autopkg::AutoPkg, config::RepoEntry, error::Result};
use tracing::{debug, error, info, instrument, warn};

/// Per-run tally of repository registration
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    pub added: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<String>,
    /// Entries missing a name or URL
    pub skipped: usize,
}

/// Outcome of registering one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    Added,
    AlreadyPresent,
    Failed,
}

/// Registers configured repositories with AutoPkg
pub struct RepositoryRegistrar<'a, A: AutoPkg + ?Sized> {
    autopkg: &'a A,
}

impl<'a, A: AutoPkg + ?Sized> RepositoryRegistrar<'a, A> {
    pub fn new(autopkg: &'a A) -> Self {
        Self { autopkg }
    }

    /// Register every valid entry, continuing past failures
    #[instrument(skip(self, repos))]
    pub fn register_all(&self, repos: &[RepoEntry]) -> RegistrationReport {
        let mut report = RegistrationReport::default();

        if repos.is_empty() {
            warn!("No repositories specified in config");
            return report;
        }

        info!("Adding {} repository(ies)...", repos.len());
        for entry in repos {
            let Some((name, url)) = entry.valid() else {
                warn!("Skipping invalid repo entry: {:?}", entry);
                report.skipped += 1;
                continue;
            };

            info!("Adding repository: {} ({})", name, url);
            let bucket = match self.register(name, url) {
                Ok(Registration::Added) => &mut report.added,
                Ok(Registration::AlreadyPresent) => &mut report.already_present,
                Ok(Registration::Failed) => &mut report.failed,
                Err(e) => {
                    error!("Error adding repository '{}': {}", name, e);
                    &mut report.failed
                }
            };
            bucket.push(name.to_string());
        }

        report
    }

    fn register(&self, name: &str, url: &str) -> Result<Registration> {
        let result = self.autopkg.add_repository(name)?;

        if result.success {
            info!("Repository '{}' added successfully", name);
            if !result.stdout.is_empty() {
                debug!("{}", result.stdout.trim_end());
            }
            return Ok(Registration::Added);
        }

        debug!(
            "repo-add for '{}' exited with {:?}, checking repo-list",
            name, result.exit_code
        );
        let listing = self.autopkg.list_repositories()?;
        if listing.contains(name) || listing.contains(url) {
            info!("Repository '{}' is already added", name);
            Ok(Registration::AlreadyPresent)
        } else {
            warn!("Failed to add repository '{}', may already exist", name);
            Ok(Registration::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{autopkg::MockAutoPkg, error::RunnerError, utils::ProcessResult};
    use mockall::predicate::eq;

    fn entry(name: &str, url: &str) -> RepoEntry {
        RepoEntry {
            name: Some(name.to_string()),
            url: Some(url.to_string()),
        }
    }

    fn exit(code: i32) -> ProcessResult {
        ProcessResult {
            exit_code: Some(code),
            success: code == 0,
            ..ProcessResult::default()
        }
    }

    #[test]
    fn test_new_repository_is_added() {
        let mut autopkg = MockAutoPkg::new();
        autopkg
            .expect_add_repository()
            .with(eq("recipes"))
            .times(1)
            .returning(|_| Ok(exit(0)));
        autopkg.expect_list_repositories().never();

        let report = RepositoryRegistrar::new(&autopkg)
            .register_all(&[entry("recipes", "https://github.com/autopkg/recipes")]);

        assert_eq!(report.added, vec!["recipes"]);
    }

    #[test]
    fn test_existing_repository_counts_as_success() {
        let mut autopkg = MockAutoPkg::new();
        autopkg.expect_add_repository().returning(|_| Ok(exit(255)));
        autopkg.expect_list_repositories().times(1).returning(|| {
            Ok("/Users/runner/Library/AutoPkg/RecipeRepos/com.github.autopkg.recipes (https://github.com/autopkg/recipes)\n".to_string())
        });

        let report = RepositoryRegistrar::new(&autopkg)
            .register_all(&[entry("recipes", "https://github.com/autopkg/recipes")]);

        assert_eq!(report.already_present, vec!["recipes"]);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_failure_does_not_block_next_repository() {
        let mut autopkg = MockAutoPkg::new();
        autopkg
            .expect_add_repository()
            .with(eq("broken"))
            .returning(|_| Ok(exit(1)));
        autopkg
            .expect_add_repository()
            .with(eq("recipes"))
            .times(1)
            .returning(|_| Ok(exit(0)));
        autopkg
            .expect_list_repositories()
            .returning(|| Ok(String::new()));

        let report = RepositoryRegistrar::new(&autopkg).register_all(&[
            entry("broken", "https://example.com/broken"),
            entry("recipes", "https://github.com/autopkg/recipes"),
        ]);

        assert_eq!(report.failed, vec!["broken"]);
        assert_eq!(report.added, vec!["recipes"]);
    }

    #[test]
    fn test_invocation_error_does_not_block_next_repository() {
        let mut autopkg = MockAutoPkg::new();
        autopkg
            .expect_add_repository()
            .with(eq("first"))
            .returning(|_| Err(RunnerError::command_not_found("autopkg")));
        autopkg
            .expect_add_repository()
            .with(eq("second"))
            .times(1)
            .returning(|_| Ok(exit(0)));

        let report = RepositoryRegistrar::new(&autopkg).register_all(&[
            entry("first", "https://example.com/first"),
            entry("second", "https://example.com/second"),
        ]);

        assert_eq!(report.failed, vec!["first"]);
        assert_eq!(report.added, vec!["second"]);
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let mut autopkg = MockAutoPkg::new();
        autopkg.expect_add_repository().never();

        let report = RepositoryRegistrar::new(&autopkg).register_all(&[
            RepoEntry {
                name: Some("recipes".into()),
                url: None,
            },
            RepoEntry {
                name: Some(String::new()),
                url: Some("https://example.com".into()),
            },
        ]);

        assert_eq!(report.skipped, 2);
        assert!(report.added.is_empty());
    }
}
