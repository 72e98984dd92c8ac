//! Recipe execution
//!
//! Runs each configured recipe with `autopkg run -v`. A failing recipe, or one
//! that could not be started at all, is logged and the next one still runs.

use crate::autopkg::{AutoPkg, TRUST_INFO_KEY};
use tracing::{error, info, instrument, warn};

/// Per-run tally of recipe results
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeReport {
    pub succeeded: Vec<String>,
    /// Recipe name and exit code (`None` when it never produced one)
    pub failed: Vec<(String, Option<i32>)>,
}

impl RecipeReport {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Runs recipes one at a time through AutoPkg
pub struct RecipeExecutor<'a, A: AutoPkg + ?Sized> {
    autopkg: &'a A,
}

impl<'a, A: AutoPkg + ?Sized> RecipeExecutor<'a, A> {
    pub fn new(autopkg: &'a A) -> Self {
        Self { autopkg }
    }

    /// Run every recipe in order
    #[instrument(skip(self, recipes))]
    pub fn run_all<'r, I>(&self, recipes: I) -> RecipeReport
    where
        I: IntoIterator<Item = &'r str>,
    {
        let recipes: Vec<&str> = recipes.into_iter().filter(|r| !r.is_empty()).collect();
        let mut report = RecipeReport::default();

        if recipes.is_empty() {
            warn!("No recipes specified in config");
            return report;
        }

        info!("Running {} recipe(s)...", recipes.len());
        let env_vars = [(TRUST_INFO_KEY.to_string(), "false".to_string())];

        for recipe in recipes {
            info!("Running recipe: {}", recipe);
            match self.autopkg.run_recipe(recipe, &env_vars) {
                Ok(Some(0)) => {
                    info!("Recipe '{}' completed successfully", recipe);
                    report.succeeded.push(recipe.to_string());
                }
                Ok(Some(code)) => {
                    error!("Recipe '{}' failed with exit code {}", recipe, code);
                    report.failed.push((recipe.to_string(), Some(code)));
                }
                Ok(None) => {
                    error!("Recipe '{}' was terminated by a signal", recipe);
                    report.failed.push((recipe.to_string(), None));
                }
                Err(e) => {
                    error!("Recipe '{}' failed: {}", recipe, e);
                    report.failed.push((recipe.to_string(), None));
                }
            }
        }

        report
    }
}
