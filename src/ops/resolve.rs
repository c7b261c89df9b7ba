//! Dependency resolution for a recipe.

use anyhow::{Context, Result};

use crate::core::Recipe;
use crate::sources::{DependencyProvider, ResolvedDependency};

/// Resolve the recipe's requirement.
///
/// Runs before anything else in the pipeline; on failure nothing has been
/// exported, patched or built.
pub fn resolve_requirements(
    recipe: &Recipe,
    provider: &dyn DependencyProvider,
) -> Result<Vec<ResolvedDependency>> {
    let reference = &recipe.requires;
    eprintln!("   Resolving {}", reference);

    let dep = provider
        .resolve(reference)
        .with_context(|| format!("failed to resolve requirement `{}`", reference))?;

    tracing::debug!("{} resolved to {}", reference, dep.root.display());
    Ok(vec![dep])
}
