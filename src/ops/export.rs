//! Copy the recipe's exported sources into a fresh sandbox.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::Recipe;
use crate::util::fs::{copy_dir_all, copy_file, ensure_dir, glob_paths, remove_dir_all_if_exists};

/// Export the sources of `recipe` from `recipe_root` into `source_dir`.
///
/// `source_dir` is recreated from scratch, so the patch step always sees an
/// unpatched copy. Returns the exported top-level entries, relative to the
/// sandbox.
pub fn export_sources(recipe: &Recipe, recipe_root: &Path, source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !recipe_root.join(&recipe.patch.file).is_file() {
        bail!(
            "no {} in {}\n\
             help: pass --recipe pointing at the UCBlock source tree",
            recipe.patch.file,
            recipe_root.display()
        );
    }

    remove_dir_all_if_exists(source_dir)?;
    ensure_dir(source_dir)?;

    let mut exported = Vec::new();
    for pattern in recipe.exports.patterns() {
        let matches = glob_paths(recipe_root, pattern)?;
        if matches.is_empty() {
            tracing::warn!("export pattern `{}` matched nothing", pattern);
            continue;
        }

        for path in matches {
            let rel = path
                .strip_prefix(recipe_root)
                .with_context(|| format!("{} is outside the recipe root", path.display()))?
                .to_path_buf();
            let dest = source_dir.join(&rel);

            if path.is_dir() {
                copy_dir_all(&path, &dest)?;
            } else {
                copy_file(&path, &dest)?;
            }
            exported.push(rel);
        }
    }

    if !source_dir.join(&recipe.patch.file).is_file() {
        remove_dir_all_if_exists(source_dir)?;
        bail!(
            "export of {} did not produce {}",
            recipe_root.display(),
            recipe.patch.file
        );
    }

    tracing::info!(
        "Exported {} entries to {}",
        exported.len(),
        source_dir.display()
    );
    Ok(exported)
}
