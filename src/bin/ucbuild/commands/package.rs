//! `ucbuild package` command

use anyhow::Result;

use super::{cmake, Session};
use crate::cli::RecipeArgs;
use ucbuild::ops::{package, reconfigure};

pub fn execute(args: RecipeArgs, verbose: bool) -> Result<()> {
    let session = Session::new(&args, None)?;
    let cmake = cmake(verbose)?;

    let configured = reconfigure(&session.recipe, &cmake, &session.request)?;
    let outcome = package(
        &session.recipe,
        &cmake,
        &configured,
        &session.request.options,
        &session.request.settings,
    )?;

    eprintln!(
        "    Finished {} ({} files) -> {}",
        session.recipe.reference(),
        outcome.files,
        outcome.root.display()
    );

    Ok(())
}
