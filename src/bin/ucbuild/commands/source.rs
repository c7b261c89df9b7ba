//! `ucbuild source` command

use anyhow::Result;

use super::Session;
use crate::cli::RecipeArgs;
use ucbuild::ops::source;

pub fn execute(args: RecipeArgs) -> Result<()> {
    let session = Session::new(&args, None)?;

    source(&session.recipe, &session.cache, &session.request)?;
    eprintln!(
        "    Finished sources in {}",
        session.request.folders.source.display()
    );

    Ok(())
}
