//! `ucbuild build` command

use anyhow::Result;

use super::{cmake, Session};
use crate::cli::BuildArgs;
use ucbuild::ops::{build, configure};

pub fn execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let session = Session::new(&args.recipe, args.jobs)?;
    let cmake = cmake(verbose)?;

    let configured = configure(&session.recipe, &cmake, &session.request)?;
    build(&session.recipe, &cmake, &configured, session.request.jobs)?;

    eprintln!(
        "    Finished build in {}",
        configured.folders().build.display()
    );

    Ok(())
}
