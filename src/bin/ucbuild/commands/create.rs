//! `ucbuild create` command

use anyhow::{bail, Result};

use super::{cmake, Session};
use crate::cli::CreateArgs;
use ucbuild::ops::{create, publish};

pub fn execute(args: CreateArgs, verbose: bool) -> Result<()> {
    // Validate before anything touches the work directory
    let channel = args.publish.as_deref().map(parse_channel).transpose()?;

    let session = Session::new(&args.recipe, args.jobs)?;
    let cmake = cmake(verbose)?;

    let outcome = create(&session.recipe, &cmake, &session.cache, &session.request)?;
    eprintln!(
        "    Finished {} -> {}",
        session.recipe.reference(),
        outcome.root.display()
    );

    if let Some((user, channel)) = channel {
        let (reference, dest) = publish(&session.recipe, &session.cache, user, channel, &outcome.root)?;
        eprintln!("   Published {} -> {}", reference, dest.display());
    }

    Ok(())
}

fn parse_channel(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('/') {
        Some((user, channel))
            if !user.is_empty() && !channel.is_empty() && !channel.contains('/') =>
        {
            Ok((user, channel))
        }
        _ => bail!("invalid --publish value `{}`, expected USER/CHANNEL", spec),
    }
}
