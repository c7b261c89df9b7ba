//! `ucbuild clean` command

use anyhow::Result;

use super::workdir;
use crate::cli::CleanArgs;
use ucbuild::util::config::load_config;
use ucbuild::util::fs::remove_dir_all_if_exists;
use ucbuild::util::GlobalContext;

pub fn execute(args: CleanArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = load_config(&ctx.config_path(), &ctx.project_config_path());

    let dir = workdir(&ctx, &config, args.workdir.as_ref());
    remove_dir_all_if_exists(&dir)?;
    eprintln!("     Removed {}", dir.display());

    Ok(())
}
