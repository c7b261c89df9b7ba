//! `ucbuild info` command

use anyhow::Result;

use super::workdir;
use crate::cli::InfoArgs;
use ucbuild::builder::Folders;
use ucbuild::ops::{PackageInfo, PACKAGE_INFO_FILE};
use ucbuild::util::config::load_config;
use ucbuild::util::GlobalContext;
use ucbuild::Recipe;

pub fn execute(args: InfoArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let root = match args.root {
        Some(ref root) => ctx.resolve_path(root),
        None => {
            let config = load_config(&ctx.config_path(), &ctx.project_config_path());
            Folders::in_workdir(workdir(&ctx, &config, args.workdir.as_ref())).package
        }
    };

    // A packaged build records its options; otherwise describe the recipe.
    let info_path = root.join(PACKAGE_INFO_FILE);
    let info = if info_path.is_file() {
        PackageInfo::load(&info_path)?
    } else {
        PackageInfo::from_recipe(&Recipe::ucblock())
    };

    println!("{}", info.render(args.format, &root)?);

    Ok(())
}
