//! `ucbuild inspect` command

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use ucbuild::core::{PackageIdentity, PackageLayout, SourcePatch};
use ucbuild::Recipe;

/// Serializable view of the recipe. Plain values come before tables.
#[derive(Serialize)]
struct RecipeView<'a> {
    requires: Vec<String>,
    exports: &'a [String],
    package: &'a PackageIdentity,
    options: BTreeMap<&'static str, bool>,
    patch: &'a SourcePatch,
    cpp_info: &'a PackageLayout,
}

pub fn execute() -> Result<()> {
    let recipe = Recipe::ucblock();

    let view = RecipeView {
        requires: vec![recipe.requires.to_string()],
        exports: recipe.exports.patterns(),
        package: &recipe.identity,
        options: recipe.options.iter().map(|d| (d.name, d.default)).collect(),
        patch: &recipe.patch,
        cpp_info: &recipe.layout,
    };

    let output = toml::to_string_pretty(&view).context("failed to serialize recipe")?;
    print!("{}", output);

    Ok(())
}
