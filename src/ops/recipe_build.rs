//! The recipe pipeline: resolve, export, patch, configure, build, package.
//!
//! Each step can run on its own against an existing work directory. The
//! configuration is derived once per run and the resulting [`ConfiguredBuild`]
//! is handed to every later step.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};

use crate::builder::patch::patch_file;
use crate::builder::{buildinfo, BuildConfiguration, Folders, NativeBuildTool};
use crate::core::{OptionValues, Recipe, Settings};
use crate::ops::export::export_sources;
use crate::ops::package::{package, PackageError, PackageOutcome};
use crate::ops::resolve::resolve_requirements;
use crate::sources::{DependencyProvider, ResolvedDependency};
use crate::util::fs::{read_to_string, write_string};

/// File in the build folder recording the configuration fingerprint.
pub const CONFIGURATION_RECORD: &str = ".ucbuild-configuration";

/// Inputs to one run of the pipeline.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Directory holding the recipe's sources
    pub recipe_root: PathBuf,
    pub folders: Folders,
    pub options: OptionValues,
    pub settings: Settings,
    pub generator: Option<String>,
    /// Extra `-D` definitions
    pub defines: BTreeMap<String, String>,
    pub jobs: Option<usize>,
}

impl BuildRequest {
    /// A request with the recipe's default options for the host.
    pub fn new(recipe: &Recipe, recipe_root: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        let settings = Settings::host();
        BuildRequest {
            recipe_root: recipe_root.into(),
            folders: Folders::in_workdir(workdir),
            options: recipe.options.defaults().for_os(&settings.os),
            settings,
            generator: None,
            defines: BTreeMap::new(),
            jobs: None,
        }
    }

    /// Derive the build configuration for this request.
    pub fn configuration(&self) -> BuildConfiguration {
        BuildConfiguration::derive(
            &self.options,
            &self.settings,
            &self.folders,
            self.generator.as_deref(),
            &self.defines,
        )
    }
}

/// Handle to a configured build folder.
#[derive(Debug, Clone)]
pub struct ConfiguredBuild {
    config: BuildConfiguration,
    folders: Folders,
    fingerprint: String,
}

impl ConfiguredBuild {
    pub fn config(&self) -> &BuildConfiguration {
        &self.config
    }

    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Resolve the dependency, export the sources and patch them.
///
/// Resolution runs first; if it fails the work directory is not touched.
pub fn source(
    recipe: &Recipe,
    provider: &dyn DependencyProvider,
    request: &BuildRequest,
) -> Result<Vec<ResolvedDependency>> {
    let deps = resolve_requirements(recipe, provider)?;
    let folders = &request.folders;

    eprintln!(" Exporting {} to {}", recipe.reference(), folders.source.display());
    export_sources(recipe, &request.recipe_root, &folders.source)?;

    patch_file(&folders.source.join(&recipe.patch.file), &recipe.patch.anchor)?;
    buildinfo::write(&folders.build, &deps)?;

    Ok(deps)
}

/// Configure the build folder and record the configuration.
pub fn configure(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    request: &BuildRequest,
) -> Result<ConfiguredBuild> {
    let folders = request.folders.clone();
    if !folders.source.join(&recipe.patch.file).is_file() {
        bail!(
            "no exported sources in {}\n\
             help: run `ucbuild source` first",
            folders.source.display()
        );
    }

    let config = request.configuration();
    eprintln!(
        "Configuring {} ({}, {})",
        recipe.reference(),
        request.options,
        config.build_type()
    );
    tool.configure(&folders, &config)?;

    let fingerprint = config.fingerprint();
    write_string(&folders.build.join(CONFIGURATION_RECORD), &fingerprint)?;
    tracing::debug!("configuration fingerprint {}", fingerprint);

    Ok(ConfiguredBuild {
        config,
        folders,
        fingerprint,
    })
}

/// Configure a build folder configured by an earlier run, failing if the
/// configuration no longer matches.
pub fn reconfigure(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    request: &BuildRequest,
) -> Result<ConfiguredBuild> {
    let record = request.folders.build.join(CONFIGURATION_RECORD);
    if !record.is_file() {
        return Err(PackageError::NotConfigured {
            build_dir: request.folders.build.clone(),
        }
        .into());
    }

    let recorded = read_to_string(&record)?.trim().to_string();
    let current = request.configuration().fingerprint();
    if recorded != current {
        return Err(PackageError::ConfigurationDrift { recorded, current }.into());
    }

    configure(recipe, tool, request)
}

/// Compile a configured build.
pub fn build(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    configured: &ConfiguredBuild,
    jobs: Option<usize>,
) -> Result<()> {
    eprintln!("  Compiling {}", recipe.reference());
    tool.build(configured.folders(), configured.config(), jobs)
}

/// Run the whole pipeline and return the verified package.
pub fn create(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    provider: &dyn DependencyProvider,
    request: &BuildRequest,
) -> Result<PackageOutcome> {
    let start = Instant::now();

    source(recipe, provider, request)?;
    let configured = configure(recipe, tool, request)?;
    build(recipe, tool, &configured, request.jobs)?;
    let outcome = package(recipe, tool, &configured, &request.options, &request.settings)?;

    tracing::info!(
        "created {} in {:.2}s",
        recipe.reference(),
        start.elapsed().as_secs_f64()
    );
    Ok(outcome)
}
