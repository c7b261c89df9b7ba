//! Package step: stage the license, install, verify the layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::builder::NativeBuildTool;
use crate::core::{OptionValues, PackageLayout, PackageReference, Recipe, Settings};
use crate::ops::package_info::{PackageInfo, PACKAGE_INFO_FILE};
use crate::ops::recipe_build::ConfiguredBuild;
use crate::sources::LocalCache;
use crate::util::fs::{copy_file, remove_dir_all_if_exists, walk_files, write_string};
use crate::util::hash::sha256_file;

/// File listing every packaged file with its SHA-256.
pub const MANIFEST_FILE: &str = "manifest.txt";

/// Errors from the package step.
#[derive(Debug, Error, Diagnostic)]
pub enum PackageError {
    #[error("license file not found at {}", .path.display())]
    #[diagnostic(
        code(ucbuild::package::missing_license),
        help("the license must be part of the exported sources")
    )]
    MissingLicense { path: PathBuf },

    #[error("include directory `{dir}` missing from package {}", .package.display())]
    #[diagnostic(
        code(ucbuild::package::missing_include_dir),
        help("the install step must place headers under every declared include directory")
    )]
    MissingIncludeDir { dir: String, package: PathBuf },

    #[error("include directory `{dir}` in package {} holds no files", .package.display())]
    #[diagnostic(
        code(ucbuild::package::empty_include_dir),
        help("the install step must place headers under every declared include directory")
    )]
    EmptyIncludeDir { dir: String, package: PathBuf },

    #[error("no artifact for library `{name}` in {searched}")]
    #[diagnostic(
        code(ucbuild::package::missing_library),
        help("expected a file such as lib{name}.a, lib{name}.so, lib{name}.dylib, {name}.lib or {name}.dll")
    )]
    MissingLibrary { name: String, searched: String },

    #[error("build folder {} has not been configured", .build_dir.display())]
    #[diagnostic(
        code(ucbuild::package::not_configured),
        help("run `ucbuild build` or `ucbuild create` first")
    )]
    NotConfigured { build_dir: PathBuf },

    #[error("build configuration changed since the build folder was configured (recorded {recorded}, now {current})")]
    #[diagnostic(
        code(ucbuild::package::configuration_drift),
        help("pass the same options and settings as the build, or run `ucbuild create` to rebuild")
    )]
    ConfigurationDrift { recorded: String, current: String },
}

/// A finished, verified package folder.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    /// Package folder
    pub root: PathBuf,
    /// Library artifacts found for the declared `libs`
    pub libraries: Vec<PathBuf>,
    /// Number of files in the package
    pub files: usize,
}

/// Run the package step against a configured build.
///
/// The package folder is recreated, and removed again if any step fails, so
/// a failed run never leaves a folder behind.
pub fn package(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    build: &ConfiguredBuild,
    options: &OptionValues,
    settings: &Settings,
) -> Result<PackageOutcome> {
    let folders = build.folders();
    eprintln!(" Packaging {} into {}", recipe.reference(), folders.package.display());

    remove_dir_all_if_exists(&folders.package)?;

    let outcome = stage_package(recipe, tool, build, options, settings);
    if outcome.is_err() {
        if let Err(e) = remove_dir_all_if_exists(&folders.package) {
            tracing::warn!("could not remove partial package: {:#}", e);
        }
    }
    outcome
}

fn stage_package(
    recipe: &Recipe,
    tool: &dyn NativeBuildTool,
    build: &ConfiguredBuild,
    options: &OptionValues,
    settings: &Settings,
) -> Result<PackageOutcome> {
    let folders = build.folders();

    let license = folders.source.join(&recipe.license_file);
    if !license.is_file() {
        return Err(PackageError::MissingLicense { path: license }.into());
    }
    copy_file(&license, &folders.package.join("licenses").join("LICENSE"))?;

    tool.install(folders, build.config())?;

    let libraries = verify_layout(&recipe.layout, &folders.package)?;
    for lib in &libraries {
        tracing::debug!("found library {}", lib.display());
    }

    PackageInfo::for_build(recipe, options, settings)
        .save(&folders.package.join(PACKAGE_INFO_FILE))
        .context("failed to write package info")?;

    let files = write_manifest(&folders.package)?;

    Ok(PackageOutcome {
        root: folders.package.clone(),
        libraries,
        files,
    })
}

/// Write the package manifest and return the number of files it lists.
///
/// One `path: sha256` line per file, paths relative to `root` with forward
/// slashes, sorted.
pub fn write_manifest(root: &Path) -> Result<usize> {
    let manifest = root.join(MANIFEST_FILE);
    let mut lines = Vec::new();

    for path in walk_files(root)? {
        if path == manifest {
            continue;
        }
        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("{} is outside the package", path.display()))?;
        let rel = rel.to_string_lossy().replace('\\', "/");
        lines.push(format!("{}: {}", rel, sha256_file(&path)?));
    }

    let mut contents = lines.join("\n");
    contents.push('\n');
    write_string(&manifest, &contents)?;
    Ok(lines.len())
}

/// Check that a package folder provides what its layout promises.
///
/// Every include directory must hold at least one file. Returns the artifact
/// found for each declared library, in declaration order.
pub fn verify_layout(layout: &PackageLayout, root: &Path) -> Result<Vec<PathBuf>, PackageError> {
    for dir in &layout.includedirs {
        let path = root.join(dir);
        if !path.is_dir() {
            return Err(PackageError::MissingIncludeDir {
                dir: dir.clone(),
                package: root.to_path_buf(),
            });
        }
        if !contains_file(&path) {
            return Err(PackageError::EmptyIncludeDir {
                dir: dir.clone(),
                package: root.to_path_buf(),
            });
        }
    }

    let search: Vec<PathBuf> = layout
        .libdirs
        .iter()
        .chain(&layout.bindirs)
        .map(|d| root.join(d))
        .collect();

    let mut found = Vec::new();
    for name in &layout.libs {
        match find_library(&search, name) {
            Some(path) => found.push(path),
            None => {
                return Err(PackageError::MissingLibrary {
                    name: name.clone(),
                    searched: search
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
            }
        }
    }

    Ok(found)
}

fn contains_file(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_type().is_file())
}

fn find_library(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        let mut matches: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| is_library_file(n, name))
            })
            .collect();
        matches.sort();
        if let Some(first) = matches.into_iter().next() {
            return Some(first);
        }
    }
    None
}

/// Whether `file_name` is a library artifact for `name` on any supported
/// platform.
pub fn is_library_file(file_name: &str, name: &str) -> bool {
    if file_name == format!("{name}.lib") || file_name == format!("{name}.dll") {
        return true;
    }

    let Some(rest) = file_name.strip_prefix(&format!("lib{name}")) else {
        return false;
    };

    match rest {
        ".a" | ".so" | ".dylib" | ".dll.a" => true,
        _ => {
            if let Some(version) = rest.strip_prefix(".so.") {
                is_version(version)
            } else if let Some(version) = rest
                .strip_prefix('.')
                .and_then(|r| r.strip_suffix(".dylib"))
            {
                is_version(version)
            } else {
                false
            }
        }
    }
}

fn is_version(s: &str) -> bool {
    !s.is_empty()
        && s.split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Copy a verified package into the local cache under `user/channel`.
pub fn publish(
    recipe: &Recipe,
    cache: &LocalCache,
    user: &str,
    channel: &str,
    package_dir: &Path,
) -> Result<(PackageReference, PathBuf)> {
    let reference = recipe.reference().with_channel(user, channel);
    let dest = cache.publish(&reference, package_dir)?;
    Ok((reference, dest))
}
