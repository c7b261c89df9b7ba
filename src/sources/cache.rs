//! Local package cache.
//!
//! Packages live at `<root>/<name>/<version>/<user>/<channel>/package`, each
//! with the `package-info.toml` written when it was packaged.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{PackageLayout, PackageReference};
use crate::ops::package_info::{PackageInfo, PACKAGE_INFO_FILE};
use crate::sources::source::{DependencyProvider, ResolveError, ResolvedDependency};
use crate::util::fs::{copy_dir_all, remove_dir_all_if_exists};

/// A package cache on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Create a new local cache rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        LocalCache { root }
    }

    /// Get the cache root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package folder for a reference, whether or not it exists.
    pub fn package_dir(&self, reference: &PackageReference) -> PathBuf {
        self.root.join(reference.cache_path()).join("package")
    }

    /// Copy a finished package folder into the cache, replacing any previous copy.
    pub fn publish(&self, reference: &PackageReference, package_dir: &Path) -> Result<PathBuf> {
        let dest = self.package_dir(reference);
        remove_dir_all_if_exists(&dest)?;
        copy_dir_all(package_dir, &dest)
            .with_context(|| format!("failed to publish `{}` to the local cache", reference))?;
        tracing::info!("Published {} to {}", reference, dest.display());
        Ok(dest)
    }

    /// Every reference of `name` present in the cache.
    pub fn available(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let name_dir = self.root.join(name);
        let mut found = Vec::new();

        if !name_dir.is_dir() {
            return Ok(found);
        }

        for version in read_dirs(&name_dir)? {
            for user in read_dirs(&version)? {
                for channel in read_dirs(&user)? {
                    if channel.join("package").is_dir() {
                        found.push(format!(
                            "{}/{}@{}/{}",
                            name,
                            file_name(&version),
                            file_name(&user),
                            file_name(&channel)
                        ));
                    }
                }
            }
        }

        found.sort();
        Ok(found)
    }
}

impl DependencyProvider for LocalCache {
    fn name(&self) -> &str {
        "the local cache"
    }

    fn resolve(&self, reference: &PackageReference) -> Result<ResolvedDependency, ResolveError> {
        let root = self.package_dir(reference);

        if !root.is_dir() {
            let available = self.available(reference.name())?;
            return Err(ResolveError::not_found(reference, self.name(), &available));
        }

        let info_path = root.join(PACKAGE_INFO_FILE);
        let layout = if info_path.exists() {
            PackageInfo::load(&info_path)
                .map_err(|e| ResolveError::InvalidPackageInfo {
                    reference: reference.clone(),
                    path: info_path.clone(),
                    message: format!("{:#}", e),
                })?
                .cpp_info
        } else {
            tracing::debug!(
                "no {} in {}, assuming default layout",
                PACKAGE_INFO_FILE,
                root.display()
            );
            PackageLayout::default()
        };

        let join_all = |dirs: &[String]| dirs.iter().map(|d| root.join(d)).collect::<Vec<_>>();

        Ok(ResolvedDependency {
            reference: reference.clone(),
            include_dirs: join_all(&layout.includedirs),
            lib_dirs: join_all(&layout.libdirs),
            bin_dirs: join_all(&layout.bindirs),
            libs: layout.libs,
            root,
        })
    }
}

fn read_dirs(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ResolveError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
