//! DependencyProvider trait - the boundary to the dependency system.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::PackageReference;

/// Error during dependency resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error("unable to find `{reference}` in {provider}")]
    #[diagnostic(code(ucbuild::resolve::not_found))]
    NotFound {
        reference: PackageReference,
        provider: String,
        #[help]
        available: Option<String>,
    },

    #[error("invalid package info for `{reference}` at {}: {message}", .path.display())]
    #[diagnostic(code(ucbuild::resolve::invalid_package_info))]
    InvalidPackageInfo {
        reference: PackageReference,
        path: PathBuf,
        message: String,
    },

    #[error("failed to read package cache at {}", .path.display())]
    #[diagnostic(code(ucbuild::resolve::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Build a not-found error listing whatever versions the provider does have.
    pub fn not_found(
        reference: &PackageReference,
        provider: impl Into<String>,
        available: &[String],
    ) -> Self {
        let available = if available.is_empty() {
            None
        } else {
            Some(format!("available: {}", available.join(", ")))
        };
        ResolveError::NotFound {
            reference: reference.clone(),
            provider: provider.into(),
            available,
        }
    }
}

/// A dependency after resolution: where it lives and what consumers link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub reference: PackageReference,
    /// Package root folder.
    pub root: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub lib_dirs: Vec<PathBuf>,
    pub bin_dirs: Vec<PathBuf>,
    pub libs: Vec<String>,
}

/// Something that can turn a package reference into a usable package.
pub trait DependencyProvider {
    /// Get the provider name for display.
    fn name(&self) -> &str;

    /// Resolve a reference. Must not touch the consumer's sources.
    fn resolve(&self, reference: &PackageReference) -> Result<ResolvedDependency, ResolveError>;
}
