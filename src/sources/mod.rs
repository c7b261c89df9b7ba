//! Dependency sources.
//!
//! A provider turns a package reference into a resolved package the build
//! can consume. The local cache is the only provider shipped.

pub mod cache;
pub mod source;

pub use cache::LocalCache;
pub use source::{DependencyProvider, ResolveError, ResolvedDependency};
