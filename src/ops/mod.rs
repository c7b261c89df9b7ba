//! High-level operations.
//!
//! This module contains the implementation of the ucbuild commands.

pub mod export;
pub mod package;
pub mod package_info;
pub mod recipe_build;
pub mod resolve;

pub use export::export_sources;
pub use package::{package, publish, verify_layout, PackageError, PackageOutcome};
pub use package_info::{InfoFormat, PackageInfo, PACKAGE_INFO_FILE};
pub use recipe_build::{build, configure, create, reconfigure, source, BuildRequest, ConfiguredBuild};
pub use resolve::resolve_requirements;
