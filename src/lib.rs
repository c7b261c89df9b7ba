//! ucbuild - builds and packages UCBlock for SMS++
//!
//! This crate provides the library side of the `ucbuild` tool: the recipe
//! definition, dependency resolution, the source patch, the CMake driver
//! and the package step.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test doubles and fixtures for ucbuild unit tests.
///
/// Only available when compiling tests. Provides a fake CMake and helpers
/// that write a UCBlock source tree and a cached dependency.
#[cfg(test)]
pub mod test_support;

pub use self::core::{OptionValues, PackageReference, Recipe, Settings};
pub use util::context::GlobalContext;
