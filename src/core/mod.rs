//! Core data structures for ucbuild.
//!
//! This module contains the recipe definition and the types it is made of:
//! - Package references (`name/version@user/channel`)
//! - Build options and host settings
//! - The recipe record itself

pub mod options;
pub mod recipe;
pub mod reference;
pub mod settings;

pub use options::{OptionError, OptionSet, OptionValues};
pub use recipe::{ExportedSourceSet, PackageIdentity, PackageLayout, Recipe, SourcePatch};
pub use reference::{PackageReference, ReferenceError};
pub use settings::{BuildType, Settings};
