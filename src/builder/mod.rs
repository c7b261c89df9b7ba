//! Native build integration.
//!
//! This module holds everything that talks to CMake: the configuration
//! derivation, the CMake driver, the one-shot source patch and the generated
//! build-metadata file.

pub mod buildinfo;
pub mod cmake;
pub mod configuration;
pub mod patch;

pub use cmake::{CMake, NativeBuildTool};
pub use configuration::{BuildConfiguration, Folders, BUILD_TESTING};
pub use patch::{find_anchor, AnchorLookup, PatchError};
