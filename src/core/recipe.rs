//! The UCBlock recipe definition.
//!
//! Everything here is fixed at authoring time. A [`Recipe`] is built once at
//! startup and handed by reference to every step of the pipeline.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::options::OptionSet;
use crate::core::reference::PackageReference;

/// Identity of the produced package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: Version,
    pub description: String,
    pub topics: Vec<String>,
    pub url: String,
    pub homepage: String,
    pub license: String,
}

/// Ordered globs, relative to the recipe root, copied into the build sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportedSourceSet {
    patterns: Vec<String>,
}

impl ExportedSourceSet {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ExportedSourceSet {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// One-shot edit applied to the sandboxed build description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePatch {
    /// File to patch, relative to the source folder.
    pub file: String,
    /// Text the dependency setup is inserted after.
    pub anchor: String,
}

/// Where the package puts things, as consumers see it.
///
/// This must match what the install step writes, otherwise downstream
/// linking fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLayout {
    pub includedirs: Vec<String>,
    #[serde(default = "default_libdirs")]
    pub libdirs: Vec<String>,
    #[serde(default = "default_bindirs")]
    pub bindirs: Vec<String>,
    #[serde(default)]
    pub libs: Vec<String>,
}

fn default_libdirs() -> Vec<String> {
    vec!["lib".to_string()]
}

fn default_bindirs() -> Vec<String> {
    vec!["bin".to_string()]
}

impl Default for PackageLayout {
    fn default() -> Self {
        PackageLayout {
            includedirs: vec!["include".to_string()],
            libdirs: default_libdirs(),
            bindirs: default_bindirs(),
            libs: Vec::new(),
        }
    }
}

/// The complete recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub identity: PackageIdentity,
    pub options: OptionSet,
    pub requires: PackageReference,
    pub exports: ExportedSourceSet,
    pub patch: SourcePatch,
    /// License file, relative to the source folder.
    pub license_file: String,
    pub layout: PackageLayout,
}

impl Recipe {
    /// The UCBlock 0.6.2 recipe.
    pub fn ucblock() -> Self {
        Recipe {
            identity: PackageIdentity {
                name: "ucblock".to_string(),
                version: Version::new(0, 6, 2),
                description: "Unit Commitment Blocks for SMS++".to_string(),
                topics: vec!["conan".into(), "smspp".into(), "ucblock".into()],
                url: "https://gitlab.com/smspp/ucblock".to_string(),
                homepage: "https://gitlab.com/smspp/ucblock".to_string(),
                license: "GPL-3.0-only".to_string(),
            },
            options: OptionSet::standard(),
            requires: PackageReference::new("smspp", Version::new(0, 5, 2), "smspp", "testing"),
            exports: ExportedSourceSet::new([
                "CMakeLists.txt",
                "src/*",
                "include/*",
                "cmake/*",
                "tools/*",
                "LICENSE",
            ]),
            patch: SourcePatch {
                file: "CMakeLists.txt".to_string(),
                anchor: "LANGUAGES C CXX)".to_string(),
            },
            license_file: "LICENSE".to_string(),
            layout: PackageLayout {
                includedirs: vec!["include".to_string(), "include/SMS++".to_string()],
                libdirs: default_libdirs(),
                bindirs: default_bindirs(),
                libs: vec!["UCBlock".to_string()],
            },
        }
    }

    /// Reference of the package this recipe produces, without user/channel.
    pub fn reference(&self) -> PackageReference {
        PackageReference::new(
            self.identity.name.clone(),
            self.identity.version.clone(),
            "_",
            "_",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ucblock_identity() {
        let recipe = Recipe::ucblock();
        assert_eq!(recipe.identity.name, "ucblock");
        assert_eq!(recipe.identity.version, Version::new(0, 6, 2));
        assert_eq!(recipe.identity.license, "GPL-3.0-only");
        assert_eq!(recipe.reference().to_string(), "ucblock/0.6.2");
    }

    #[test]
    fn test_single_pinned_dependency() {
        let recipe = Recipe::ucblock();
        assert_eq!(recipe.requires.to_string(), "smspp/0.5.2@smspp/testing");
    }

    #[test]
    fn test_exports_cover_build_inputs() {
        let recipe = Recipe::ucblock();
        let patterns = recipe.exports.patterns();
        for required in ["CMakeLists.txt", "src/*", "include/*", "cmake/*", "tools/*"] {
            assert!(patterns.iter().any(|p| p == required), "missing {}", required);
        }
        assert!(patterns.iter().any(|p| p == &recipe.license_file));
    }

    #[test]
    fn test_published_layout() {
        let layout = Recipe::ucblock().layout;
        assert_eq!(layout.includedirs, vec!["include", "include/SMS++"]);
        assert_eq!(layout.libs, vec!["UCBlock"]);
    }
}
