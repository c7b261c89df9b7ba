//! Build configuration: the CMake definitions for one build.
//!
//! A [`BuildConfiguration`] is a pure function of option values, settings,
//! folders and user extras. Extras are applied first and the derived keys
//! are written over them, so `BUILD_TESTING=OFF` and the install layout hold
//! whatever the configuration file or `-D` arguments say.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::{BuildType, OptionValues, Settings};
use crate::util::hash::Fingerprint;

/// Definition that controls whether CTest targets are generated.
pub const BUILD_TESTING: &str = "BUILD_TESTING";

/// Keys derived from options, settings and folders. Extras never set these.
const DERIVED_KEYS: &[&str] = &[
    "CMAKE_BUILD_TYPE",
    "BUILD_SHARED_LIBS",
    "CMAKE_POSITION_INDEPENDENT_CODE",
    "CMAKE_INSTALL_PREFIX",
    "CMAKE_INSTALL_LIBDIR",
    "CMAKE_INSTALL_BINDIR",
    "CMAKE_INSTALL_INCLUDEDIR",
    "CMAKE_EXPORT_NO_PACKAGE_REGISTRY",
    BUILD_TESTING,
];

/// Folders a build works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folders {
    /// Exported, patched sources
    pub source: PathBuf,
    /// CMake binary directory
    pub build: PathBuf,
    /// Install prefix / package staging
    pub package: PathBuf,
}

impl Folders {
    /// Standard layout under a work directory.
    pub fn in_workdir(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        Folders {
            source: workdir.join("source"),
            build: workdir.join("build"),
            package: workdir.join("package"),
        }
    }
}

/// CMake configuration for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    definitions: BTreeMap<String, String>,
    generator: Option<String>,
    build_type: BuildType,
    compiler: Option<String>,
}

impl BuildConfiguration {
    /// Derive the configuration for a build.
    pub fn derive(
        options: &OptionValues,
        settings: &Settings,
        folders: &Folders,
        generator: Option<&str>,
        extra: &BTreeMap<String, String>,
    ) -> Self {
        let mut defs = BTreeMap::new();

        for (key, value) in extra {
            if DERIVED_KEYS.contains(&key.as_str()) {
                tracing::warn!(
                    "ignoring {}={} from configuration; ucbuild derives this key",
                    key,
                    value
                );
                continue;
            }
            defs.insert(key.clone(), value.clone());
        }

        defs.insert(
            "CMAKE_BUILD_TYPE".to_string(),
            settings.build_type.to_string(),
        );
        defs.insert(
            "BUILD_SHARED_LIBS".to_string(),
            on_off(options.shared()).to_string(),
        );
        if let Some(fpic) = options.fpic() {
            defs.insert(
                "CMAKE_POSITION_INDEPENDENT_CODE".to_string(),
                on_off(fpic).to_string(),
            );
        }
        defs.insert(
            "CMAKE_INSTALL_PREFIX".to_string(),
            cmake_path(&folders.package),
        );
        defs.insert("CMAKE_INSTALL_LIBDIR".to_string(), "lib".to_string());
        defs.insert("CMAKE_INSTALL_BINDIR".to_string(), "bin".to_string());
        defs.insert("CMAKE_INSTALL_INCLUDEDIR".to_string(), "include".to_string());
        defs.insert(
            "CMAKE_EXPORT_NO_PACKAGE_REGISTRY".to_string(),
            "ON".to_string(),
        );
        defs.insert(BUILD_TESTING.to_string(), "OFF".to_string());

        BuildConfiguration {
            definitions: defs,
            generator: generator.map(str::to_string),
            build_type: settings.build_type,
            compiler: settings.compiler.clone(),
        }
    }

    /// Get a definition.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.definitions.get(key).map(String::as_str)
    }

    pub fn definitions(&self) -> &BTreeMap<String, String> {
        &self.definitions
    }

    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    /// Compiler CMake will pick up from the environment, if one was set.
    pub fn compiler(&self) -> Option<&str> {
        self.compiler.as_deref()
    }

    /// Whether a shared library will be produced.
    pub fn is_shared(&self) -> bool {
        self.get("BUILD_SHARED_LIBS") == Some("ON")
    }

    /// `-D` arguments for the configure phase.
    pub fn define_args(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|(k, v)| format!("-D{}={}", k, v))
            .collect()
    }

    /// Stable hash of everything that affects the configure phase.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_opt(self.generator.as_deref());
        fp.update_opt(self.compiler.as_deref());
        for (k, v) in &self.definitions {
            fp.update_str(k).update_str(v);
        }
        fp.finish()
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Path in the form CMake expects on every platform.
fn cmake_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "/")
}
