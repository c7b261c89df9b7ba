//! Test doubles and fixtures for ucbuild unit tests.
//!
//! [`FakeCMake`] stands in for CMake: it records the phases it was asked to
//! run and stages install output shaped like the real UCBlock install.

use std::cell::RefCell;
use std::path::Path;

use anyhow::{bail, Result};

use crate::builder::buildinfo::BUILD_INFO_FILE;
use crate::builder::patch::include_directive;
use crate::builder::{BuildConfiguration, Folders, NativeBuildTool};
use crate::core::PackageReference;
use crate::ops::package_info::PACKAGE_INFO_FILE;
use crate::sources::{DependencyProvider, ResolveError, ResolvedDependency};

/// A `CMakeLists.txt` with the anchor the recipe patches after.
pub const CMAKE_LISTS: &str = "cmake_minimum_required(VERSION 3.19)\n\
project(UCBlock\n        VERSION 0.6.2\n        DESCRIPTION \"Unit Commitment Blocks for SMS++\"\n        LANGUAGES C CXX)\n\
\n\
option(BUILD_TESTING \"Build the tests\" ON)\n\
add_subdirectory(src)\n";

/// Fake build tool that records calls and stages plausible output.
#[derive(Debug, Default)]
pub struct FakeCMake {
    phases: RefCell<Vec<String>>,
    configs: RefCell<Vec<BuildConfiguration>>,
    fail_phase: Option<&'static str>,
    skip_headers: bool,
    skip_library: bool,
}

impl FakeCMake {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tool whose `phase` exits with an error.
    pub fn failing(phase: &'static str) -> Self {
        FakeCMake {
            fail_phase: Some(phase),
            ..Self::default()
        }
    }

    /// Install without any headers.
    pub fn without_headers(mut self) -> Self {
        self.skip_headers = true;
        self
    }

    /// Install without the library artifact.
    pub fn without_library(mut self) -> Self {
        self.skip_library = true;
        self
    }

    /// Phases run so far, in order.
    pub fn phases(&self) -> Vec<String> {
        self.phases.borrow().clone()
    }

    /// Configuration of the most recent call.
    pub fn last_config(&self) -> Option<BuildConfiguration> {
        self.configs.borrow().last().cloned()
    }

    fn record(&self, phase: &str, config: &BuildConfiguration) -> Result<()> {
        self.phases.borrow_mut().push(phase.to_string());
        self.configs.borrow_mut().push(config.clone());
        if self.fail_phase == Some(phase) {
            bail!("cmake {} failed with exit code Some(1)", phase);
        }
        Ok(())
    }

    fn artifact_name(config: &BuildConfiguration) -> &'static str {
        if config.is_shared() {
            "libUCBlock.so"
        } else {
            "libUCBlock.a"
        }
    }
}

impl NativeBuildTool for FakeCMake {
    fn configure(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()> {
        self.record("configure", config)?;

        // The patched description includes the build-metadata file; CMake
        // fails if it is missing.
        let lists = std::fs::read_to_string(folders.source.join("CMakeLists.txt"))?;
        if !lists.contains(&include_directive()) {
            bail!("CMakeLists.txt does not include the dependency setup");
        }
        if !folders.build.join(BUILD_INFO_FILE).is_file() {
            bail!("include could not find requested file: {}", BUILD_INFO_FILE);
        }

        std::fs::write(
            folders.build.join("CMakeCache.txt"),
            config.define_args().join("\n"),
        )?;
        Ok(())
    }

    fn build(&self, folders: &Folders, config: &BuildConfiguration, _jobs: Option<usize>) -> Result<()> {
        self.record("build", config)?;
        std::fs::write(folders.build.join(Self::artifact_name(config)), "object code")?;
        Ok(())
    }

    fn install(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()> {
        self.record("install", config)?;

        if !self.skip_headers {
            let headers = folders.package.join("include").join("SMS++");
            std::fs::create_dir_all(&headers)?;
            for entry in std::fs::read_dir(folders.source.join("include"))? {
                let path = entry?.path();
                if let Some(name) = path.file_name() {
                    std::fs::copy(&path, headers.join(name))?;
                }
            }
        }

        if !self.skip_library {
            let name = Self::artifact_name(config);
            let lib = folders.package.join("lib");
            std::fs::create_dir_all(&lib)?;
            std::fs::copy(folders.build.join(name), lib.join(name))?;
        }

        Ok(())
    }
}

/// Provider that never finds anything.
pub struct FailingProvider;

impl DependencyProvider for FailingProvider {
    fn name(&self) -> &str {
        "the test provider"
    }

    fn resolve(&self, reference: &PackageReference) -> Result<ResolvedDependency, ResolveError> {
        Err(ResolveError::not_found(reference, self.name(), &[]))
    }
}

/// Write a minimal UCBlock source tree at `root`.
pub fn write_recipe_tree(root: &Path) {
    let files = [
        ("CMakeLists.txt", CMAKE_LISTS),
        ("src/UCBlock.cpp", "#include \"UCBlock.h\"\n"),
        ("src/CMakeLists.txt", "add_library(UCBlock UCBlock.cpp)\n"),
        ("include/UCBlock.h", "#pragma once\n"),
        ("include/ThermalUnitBlock.h", "#pragma once\n"),
        ("cmake/UCBlockConfig.cmake.in", "@PACKAGE_INIT@\n"),
        ("tools/nc4generator.cpp", "int main() { return 0; }\n"),
        ("LICENSE", "GNU GENERAL PUBLIC LICENSE\nVersion 3\n"),
    ];

    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
}

/// Put a package for `reference` into the cache rooted at `cache_root`.
pub fn seed_dependency(cache_root: &Path, reference: &PackageReference) {
    let pkg = cache_root.join(reference.cache_path()).join("package");
    std::fs::create_dir_all(pkg.join("include/SMS++")).unwrap();
    std::fs::create_dir_all(pkg.join("lib")).unwrap();
    std::fs::write(pkg.join("include/SMS++/Block.h"), "#pragma once\n").unwrap();
    std::fs::write(pkg.join("lib/libSMS++.a"), "").unwrap();
    std::fs::write(
        pkg.join(PACKAGE_INFO_FILE),
        format!(
            "[package]\nname = \"{}\"\nversion = \"{}\"\n\n[cpp_info]\nincludedirs = [\"include\", \"include/SMS++\"]\nlibs = [\"SMS++\"]\n",
            reference.name(),
            reference.version()
        ),
    )
    .unwrap();
}
