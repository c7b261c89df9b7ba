//! CMake driver.
//!
//! [`NativeBuildTool`] is the seam between the recipe pipeline and the native
//! build system; [`CMake`] drives the real `cmake` binary.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::configuration::{BuildConfiguration, Folders};
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// The three phases of a native build tool.
pub trait NativeBuildTool {
    /// Configure `folders.source` into `folders.build`.
    fn configure(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()>;

    /// Compile a configured build directory.
    fn build(&self, folders: &Folders, config: &BuildConfiguration, jobs: Option<usize>)
        -> Result<()>;

    /// Install a built directory into `folders.package`.
    fn install(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()>;
}

/// The `cmake` executable.
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
    verbose: bool,
}

impl CMake {
    /// Locate CMake on `PATH`.
    pub fn find() -> Result<Self> {
        let Some(program) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build this package.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };

        Ok(CMake {
            program,
            verbose: false,
        })
    }

    /// Use a specific cmake binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        CMake {
            program: program.into(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Detect the CMake version, e.g. from "cmake version 3.28.1".
    pub fn version(&self) -> Result<semver::Version> {
        let output = ProcessBuilder::new(&self.program).arg("--version").exec()?;
        if !output.status.success() {
            bail!("cmake --version failed");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_version(&stdout)
            .ok_or_else(|| anyhow::anyhow!("could not parse cmake version from: {}", stdout))
    }

    /// Arguments for the configure phase.
    pub fn configure_args(folders: &Folders, config: &BuildConfiguration) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            folders.source.display().to_string(),
            "-B".to_string(),
            folders.build.display().to_string(),
        ];

        if let Some(generator) = config.generator() {
            args.push("-G".to_string());
            args.push(generator.to_string());
        }

        args.extend(config.define_args());
        args
    }

    /// Arguments for the build phase.
    pub fn build_args(
        folders: &Folders,
        config: &BuildConfiguration,
        jobs: Option<usize>,
        verbose: bool,
    ) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            folders.build.display().to_string(),
            // Multi-config generators (Visual Studio, Xcode) need the config at build time
            "--config".to_string(),
            config.build_type().to_string(),
            "--parallel".to_string(),
        ];

        if let Some(jobs) = jobs {
            args.push(jobs.to_string());
        }

        if verbose {
            args.push("--verbose".to_string());
        }

        args
    }

    /// Arguments for the install phase.
    pub fn install_args(folders: &Folders, config: &BuildConfiguration) -> Vec<String> {
        vec![
            "--install".to_string(),
            folders.build.display().to_string(),
            "--config".to_string(),
            config.build_type().to_string(),
            "--prefix".to_string(),
            folders.package.display().to_string(),
        ]
    }

    fn run(&self, phase: &str, args: Vec<String>) -> Result<()> {
        let cmd = ProcessBuilder::new(&self.program).args(args);
        tracing::debug!("CMake {}: {}", phase, cmd.display_command());

        // Inherit stdio so CMake's diagnostics reach the user untouched.
        let status = cmd.status()?;
        if !status.success() {
            bail!(
                "cmake {} failed with exit code {:?}\n  command: {}",
                phase,
                status.code(),
                cmd.display_command()
            );
        }
        Ok(())
    }
}

fn parse_version(stdout: &str) -> Option<semver::Version> {
    let line = stdout.lines().find(|l| l.starts_with("cmake version "))?;
    let version = line.trim_start_matches("cmake version ").trim();
    // Handle versions like "3.20.5-dirty"
    let clean = version.split('-').next().unwrap_or(version);
    clean.parse().ok()
}

impl NativeBuildTool for CMake {
    fn configure(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()> {
        tracing::info!("Configuring CMake project");
        ensure_dir(&folders.build)?;
        self.run("configure", Self::configure_args(folders, config))
    }

    fn build(
        &self,
        folders: &Folders,
        config: &BuildConfiguration,
        jobs: Option<usize>,
    ) -> Result<()> {
        tracing::info!("Building CMake project");
        self.run("build", Self::build_args(folders, config, jobs, self.verbose))
    }

    fn install(&self, folders: &Folders, config: &BuildConfiguration) -> Result<()> {
        tracing::info!("Installing into {}", folders.package.display());
        ensure_dir(&folders.package)?;
        self.run("install", Self::install_args(folders, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::core::{OptionSet, Settings};

    fn config(generator: Option<&str>) -> (Folders, BuildConfiguration) {
        let folders = Folders::in_workdir("/work");
        let cfg = BuildConfiguration::derive(
            &OptionSet::standard().defaults(),
            &Settings::host(),
            &folders,
            generator,
            &BTreeMap::new(),
        );
        (folders, cfg)
    }

    #[test]
    fn test_configure_args() {
        let (folders, cfg) = config(Some("Ninja"));
        let args = CMake::configure_args(&folders, &cfg);

        assert_eq!(args[0], "-S");
        assert_eq!(args[1], folders.source.display().to_string());
        assert_eq!(args[2], "-B");
        assert!(args.windows(2).any(|w| w[0] == "-G" && w[1] == "Ninja"));
        assert!(args.contains(&"-DBUILD_TESTING=OFF".to_string()));
    }

    #[test]
    fn test_configure_args_without_generator() {
        let (folders, cfg) = config(None);
        let args = CMake::configure_args(&folders, &cfg);
        assert!(!args.contains(&"-G".to_string()));
    }

    #[test]
    fn test_build_args() {
        let (folders, cfg) = config(None);
        let args = CMake::build_args(&folders, &cfg, Some(4), false);
        assert_eq!(args[0], "--build");
        assert!(args.windows(2).any(|w| w[0] == "--config" && w[1] == "Release"));
        assert!(args.windows(2).any(|w| w[0] == "--parallel" && w[1] == "4"));
        assert!(!args.contains(&"--verbose".to_string()));
    }

    #[test]
    fn test_install_args() {
        let (folders, cfg) = config(None);
        let args = CMake::install_args(&folders, &cfg);
        assert_eq!(args[0], "--install");
        assert!(args
            .windows(2)
            .any(|w| w[0] == "--prefix" && w[1] == folders.package.display().to_string()));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("cmake version 3.28.1\n\nCMake suite maintained by Kitware\n"),
            Some(semver::Version::new(3, 28, 1))
        );
        assert_eq!(
            parse_version("cmake version 3.20.5-dirty\n"),
            Some(semver::Version::new(3, 20, 5))
        );
        assert_eq!(parse_version("ninja 1.11"), None);
    }

    #[test]
    fn test_failing_tool_is_reported() {
        // `false` exits non-zero on every unix system.
        if cfg!(unix) {
            let (folders, cfg) = config(None);
            let tool = CMake::with_program("false");
            let err = tool.build(&folders, &cfg, None).unwrap_err();
            assert!(err.to_string().contains("cmake build failed"));
        }
    }
}
