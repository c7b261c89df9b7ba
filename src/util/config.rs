//! Configuration file support for ucbuild.
//!
//! ucbuild supports two configuration file locations:
//! - Global: `<config dir>/config.toml` - User-wide defaults
//! - Project: `.ucbuild/config.toml` - Recipe-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::{OptionError, OptionValues, FPIC, SHARED};

/// ucbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recipe option defaults
    pub options: OptionsConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Extra CMake settings
    pub cmake: CMakeConfig,

    /// Package cache settings
    pub cache: CacheConfig,
}

/// Option values from the `[options]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub shared: Option<bool>,

    #[serde(rename = "fPIC")]
    pub fpic: Option<bool>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    pub build_type: Option<String>,

    /// Default number of parallel jobs (None = let CMake decide)
    pub jobs: Option<usize>,

    /// CMake generator (e.g. "Ninja")
    pub generator: Option<String>,

    /// Work directory for sources, build tree and package staging
    pub workdir: Option<PathBuf>,
}

/// Extra CMake configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CMakeConfig {
    /// Additional `-D` definitions passed at configure time
    pub defines: BTreeMap<String, String>,
}

/// Package cache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root used to resolve dependencies
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Options
        if other.options.shared.is_some() {
            self.options.shared = other.options.shared;
        }
        if other.options.fpic.is_some() {
            self.options.fpic = other.options.fpic;
        }

        // Build settings
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.workdir.is_some() {
            self.build.workdir = other.build.workdir;
        }

        // CMake defines merge key by key
        self.cmake.defines.extend(other.cmake.defines);

        // Cache
        if other.cache.dir.is_some() {
            self.cache.dir = other.cache.dir;
        }
    }

    /// Apply configured option values.
    pub fn apply_options(&self, values: &mut OptionValues) -> Result<(), OptionError> {
        if let Some(shared) = self.options.shared {
            values.set(SHARED, shared)?;
        }
        if let Some(fpic) = self.options.fpic {
            values.set(FPIC, fpic)?;
        }
        Ok(())
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ucbuild/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionSet;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.options.shared.is_none());
        assert!(config.build.jobs.is_none());
        assert!(config.cmake.defines.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[options]
shared = true
fPIC = false

[build]
build_type = "Debug"
jobs = 8
generator = "Ninja"

[cmake.defines]
CMAKE_CXX_STANDARD = "17"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.options.shared, Some(true));
        assert_eq!(config.options.fpic, Some(false));
        assert_eq!(config.build.build_type.as_deref(), Some("Debug"));
        assert_eq!(config.build.jobs, Some(8));
        assert_eq!(
            config.cmake.defines.get("CMAKE_CXX_STANDARD").map(String::as_str),
            Some("17")
        );
    }

    #[test]
    fn test_config_rejects_non_boolean_option() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[options]\nshared = \"maybe\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.jobs = Some(4);
        base.options.shared = Some(true);
        base.cmake
            .defines
            .insert("A".to_string(), "1".to_string());

        let mut project = Config::default();
        project.build.jobs = Some(16);
        project
            .cmake
            .defines
            .insert("B".to_string(), "2".to_string());

        base.merge(project);

        assert_eq!(base.build.jobs, Some(16));
        assert_eq!(base.options.shared, Some(true));
        assert_eq!(base.cmake.defines.len(), 2);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(&global, "[build]\njobs = 2\ngenerator = \"Ninja\"\n").unwrap();
        std::fs::write(&project, "[build]\njobs = 6\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.build.jobs, Some(6));
        assert_eq!(config.build.generator.as_deref(), Some("Ninja"));
    }

    #[test]
    fn test_load_config_bad_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project.toml");
        std::fs::write(&project, "[build\n").unwrap();

        let config = load_config(&tmp.path().join("missing.toml"), &project);
        assert!(config.build.jobs.is_none());
    }

    #[test]
    fn test_apply_options() {
        let mut config = Config::default();
        config.options.shared = Some(true);

        let mut values = OptionSet::standard().defaults();
        config.apply_options(&mut values).unwrap();
        assert!(values.shared());
        assert_eq!(values.fpic(), Some(true));
    }
}
