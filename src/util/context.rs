//! Global context for ucbuild operations.
//!
//! Provides centralized access to the working directory and the per-user
//! configuration and data locations.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Project directories for ucbuild
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("org", "smspp", "ucbuild"));

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Per-user configuration directory
    config_dir: PathBuf,

    /// Per-user data directory (holds the package cache)
    data_dir: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::for_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn for_cwd(cwd: PathBuf) -> Self {
        let (config_dir, data_dir) = match PROJECT_DIRS.as_ref() {
            Some(dirs) => (
                dirs.config_dir().to_path_buf(),
                dirs.data_dir().to_path_buf(),
            ),
            None => {
                let fallback = cwd.join(".ucbuild").join("home");
                (fallback.clone(), fallback)
            }
        };

        GlobalContext {
            cwd,
            config_dir,
            data_dir,
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Get the project-local ucbuild directory.
    pub fn project_dir(&self) -> PathBuf {
        self.cwd.join(".ucbuild")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join("config.toml")
    }

    /// Default work directory for sources, build tree and package.
    pub fn default_workdir(&self) -> PathBuf {
        self.project_dir().join("work")
    }

    /// Default package cache root.
    pub fn default_cache_dir(&self) -> PathBuf {
        self.data_dir.join("packages")
    }

    /// Resolve a possibly relative path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.config_path().ends_with("config.toml"));
    }

    #[test]
    fn test_project_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::for_cwd(tmp.path().to_path_buf());

        assert_eq!(ctx.project_dir(), tmp.path().join(".ucbuild"));
        assert_eq!(
            ctx.project_config_path(),
            tmp.path().join(".ucbuild").join("config.toml")
        );
        assert!(ctx.default_workdir().starts_with(tmp.path()));
    }

    #[test]
    fn test_resolve_path() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::for_cwd(tmp.path().to_path_buf());
        assert_eq!(ctx.resolve_path(Path::new("work")), tmp.path().join("work"));
        assert_eq!(ctx.resolve_path(tmp.path()), tmp.path().to_path_buf());
    }
}
