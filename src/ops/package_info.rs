//! Package info: what a consumer needs to compile and link against a package.
//!
//! The layout itself is static recipe data. This module renders it for
//! consumers and reads/writes the `package-info.toml` file that sits at the
//! root of every package folder.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::options::OptionValues;
use crate::core::{PackageLayout, Recipe, Settings};
use crate::util::fs::{read_to_string, write_string};

/// File name of the package info record inside a package folder.
pub const PACKAGE_INFO_FILE: &str = "package-info.toml";

/// Output format for `ucbuild info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoFormat {
    #[default]
    Flags,
    Toml,
    Json,
}

impl std::str::FromStr for InfoFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flags" => Ok(InfoFormat::Flags),
            "toml" => Ok(InfoFormat::Toml),
            "json" => Ok(InfoFormat::Json),
            _ => Err(format!(
                "invalid format '{}'; expected 'flags', 'toml', or 'json'",
                s
            )),
        }
    }
}

/// Package section of the info record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub license: Option<String>,
}

/// Contents of `package-info.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub package: PackageSummary,

    /// Option values the package was built with
    #[serde(default)]
    pub options: BTreeMap<String, bool>,

    /// Settings the package was built with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    /// Consumer-facing layout
    pub cpp_info: PackageLayout,
}

impl PackageInfo {
    /// The recipe's static package info, independent of any build.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        PackageInfo {
            package: PackageSummary {
                name: recipe.identity.name.clone(),
                version: recipe.identity.version.to_string(),
                license: Some(recipe.identity.license.clone()),
            },
            options: BTreeMap::new(),
            settings: None,
            cpp_info: recipe.layout.clone(),
        }
    }

    /// Package info for one concrete build.
    pub fn for_build(recipe: &Recipe, options: &OptionValues, settings: &Settings) -> Self {
        PackageInfo {
            options: options.present(),
            settings: Some(settings.clone()),
            ..Self::from_recipe(recipe)
        }
    }

    /// Load package info from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse package info: {}", path.display()))
    }

    /// Save package info to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).context("failed to serialize package info")?;
        write_string(path, &contents)
    }

    /// Render in the requested format. `root` anchors the flags output.
    pub fn render(&self, format: InfoFormat, root: &Path) -> Result<String> {
        match format {
            InfoFormat::Flags => Ok(consumer_flags(&self.cpp_info, root).join(" ")),
            InfoFormat::Toml => {
                toml::to_string_pretty(self).context("failed to serialize package info")
            }
            InfoFormat::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize package info")
            }
        }
    }
}

/// Compile and link flags for a consumer of a package rooted at `root`.
pub fn consumer_flags(layout: &PackageLayout, root: &Path) -> Vec<String> {
    let mut flags = Vec::new();

    for dir in &layout.includedirs {
        flags.push(format!("-I{}", root.join(dir).display()));
    }
    for dir in &layout.libdirs {
        flags.push(format!("-L{}", root.join(dir).display()));
    }
    for lib in &layout.libs {
        flags.push(format!("-l{}", lib));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionSet;
    use tempfile::TempDir;

    #[test]
    fn test_static_contract() {
        let info = PackageInfo::from_recipe(&Recipe::ucblock());
        assert_eq!(info.cpp_info.includedirs, vec!["include", "include/SMS++"]);
        assert_eq!(info.cpp_info.libs, vec!["UCBlock"]);
    }

    #[test]
    fn test_link_name_is_option_independent() {
        let recipe = Recipe::ucblock();
        let settings = Settings::host();

        let mut shared = OptionSet::standard().defaults();
        shared.set("shared", true).unwrap();
        let static_info = PackageInfo::for_build(&recipe, &recipe.options.defaults(), &settings);
        let shared_info = PackageInfo::for_build(&recipe, &shared, &settings);

        assert_eq!(static_info.cpp_info, shared_info.cpp_info);
        assert_eq!(shared_info.cpp_info.libs, vec!["UCBlock"]);
        assert_eq!(shared_info.options.get("shared"), Some(&true));
    }

    #[test]
    fn test_consumer_flags() {
        let layout = Recipe::ucblock().layout;
        let root = Path::new("/pkg");
        let flags = consumer_flags(&layout, root);

        assert_eq!(
            flags,
            vec![
                format!("-I{}", root.join("include").display()),
                format!("-I{}", root.join("include/SMS++").display()),
                format!("-L{}", root.join("lib").display()),
                "-lUCBlock".to_string(),
            ]
        );
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(PACKAGE_INFO_FILE);
        let recipe = Recipe::ucblock();
        let info = PackageInfo::for_build(&recipe, &recipe.options.defaults(), &Settings::host());

        info.save(&path).unwrap();
        assert_eq!(PackageInfo::load(&path).unwrap(), info);
    }

    #[test]
    fn test_load_minimal_dependency_info() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(PACKAGE_INFO_FILE);
        std::fs::write(
            &path,
            r#"
[package]
name = "smspp"
version = "0.5.2"

[cpp_info]
includedirs = ["include", "include/SMS++"]
libs = ["SMS++"]
"#,
        )
        .unwrap();

        let info = PackageInfo::load(&path).unwrap();
        assert_eq!(info.cpp_info.libdirs, vec!["lib"]);
        assert_eq!(info.cpp_info.libs, vec!["SMS++"]);
        assert!(info.options.is_empty());
    }

    #[test]
    fn test_render_json() {
        let info = PackageInfo::from_recipe(&Recipe::ucblock());
        let json = info.render(InfoFormat::Json, Path::new("/pkg")).unwrap();
        assert!(json.contains("\"UCBlock\""));
        assert!(json.contains("include/SMS++"));
    }
}
