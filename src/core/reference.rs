//! Package references of the form `name/version@user/channel`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use miette::Diagnostic;
use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder used when a reference carries no user or channel.
const UNSET: &str = "_";

/// Errors from parsing a package reference.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ReferenceError {
    #[error("invalid package reference `{input}`: {reason}")]
    #[diagnostic(
        code(ucbuild::reference::invalid),
        help("expected `name/version@user/channel`, e.g. `smspp/0.5.2@smspp/testing`")
    )]
    Invalid { input: String, reason: String },
}

/// A fully qualified package reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageReference {
    name: String,
    version: Version,
    user: String,
    channel: String,
}

impl PackageReference {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        PackageReference {
            name: name.into(),
            version,
            user: user.into(),
            channel: channel.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Same package under a different user/channel.
    pub fn with_channel(&self, user: impl Into<String>, channel: impl Into<String>) -> Self {
        PackageReference {
            user: user.into(),
            channel: channel.into(),
            ..self.clone()
        }
    }

    /// Relative path of this reference inside a package cache:
    /// `<name>/<version>/<user>/<channel>`.
    pub fn cache_path(&self) -> PathBuf {
        Path::new(&self.name)
            .join(self.version.to_string())
            .join(&self.user)
            .join(&self.channel)
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if self.user != UNSET || self.channel != UNSET {
            write!(f, "@{}/{}", self.user, self.channel)?;
        }
        Ok(())
    }
}

impl FromStr for PackageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ReferenceError::Invalid {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (pkg, namespace) = match s.split_once('@') {
            Some((pkg, ns)) => (pkg, Some(ns)),
            None => (s, None),
        };

        let (name, version) = pkg
            .split_once('/')
            .ok_or_else(|| invalid("missing `/version`"))?;
        if !is_valid_component(name) {
            return Err(invalid("bad package name"));
        }
        let version: Version = version
            .parse()
            .map_err(|e: semver::Error| invalid(&e.to_string()))?;

        let (user, channel) = match namespace {
            Some(ns) => {
                let (user, channel) = ns
                    .split_once('/')
                    .ok_or_else(|| invalid("missing `/channel` after user"))?;
                if !is_valid_component(user) || !is_valid_component(channel) {
                    return Err(invalid("bad user or channel"));
                }
                (user, channel)
            }
            None => (UNSET, UNSET),
        };

        Ok(PackageReference::new(name, version, user, channel))
    }
}

fn is_valid_component(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

impl Serialize for PackageReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
