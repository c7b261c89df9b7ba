//! Recipe build options.
//!
//! The recipe recognizes exactly two boolean switches, `shared` and `fPIC`.
//! [`OptionSet`] is the declaration (names and defaults), [`OptionValues`] the
//! concrete assignment for one build.

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Build a shared library instead of a static one.
pub const SHARED: &str = "shared";

/// Emit position independent code.
pub const FPIC: &str = "fPIC";

/// Errors raised while declaring or assigning options.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum OptionError {
    #[error("unknown option `{name}`")]
    #[diagnostic(code(ucbuild::options::unknown), help("recognized options: {known}"))]
    Unknown { name: String, known: String },

    #[error("invalid value `{value}` for option `{name}`")]
    #[diagnostic(
        code(ucbuild::options::invalid_value),
        help("`{name}` accepts `True` or `False`")
    )]
    InvalidValue { name: String, value: String },

    #[error("malformed option `{spec}`")]
    #[diagnostic(
        code(ucbuild::options::malformed),
        help("expected `name=value`, e.g. `shared=True`")
    )]
    Malformed { spec: String },
}

/// Declaration of a single boolean option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub default: bool,
}

/// The set of options a recipe declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    decls: Vec<OptionDecl>,
}

impl OptionSet {
    /// `shared` (default off) and `fPIC` (default on).
    pub fn standard() -> Self {
        OptionSet {
            decls: vec![
                OptionDecl {
                    name: SHARED,
                    default: false,
                },
                OptionDecl {
                    name: FPIC,
                    default: true,
                },
            ],
        }
    }

    /// Look up an option declaration by name.
    pub fn get(&self, name: &str) -> Result<&OptionDecl, OptionError> {
        self.decls
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| self.unknown(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.iter()
    }

    /// Values with every option at its declared default.
    pub fn defaults(&self) -> OptionValues {
        OptionValues {
            known: self.known_names(),
            values: self
                .decls
                .iter()
                .map(|d| (d.name.to_string(), Some(d.default)))
                .collect(),
        }
    }

    fn known_names(&self) -> String {
        self.decls
            .iter()
            .map(|d| format!("`{}`", d.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn unknown(&self, name: &str) -> OptionError {
        OptionError::Unknown {
            name: name.to_string(),
            known: self.known_names(),
        }
    }
}

/// Concrete option values for one build.
///
/// An option can be removed for a platform where it does not apply; a removed
/// option still counts as recognized but has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValues {
    known: String,
    values: BTreeMap<String, Option<bool>>,
}

impl OptionValues {
    /// Get the value of an option.
    ///
    /// Returns `Ok(None)` for a removed option and an error for a name the
    /// recipe does not declare.
    pub fn get(&self, name: &str) -> Result<Option<bool>, OptionError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| self.unknown(name))
    }

    /// Set an option.
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), OptionError> {
        match self.values.get_mut(name) {
            Some(slot) if slot.is_some() => {
                *slot = Some(value);
                Ok(())
            }
            Some(_) => {
                tracing::warn!("option `{}` does not apply on this platform, ignoring", name);
                Ok(())
            }
            None => Err(self.unknown(name)),
        }
    }

    /// Apply an assignment of the form `name=value`.
    pub fn apply(&mut self, spec: &str) -> Result<(), OptionError> {
        let (name, value) = spec
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .filter(|(n, _)| !n.is_empty())
            .ok_or_else(|| OptionError::Malformed {
                spec: spec.to_string(),
            })?;

        // Validate the name before the value so unknown names win.
        self.get(name)?;
        let value = parse_bool(name, value)?;
        self.set(name, value)
    }

    /// Drop options that do not apply to the target OS.
    ///
    /// Windows has no notion of position independent code.
    pub fn for_os(mut self, os: &str) -> Self {
        if os == "windows" {
            if let Some(slot) = self.values.get_mut(FPIC) {
                *slot = None;
            }
        }
        self
    }

    /// Options that currently carry a value.
    pub fn present(&self) -> BTreeMap<String, bool> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.map(|v| (k.clone(), v)))
            .collect()
    }

    /// Whether a shared library was requested.
    pub fn shared(&self) -> bool {
        self.values.get(SHARED).copied().flatten().unwrap_or(false)
    }

    /// The `fPIC` value, if the option applies.
    pub fn fpic(&self) -> Option<bool> {
        self.values.get(FPIC).copied().flatten()
    }

    fn unknown(&self, name: &str) -> OptionError {
        OptionError::Unknown {
            name: name.to_string(),
            known: self.known.clone(),
        }
    }
}

impl fmt::Display for OptionValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .present()
            .iter()
            .map(|(k, v)| format!("{}={}", k, display_bool(*v)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Parse a boolean option value.
///
/// Accepts `true`/`false` in any case, so `True`/`False` work too.
pub fn parse_bool(name: &str, value: &str) -> Result<bool, OptionError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Render a value the way the dependency manager spells it.
pub fn display_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
