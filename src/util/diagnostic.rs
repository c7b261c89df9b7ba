//! User-facing error reports.
//!
//! Errors keep the underlying tool's text verbatim; the report only adds the
//! `help:` line carried by our typed errors, if any.

use std::fmt;
use std::io::IsTerminal;

use miette::Diagnostic as MietteDiagnostic;

use crate::builder::PatchError;
use crate::core::{OptionError, ReferenceError};
use crate::ops::package::PackageError;
use crate::sources::ResolveError;

/// An error report ready for the terminal.
#[derive(Debug, Clone)]
pub struct Report {
    /// Full error chain
    pub message: String,
    /// Diagnostic code of the innermost typed error
    pub code: Option<String>,
    /// Suggested fix
    pub help: Option<String>,
}

impl Report {
    /// Build a report from an error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let diag = err.chain().find_map(as_diagnostic);

        Report {
            message: format!("{:#}", err),
            code: diag.and_then(|d| d.code()).map(|c| c.to_string()),
            help: diag.and_then(|d| d.help()).map(|h| h.to_string()),
        }
    }

    /// Format the report for terminal output.
    pub fn format(&self, color: bool) -> String {
        let (error, help) = if color {
            ("\x1b[1;31merror\x1b[0m", "\x1b[1;32mhelp\x1b[0m")
        } else {
            ("error", "help")
        };

        let mut output = match &self.code {
            Some(code) => format!("{}[{}]: {}\n", error, code, self.message),
            None => format!("{}: {}\n", error, self.message),
        };

        if let Some(ref text) = self.help {
            output.push_str(&format!("{}: {}\n", help, text));
        }

        output
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

fn as_diagnostic<'a>(
    err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a dyn MietteDiagnostic> {
    if let Some(e) = err.downcast_ref::<OptionError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<ReferenceError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<ResolveError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<PatchError>() {
        return Some(e);
    }
    if let Some(e) = err.downcast_ref::<PackageError>() {
        return Some(e);
    }
    None
}

/// Print an error report to stderr.
pub fn emit(err: &anyhow::Error) {
    let color = std::io::stderr().is_terminal();
    eprint!("{}", Report::from_error(err).format(color));
}
