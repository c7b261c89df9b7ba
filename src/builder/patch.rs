//! One-shot patch that wires the dependency setup into `CMakeLists.txt`.
//!
//! The anchor lookup and the insertion are separate steps: [`find_anchor`]
//! classifies the file, and [`insert_after`] only accepts a single match.
//! A file that already carries the include is rejected outright.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::builder::buildinfo::BUILD_INFO_FILE;
use crate::util::fs::{read_to_string, write_string};

/// Include directive for the generated build-metadata file.
pub fn include_directive() -> String {
    format!("include(${{CMAKE_BINARY_DIR}}/{})", BUILD_INFO_FILE)
}

/// Macro call defined by the build-metadata file.
pub const SETUP_CALL: &str = "conan_basic_setup()";

/// Errors from patching a build description.
#[derive(Debug, Error, Diagnostic)]
pub enum PatchError {
    #[error("anchor `{anchor}` not found in {}", .path.display())]
    #[diagnostic(
        code(ucbuild::patch::anchor_not_found),
        help("the project() call must end with `{anchor}` for the dependency setup to be inserted")
    )]
    AnchorNotFound { anchor: String, path: PathBuf },

    #[error("anchor `{anchor}` occurs {count} times in {}", .path.display())]
    #[diagnostic(
        code(ucbuild::patch::ambiguous_anchor),
        help("the anchor must occur exactly once")
    )]
    AmbiguousAnchor {
        anchor: String,
        count: usize,
        path: PathBuf,
    },

    #[error("{} already includes the dependency setup", .path.display())]
    #[diagnostic(
        code(ucbuild::patch::already_applied),
        help("run `ucbuild source` again to start from a fresh copy of the sources")
    )]
    AlreadyApplied { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(ucbuild::patch::io))]
    Io(#[from] anyhow::Error),
}

/// Result of looking for the anchor in a build description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorLookup {
    /// Exactly one occurrence; the byte offset just past it.
    FoundOnce(usize),
    NotFound,
    FoundMultiple(usize),
}

/// Locate `anchor` in `text`.
pub fn find_anchor(text: &str, anchor: &str) -> AnchorLookup {
    if anchor.is_empty() {
        return AnchorLookup::NotFound;
    }

    let mut matches = text.match_indices(anchor);
    match (matches.next(), matches.count()) {
        (None, _) => AnchorLookup::NotFound,
        (Some((offset, _)), 0) => AnchorLookup::FoundOnce(offset + anchor.len()),
        (Some(_), rest) => AnchorLookup::FoundMultiple(rest + 1),
    }
}

/// Whether the dependency setup is already present.
pub fn is_patched(text: &str) -> bool {
    text.contains(&include_directive())
}

/// Insert the dependency setup right after the anchor.
///
/// Returns `None` unless `lookup` is [`AnchorLookup::FoundOnce`] with an
/// offset that falls on a character boundary of `text`.
pub fn insert_after(text: &str, lookup: AnchorLookup) -> Option<String> {
    let AnchorLookup::FoundOnce(offset) = lookup else {
        return None;
    };
    if !text.is_char_boundary(offset) {
        return None;
    }

    let (head, tail) = text.split_at(offset);
    let mut out = String::with_capacity(text.len() + 96);
    out.push_str(head);
    out.push('\n');
    out.push_str(&include_directive());
    out.push('\n');
    out.push_str(SETUP_CALL);
    out.push_str(tail);
    Some(out)
}

/// Patch the text of a build description. `path` is only used in errors.
pub fn patch_text(text: &str, anchor: &str, path: &Path) -> Result<String, PatchError> {
    if is_patched(text) {
        return Err(PatchError::AlreadyApplied {
            path: path.to_path_buf(),
        });
    }

    let lookup = find_anchor(text, anchor);
    if let AnchorLookup::FoundMultiple(count) = lookup {
        return Err(PatchError::AmbiguousAnchor {
            anchor: anchor.to_string(),
            count,
            path: path.to_path_buf(),
        });
    }

    insert_after(text, lookup).ok_or_else(|| PatchError::AnchorNotFound {
        anchor: anchor.to_string(),
        path: path.to_path_buf(),
    })
}

/// Patch a build description on disk. The file is only written on success.
pub fn patch_file(path: &Path, anchor: &str) -> Result<(), PatchError> {
    let text = read_to_string(path)?;
    let patched = patch_text(&text, anchor, path)?;
    write_string(path, &patched)?;
    tracing::debug!("Patched {}", path.display());
    Ok(())
}
