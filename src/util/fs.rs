//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use walkdir::WalkDir;

/// Recursively copy a directory.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory: {}", dst.display()))?;

    for entry in fs::read_dir(src)
        .with_context(|| format!("failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Files and directories matching a glob pattern relative to `base`.
///
/// `base` is matched literally, so a directory name holding `[`, `*` or `?`
/// does not change what the pattern selects.
pub fn glob_paths(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base_str = base.to_string_lossy();
    let full_pattern = format!(
        "{}/{}",
        Pattern::escape(base_str.trim_end_matches(['/', '\\'])),
        pattern
    );

    let mut results = Vec::new();
    for entry in glob(&full_pattern).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        let path = entry
            .with_context(|| format!("failed to match `{}` in {}", pattern, base.display()))?;
        results.push(path);
    }

    results.sort();
    Ok(results)
}

/// Every regular file below `dir`, sorted.
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_paths_includes_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("detail")).unwrap();
        fs::write(src.join("UCBlock.cpp"), "").unwrap();
        fs::write(src.join("UnitBlock.cpp"), "").unwrap();

        let paths = glob_paths(tmp.path(), "src/*").unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&src.join("detail")));
    }

    #[test]
    fn test_glob_paths_no_match() {
        let tmp = TempDir::new().unwrap();
        assert!(glob_paths(tmp.path(), "tools/*").unwrap().is_empty());
    }

    #[test]
    fn test_glob_paths_literal_base() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("ucblock[v2]");
        fs::create_dir_all(base.join("include")).unwrap();
        fs::write(base.join("CMakeLists.txt"), "").unwrap();

        assert_eq!(
            glob_paths(&base, "CMakeLists.txt").unwrap(),
            vec![base.join("CMakeLists.txt")]
        );
        assert_eq!(glob_paths(&base, "inc*").unwrap(), vec![base.join("include")]);
    }

    #[test]
    fn test_glob_paths_wildcard_in_base_is_literal() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a")).unwrap();
        fs::write(tmp.path().join("a/LICENSE"), "").unwrap();

        assert!(glob_paths(&tmp.path().join("*"), "LICENSE").unwrap().is_empty());
    }

    #[test]
    fn test_copy_dir_all() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");

        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("nested/file.txt"), "content").unwrap();

        copy_dir_all(&src, &dst).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("nested/file.txt")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_walk_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("include/SMS++")).unwrap();
        fs::write(tmp.path().join("include/SMS++/UCBlock.h"), "").unwrap();
        fs::write(tmp.path().join("LICENSE"), "").unwrap();

        let files = walk_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
    }
}
