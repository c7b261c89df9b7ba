//! Generator for the build-metadata file consumed by the patched `CMakeLists.txt`.
//!
//! The file defines per-dependency and aggregate `CONAN_*` variables plus a
//! `conan_basic_setup()` macro that applies them to the including project.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;

use crate::sources::ResolvedDependency;
use crate::util::fs::write_string;

/// Name of the generated file, placed in the CMake binary directory.
pub const BUILD_INFO_FILE: &str = "conanbuildinfo.cmake";

/// Render the build-metadata file for a set of resolved dependencies.
pub fn render(deps: &[ResolvedDependency]) -> String {
    let mut out = String::new();
    out.push_str("# Generated by ucbuild. Do not edit.\n\n");

    let mut names = Vec::new();
    for dep in deps {
        let upper = dep.reference.name().to_ascii_uppercase().replace(['-', '+'], "_");
        let _ = writeln!(out, "# {}", dep.reference);
        let _ = writeln!(out, "set(CONAN_{}_ROOT {})", upper, quote(&dep.root));
        let _ = writeln!(
            out,
            "set(CONAN_INCLUDE_DIRS_{} {})",
            upper,
            quote_all(&dep.include_dirs)
        );
        let _ = writeln!(out, "set(CONAN_LIB_DIRS_{} {})", upper, quote_all(&dep.lib_dirs));
        let _ = writeln!(out, "set(CONAN_BIN_DIRS_{} {})", upper, quote_all(&dep.bin_dirs));
        let _ = writeln!(out, "set(CONAN_LIBS_{} {})", upper, dep.libs.join(" "));
        out.push('\n');
        names.push(upper);
    }

    for var in ["INCLUDE_DIRS", "LIB_DIRS", "BIN_DIRS", "LIBS"] {
        let refs: Vec<String> = names
            .iter()
            .map(|n| format!("${{CONAN_{}_{}}}", var, n))
            .collect();
        let _ = writeln!(
            out,
            "set(CONAN_{0} {1} ${{CONAN_{0}}})",
            var,
            refs.join(" ")
        );
    }

    let roots: Vec<String> = names
        .iter()
        .map(|n| format!("${{CONAN_{}_ROOT}}", n))
        .collect();
    let _ = writeln!(out, "set(CONAN_CMAKE_PREFIX_PATH {})", roots.join(" "));

    out.push_str(
        r#"
macro(conan_basic_setup)
    message(STATUS "Conan: Using generated build info")
    include_directories(${CONAN_INCLUDE_DIRS})
    link_directories(${CONAN_LIB_DIRS})
    list(APPEND CMAKE_PREFIX_PATH ${CONAN_CMAKE_PREFIX_PATH})
    list(APPEND CMAKE_MODULE_PATH ${CONAN_CMAKE_PREFIX_PATH})
endmacro()
"#,
    );

    out
}

/// Write the build-metadata file into `build_dir`.
pub fn write(build_dir: &Path, deps: &[ResolvedDependency]) -> Result<()> {
    let path = build_dir.join(BUILD_INFO_FILE);
    write_string(&path, &render(deps))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// CMake-quote a path, using forward slashes.
fn quote(path: &Path) -> String {
    format!("\"{}\"", path.display().to_string().replace('\\', "/"))
}

fn quote_all(paths: &[impl AsRef<Path>]) -> String {
    paths
        .iter()
        .map(|p| quote(p.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn smspp() -> ResolvedDependency {
        let root = PathBuf::from("/cache/smspp/0.5.2/smspp/testing/package");
        ResolvedDependency {
            reference: "smspp/0.5.2@smspp/testing".parse().unwrap(),
            include_dirs: vec![root.join("include"), root.join("include/SMS++")],
            lib_dirs: vec![root.join("lib")],
            bin_dirs: vec![root.join("bin")],
            libs: vec!["SMS++".to_string()],
            root,
        }
    }

    #[test]
    fn test_render_defines_setup_macro() {
        let text = render(&[smspp()]);
        assert!(text.contains("macro(conan_basic_setup)"));
        assert!(text.contains("endmacro()"));
    }

    #[test]
    fn test_render_dependency_variables() {
        let text = render(&[smspp()]);
        assert!(text.contains("set(CONAN_SMSPP_ROOT \"/cache/smspp/0.5.2/smspp/testing/package\")"));
        assert!(text.contains("set(CONAN_LIBS_SMSPP SMS++)"));
        assert!(text.contains("set(CONAN_INCLUDE_DIRS ${CONAN_INCLUDE_DIRS_SMSPP} ${CONAN_INCLUDE_DIRS})"));
        assert!(text.contains("set(CONAN_CMAKE_PREFIX_PATH ${CONAN_SMSPP_ROOT})"));
    }

    #[test]
    fn test_write() {
        let tmp = tempfile::TempDir::new().unwrap();
        write(tmp.path(), &[smspp()]).unwrap();
        assert!(tmp.path().join(BUILD_INFO_FILE).exists());
    }
}
