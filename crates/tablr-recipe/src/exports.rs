//! Exported sources: the files bundled verbatim with the package.
//!
//! A pattern is either a plain file path (`CMakeLists.txt`) or a directory
//! followed by `/*`, which covers every file below that directory.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{RecipeError, Result};

/// Source patterns exported with every tablr revision.
pub const EXPORT_SOURCES: [&str; 3] = ["CMakeLists.txt", "src/*", "include/*"];

/// File name of the exported-sources manifest.
pub const MANIFEST_FILE: &str = "tablr_manifest.txt";

/// One exported file and its SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    /// Path relative to the package root, `/`-separated.
    pub path: String,
    pub sha256: String,
}

/// Check that every pattern matches at least one file under `root`.
pub fn check_exports(root: &Path) -> Result<()> {
    for pattern in EXPORT_SOURCES {
        if matched_files(root, pattern)?.is_empty() {
            return Err(RecipeError::MissingExport {
                pattern: pattern.to_string(),
                root: root.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Digest every exported file, sorted by relative path.
pub fn export_manifest(root: &Path) -> Result<Vec<ExportEntry>> {
    check_exports(root)?;
    let mut entries = Vec::new();
    for pattern in EXPORT_SOURCES {
        for file in matched_files(root, pattern)? {
            let data = fs::read(&file)?;
            entries.push(ExportEntry {
                path: relative(root, &file),
                sha256: sha256_hex(&data),
            });
        }
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|a, b| a.path == b.path);
    Ok(entries)
}

/// Write the manifest as `path: digest` lines to `root/tablr_manifest.txt`.
pub fn write_manifest(root: &Path) -> Result<PathBuf> {
    let entries = export_manifest(root)?;
    let body: String = entries
        .iter()
        .map(|e| format!("{}: {}\n", e.path, e.sha256))
        .collect();
    let path = root.join(MANIFEST_FILE);
    fs::write(&path, body)?;
    Ok(path)
}

fn matched_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    match pattern.strip_suffix("/*") {
        Some(dir) => {
            let mut files = Vec::new();
            let dir = root.join(dir);
            if dir.is_dir() {
                walk(&dir, &mut files)?;
            }
            Ok(files)
        }
        None => {
            let file = root.join(pattern);
            Ok(if file.is_file() { vec![file] } else { Vec::new() })
        }
    }
}

/// Collect files below `dir`. Symlinked directories are not entered;
/// symlinks to regular files are kept.
fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(())
}

fn relative(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("CMakeLists.txt"), "project(tablr C CXX)\n").unwrap();
        fs::create_dir_all(root.join("src/core")).unwrap();
        fs::write(root.join("src/tablr.c"), "int x;\n").unwrap();
        fs::write(root.join("src/core/series.c"), "int y;\n").unwrap();
        fs::create_dir_all(root.join("include/tablr")).unwrap();
        fs::write(root.join("include/tablr/tablr.h"), "#pragma once\n").unwrap();
        dir
    }

    #[test]
    fn complete_tree_passes() {
        let dir = package_root();
        check_exports(dir.path()).unwrap();
    }

    #[test]
    fn missing_include_tree_fails() {
        let dir = package_root();
        fs::remove_dir_all(dir.path().join("include")).unwrap();
        let err = check_exports(dir.path()).unwrap_err();
        assert!(
            matches!(err, RecipeError::MissingExport { ref pattern, .. } if pattern == "include/*")
        );
    }

    #[test]
    fn empty_src_dir_fails() {
        let dir = package_root();
        fs::remove_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        assert!(check_exports(dir.path()).is_err());
    }

    #[test]
    fn manifest_is_sorted_and_recursive() {
        let dir = package_root();
        let entries = export_manifest(dir.path()).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "CMakeLists.txt",
                "include/tablr/tablr.h",
                "src/core/series.c",
                "src/tablr.c",
            ]
        );
        assert!(entries.iter().all(|e| e.sha256.len() == 64));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = package_root();
        let root = dir.path();
        std::os::unix::fs::symlink(root.join("src"), root.join("src/self")).unwrap();
        std::os::unix::fs::symlink(root.join("src/tablr.c"), root.join("src/alias.c")).unwrap();

        let entries = export_manifest(root).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "CMakeLists.txt",
                "include/tablr/tablr.h",
                "src/alias.c",
                "src/core/series.c",
                "src/tablr.c",
            ]
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn write_manifest_lines() {
        let dir = package_root();
        let path = write_manifest(dir.path()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("CMakeLists.txt: "));
    }
}
