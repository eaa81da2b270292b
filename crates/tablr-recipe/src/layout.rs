//! Folder layout of one build.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::settings::BuildType;

/// File name of the emitted CMake toolchain.
pub const TOOLCHAIN_FILE: &str = "tablr_toolchain.cmake";
/// File name of the machine-readable toolchain summary.
pub const TOOLCHAIN_JSON: &str = "tablr_toolchain.json";

/// Source, build, generators and package folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub source_dir: PathBuf,
    /// `build/<BuildType>` under the source folder.
    pub build_dir: PathBuf,
    /// `generators/` under the build folder; receives the toolchain file.
    pub generators_dir: PathBuf,
    /// Install prefix for `package`.
    pub package_dir: PathBuf,
}

impl Layout {
    /// CMake-style layout rooted at `source_dir`.
    pub fn cmake(source_dir: &Path, build_type: BuildType) -> Self {
        let build_dir = source_dir.join("build").join(build_type.as_str());
        Self {
            source_dir: source_dir.to_path_buf(),
            generators_dir: build_dir.join("generators"),
            build_dir,
            package_dir: source_dir.join("package"),
        }
    }

    /// Install into `package_dir` instead of `<source>/package`. Relative
    /// paths are resolved against the source folder.
    pub fn with_package_dir(mut self, package_dir: &Path) -> Self {
        self.package_dir = if package_dir.is_absolute() {
            package_dir.to_path_buf()
        } else {
            self.source_dir.join(package_dir)
        };
        self
    }

    pub fn toolchain_file(&self) -> PathBuf {
        self.generators_dir.join(TOOLCHAIN_FILE)
    }

    pub fn toolchain_json(&self) -> PathBuf {
        self.generators_dir.join(TOOLCHAIN_JSON)
    }

    /// Create the build and generators folders.
    pub fn create_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.generators_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmake_layout_paths() {
        let l = Layout::cmake(Path::new("/src/tablr"), BuildType::Debug);
        assert_eq!(l.build_dir, Path::new("/src/tablr/build/Debug"));
        assert_eq!(l.generators_dir, Path::new("/src/tablr/build/Debug/generators"));
        assert_eq!(l.package_dir, Path::new("/src/tablr/package"));
        assert_eq!(
            l.toolchain_file(),
            Path::new("/src/tablr/build/Debug/generators/tablr_toolchain.cmake")
        );
    }

    #[test]
    fn package_dir_override() {
        let l = Layout::cmake(Path::new("/src"), BuildType::Release)
            .with_package_dir(Path::new("dist"));
        assert_eq!(l.package_dir, Path::new("/src/dist"));
        let l = l.with_package_dir(Path::new("/opt/tablr"));
        assert_eq!(l.package_dir, Path::new("/opt/tablr"));
    }

    #[test]
    fn create_dirs_makes_generators_folder() {
        let dir = tempfile::tempdir().unwrap();
        let l = Layout::cmake(dir.path(), BuildType::Release);
        l.create_dirs().unwrap();
        assert!(l.generators_dir.is_dir());
        // second call is harmless
        l.create_dirs().unwrap();
    }
}
