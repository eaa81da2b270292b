//! What consumers of the installed package link against.

use std::fmt;

use serde::Serialize;

use crate::metadata::PACKAGE_NAME;

/// Libraries and folders exported to consumers, relative to the package folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryExports {
    pub libs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
}

impl LibraryExports {
    /// The single `tablr` library, whatever backends were compiled in.
    pub fn tablr() -> Self {
        Self {
            libs: vec![PACKAGE_NAME.to_string()],
            include_dirs: vec!["include".to_string()],
            lib_dirs: vec!["lib".to_string()],
            bin_dirs: vec!["bin".to_string()],
        }
    }
}

impl fmt::Display for LibraryExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Libraries:   {}", self.libs.join(", "))?;
        writeln!(f, "Includedirs: {}", self.include_dirs.join(", "))?;
        writeln!(f, "Libdirs:     {}", self.lib_dirs.join(", "))?;
        writeln!(f, "Bindirs:     {}", self.bin_dirs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_library() {
        let exports = LibraryExports::tablr();
        assert_eq!(exports.libs, vec!["tablr"]);
        assert_eq!(exports.include_dirs, vec!["include"]);
    }
}
