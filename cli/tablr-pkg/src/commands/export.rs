//! `tablr-pkg export` — verify exported sources and write their manifest.

use std::path::Path;

use anyhow::{Context, Result};
use tablr_recipe::exports::write_manifest;

/// Check the export patterns under `source_dir` and write `tablr_manifest.txt`.
pub fn run(source_dir: &Path) -> Result<()> {
    let path = write_manifest(source_dir)
        .with_context(|| format!("exporting sources from {}", source_dir.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn export_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "\n").unwrap();
        fs::create_dir_all(dir.path().join("src/io")).unwrap();
        fs::write(dir.path().join("src/io/csv.c"), "\n").unwrap();
        fs::create_dir_all(dir.path().join("include")).unwrap();
        fs::write(dir.path().join("include/tablr.h"), "\n").unwrap();

        run(dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("tablr_manifest.txt")).unwrap();
        assert!(text.contains("src/io/csv.c: "));
    }

    #[test]
    fn export_fails_without_cmakelists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path()).is_err());
    }
}
