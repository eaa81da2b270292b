//! `tablr-pkg clean` — remove build output.

use std::fs;
use std::path::Path;

use anyhow::Result;

/// Remove `<source>/build`, and the package folder when `package` is set.
pub fn run(source_dir: &Path, package_dir: &Path, package: bool) -> Result<()> {
    remove(&source_dir.join("build"))?;
    if package {
        remove(package_dir)?;
    }
    Ok(())
}

fn remove(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
        println!("Removed {}", dir.display());
    } else {
        println!("Already clean: {} does not exist", dir.display());
    }
    Ok(())
}
