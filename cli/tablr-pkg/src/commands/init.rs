//! `tablr-pkg init` — write a profile template.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tablr_recipe::RecipeRevision;

use crate::profile::{TablrProfile, PROFILE_FILE};

/// Write `tablr.toml` into `dir`, pinned to the newest recipe revision.
pub fn run(dir: &Path) -> Result<()> {
    let path = create_profile(dir)?;
    println!("Created {}", path.display());
    Ok(())
}

pub(crate) fn create_profile(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(PROFILE_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let version = RecipeRevision::latest().version().to_string();
    fs::write(&path, TablrProfile::template(&version))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
