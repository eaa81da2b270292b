//! `tablr-pkg toolchain` — emit the CMake toolchain without building.

use std::path::Path;

use anyhow::{Context, Result};
use tablr_recipe::{CMakeToolchain, Recipe};

/// Run `config_options`, `layout` and `generate`, then print what was emitted.
pub fn run(mut recipe: Recipe, source_dir: &Path, package_dir: Option<&Path>) -> Result<()> {
    recipe.config_options()?;
    recipe.layout(source_dir, package_dir)?;
    let variables = recipe
        .generate(&CMakeToolchain)
        .context("generating toolchain")?
        .clone();
    let report = recipe.report()?;

    println!("Toolchain: {}", report.toolchain_file.display());
    if variables.is_empty() {
        println!("No accelerator backends enabled.");
    } else {
        for (name, value) in &variables {
            println!("  {name}={value}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablr_recipe::{BuildType, Layout, Os, PlatformSettings, RecipeRevision};

    #[test]
    fn writes_toolchain_into_generators_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut recipe = Recipe::new(RecipeRevision::latest(), PlatformSettings::for_os(Os::Linux));
        recipe.set_option("npu", "true").unwrap();

        run(recipe, dir.path(), None).unwrap();

        let layout = Layout::cmake(dir.path(), BuildType::Release);
        let text = std::fs::read_to_string(layout.toolchain_file()).unwrap();
        assert!(text.contains("set(TABLR_NPU_SUPPORT \"ON\""));
        assert!(layout.toolchain_json().is_file());
    }
}
