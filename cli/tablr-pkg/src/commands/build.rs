//! `tablr-pkg build` — export check, generate, build and package.

use std::path::Path;

use anyhow::{Context, Result};
use tablr_recipe::exports::check_exports;
use tablr_recipe::{BuildReport, Builder, CMakeDriver, CMakeToolchain, Recipe};

use super::Format;
use crate::profile::BuildConfig;

/// Driver configured from the profile's `[build]` section.
pub fn driver_from_config(config: &BuildConfig) -> CMakeDriver {
    let mut driver = CMakeDriver::default();
    if let Some(cmake) = &config.cmake {
        driver.program = cmake.clone();
    }
    driver.generator = config.generator.clone();
    driver.jobs = config.jobs;
    driver
}

/// Run every descriptor phase against `source_dir` using `cmake`.
pub fn run(
    recipe: Recipe,
    source_dir: &Path,
    config: &BuildConfig,
    format: Format,
) -> Result<()> {
    let mut driver = driver_from_config(config);
    let report = run_with(recipe, source_dir, config, &mut driver)?;
    print_report(&report, format)
}

pub(crate) fn run_with(
    mut recipe: Recipe,
    source_dir: &Path,
    config: &BuildConfig,
    builder: &mut dyn Builder,
) -> Result<BuildReport> {
    check_exports(source_dir)
        .with_context(|| format!("checking sources in {}", source_dir.display()))?;

    let reference = recipe.metadata().reference();
    println!("Building {reference}");
    let package_dir = config.package_dir.as_deref().map(Path::new);
    let report = recipe
        .run(source_dir, package_dir, &CMakeToolchain, builder)
        .with_context(|| format!("building {reference}"))?;
    Ok(report)
}

fn print_report(report: &BuildReport, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Text => {
            println!("Package:   {}", report.package);
            println!("Toolchain: {}", report.toolchain_file.display());
            println!("Installed: {}", report.package_dir.display());
            if !report.variables.is_empty() {
                println!("Backends:");
                for name in report.variables.keys() {
                    println!("  {name}");
                }
            }
            print!("{}", report.exports);
        }
    }
    Ok(())
}
