//! `tablr-pkg doctor` — toolchain diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tablr_recipe::{Accelerator, RecipeRevision};

use crate::profile::{TablrProfile, PROFILE_FILE};

/// Print toolchain diagnostic information.
pub fn run(project_dir: &Path, cmake: &str) -> Result<()> {
    println!("=== Tablr Doctor ===");
    println!();

    println!("tablr-pkg version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Recipe revisions:  {}",
        RecipeRevision::all()
            .iter()
            .map(|r| r.version().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    println!("--- Build Tools ---");
    print_tool_status(cmake);
    print_tool_status("ninja");
    println!();

    println!("--- Accelerator Toolchains ---");
    for acc in Accelerator::ALL {
        let found = acc.probe_tools().iter().find_map(|tool| tool_version(tool));
        match found {
            Some(version) => println!("  {acc}: {version}"),
            None => println!(
                "  {acc}: not found (looked for {})",
                acc.probe_tools().join(", ")
            ),
        }
    }
    println!();

    println!("--- Profile ---");
    match TablrProfile::find_and_load(project_dir) {
        Ok(Some((profile, dir))) => {
            println!("  {PROFILE_FILE}: found at {}", dir.display());
            if let Some(version) = profile.recipe_version() {
                println!("  Recipe version: {version}");
            }
            for (name, value) in &profile.options {
                println!("  {name}={value}");
            }
        }
        Ok(None) => println!("  {PROFILE_FILE}: not found"),
        Err(e) => println!("  {PROFILE_FILE}: error: {e:#}"),
    }

    Ok(())
}

fn tool_version(name: &str) -> Option<String> {
    let output = Command::new(name).arg("--version").output().ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    Some(text.lines().next().unwrap_or("(unknown version)").to_string())
}

fn print_tool_status(name: &str) {
    match tool_version(name) {
        Some(version) => println!("  {name}: {version}"),
        None => println!("  {name}: not found"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn doctor_runs_without_error() {
        let dir = tempfile::tempdir().unwrap();
        super::run(dir.path(), "cmake").unwrap();
    }

    #[test]
    fn missing_tool_has_no_version() {
        assert!(super::tool_version("tablr-no-such-tool").is_none());
    }
}
