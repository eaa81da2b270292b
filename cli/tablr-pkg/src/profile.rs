//! `tablr.toml` profile parsing.
//!
//! A profile pins the recipe version, platform settings, option values and
//! build-driver configuration for a source tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tablr_recipe::PlatformSettings;

/// Profile file name searched for from the working directory upward.
pub const PROFILE_FILE: &str = "tablr.toml";

/// The top-level profile structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablrProfile {
    /// Recipe selection.
    #[serde(default)]
    pub package: Option<PackageConfig>,
    /// Platform settings; unset fields fall back to the host.
    #[serde(default)]
    pub settings: PlatformSettings,
    /// Option overrides.
    #[serde(default)]
    pub options: BTreeMap<String, bool>,
    /// Build driver configuration.
    #[serde(default)]
    pub build: Option<BuildConfig>,
}

/// `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Recipe version to use (defaults to the newest).
    #[serde(default)]
    pub version: Option<String>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// CMake executable.
    #[serde(default)]
    pub cmake: Option<String>,
    /// CMake generator passed with `-G`.
    #[serde(default)]
    pub generator: Option<String>,
    /// Parallel build jobs.
    #[serde(default)]
    pub jobs: Option<u32>,
    /// Install prefix, relative to the source folder unless absolute.
    #[serde(default)]
    pub package_dir: Option<String>,
}

impl TablrProfile {
    /// Search upward from `start_dir` for a `tablr.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(PROFILE_FILE);
            if candidate.is_file() {
                let profile = Self::load(&candidate)?;
                return Ok(Some((profile, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load a profile from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a profile from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing tablr.toml")
    }

    pub fn recipe_version(&self) -> Option<&str> {
        self.package.as_ref().and_then(|p| p.version.as_deref())
    }

    pub fn build_config(&self) -> BuildConfig {
        self.build.clone().unwrap_or_default()
    }

    /// Generate the default template for `tablr-pkg init`.
    pub fn template(version: &str) -> String {
        format!(
            r#"[package]
version = "{version}"

[settings]
build_type = "Release"

[options]
shared = false
cuda = false
xpu = false
npu = false
tpu = false

[build]
cmake = "cmake"
package-dir = "package"
"#
        )
    }
}
