//! Platform settings supplied by the calling build environment.
//!
//! Every field is optional: a missing setting means "not applicable" and
//! never causes an error in the descriptor phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};

/// Operating system of the build target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Os {
    Linux,
    Windows,
    Macos,
    FreeBSD,
    Android,
    /// Any system the descriptor has no special handling for.
    Other(String),
}

impl Os {
    /// Operating system of the host running this process.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBSD,
            "android" => Os::Android,
            other => Os::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Os::Linux => "Linux",
            Os::Windows => "Windows",
            Os::Macos => "Macos",
            Os::FreeBSD => "FreeBSD",
            Os::Android => "Android",
            Os::Other(name) => name,
        }
    }
}

impl FromStr for Os {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(RecipeError::InvalidSetting {
                key: "os".into(),
                value: s.into(),
            });
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            "macos" | "darwin" => Os::Macos,
            "freebsd" => Os::FreeBSD,
            "android" => Os::Android,
            _ => Os::Other(s.to_string()),
        })
    }
}

impl TryFrom<String> for Os {
    type Error = RecipeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Os> for String {
    fn from(os: Os) -> String {
        os.as_str().to_string()
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(RecipeError::InvalidSetting {
                key: "build_type".into(),
                value: s.into(),
            }),
        }
    }
}

impl TryFrom<String> for BuildType {
    type Error = RecipeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<BuildType> for String {
    fn from(bt: BuildType) -> String {
        bt.as_str().to_string()
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings of the current invocation: os, compiler, build type, arch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default)]
    pub os: Option<Os>,
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub build_type: Option<BuildType>,
    #[serde(default)]
    pub arch: Option<String>,
}

impl PlatformSettings {
    /// Settings describing the host: os and arch detected, release build,
    /// compiler left unset.
    pub fn host() -> Self {
        Self {
            os: Some(Os::host()),
            compiler: None,
            build_type: Some(BuildType::Release),
            arch: Some(std::env::consts::ARCH.to_string()),
        }
    }

    /// Settings for a given os with everything else unset.
    pub fn for_os(os: Os) -> Self {
        Self {
            os: Some(os),
            ..Self::default()
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self.os, Some(Os::Windows))
    }

    /// Build type, falling back to `Release` when unset.
    pub fn build_type_or_default(&self) -> BuildType {
        self.build_type.unwrap_or_default()
    }

    /// Apply a `key=value` override. Unknown keys are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "os" => self.os = Some(value.parse()?),
            "compiler" => self.compiler = Some(value.to_string()),
            "build_type" => self.build_type = Some(value.parse()?),
            "arch" => self.arch = Some(value.to_string()),
            _ => {
                return Err(RecipeError::InvalidSetting {
                    key: key.into(),
                    value: value.into(),
                })
            }
        }
        Ok(())
    }

    /// Overlay every field that `other` sets.
    pub fn merge(&mut self, other: &PlatformSettings) {
        if other.os.is_some() {
            self.os = other.os.clone();
        }
        if other.compiler.is_some() {
            self.compiler = other.compiler.clone();
        }
        if other.build_type.is_some() {
            self.build_type = other.build_type;
        }
        if other.arch.is_some() {
            self.arch = other.arch.clone();
        }
    }
}
