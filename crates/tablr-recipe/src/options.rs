//! Build options: declarations, accelerator backends, and the option set.
//!
//! An [`OptionDecl`] is the schema entry a recipe revision publishes for one
//! option. An [`OptionSet`] holds the current values of the options that are
//! available in this invocation; an option missing from the set cannot be
//! read or set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, Result};
use crate::settings::{Os, PlatformSettings};

/// Name of the shared/static toggle.
pub const SHARED: &str = "shared";
/// Name of the position-independent-code toggle.
pub const FPIC: &str = "fPIC";

/// Allowed value domain of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionDomain {
    /// `true` or `false`.
    Boolean,
}

impl OptionDomain {
    /// Every value the domain allows, in declaration order.
    pub fn values(&self) -> &'static [bool] {
        match self {
            OptionDomain::Boolean => &[true, false],
        }
    }

    /// Parse a textual value (`True`, `false`, `1`, `off`, ...).
    pub fn parse(&self, name: &str, value: &str) -> Result<bool> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(true),
            "false" | "0" | "off" | "no" => Ok(false),
            _ => Err(RecipeError::InvalidOptionValue {
                name: name.into(),
                value: value.into(),
            }),
        }
    }
}

/// Platforms on which an option exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Everywhere,
    /// Removed when the target os is this one.
    NotOn(Os),
}

impl Availability {
    /// Whether the option is available for `settings`. A missing os setting
    /// never removes an option.
    pub fn supported_on(&self, settings: &PlatformSettings) -> bool {
        match self {
            Availability::Everywhere => true,
            Availability::NotOn(os) => settings.os.as_ref() != Some(os),
        }
    }
}

/// Hardware accelerator backends the library can be compiled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accelerator {
    Cuda,
    Xpu,
    Npu,
    Tpu,
}

impl Accelerator {
    pub const ALL: [Accelerator; 4] = [
        Accelerator::Cuda,
        Accelerator::Xpu,
        Accelerator::Npu,
        Accelerator::Tpu,
    ];

    /// Option name controlling this backend.
    pub fn option_name(&self) -> &'static str {
        match self {
            Accelerator::Cuda => "cuda",
            Accelerator::Xpu => "xpu",
            Accelerator::Npu => "npu",
            Accelerator::Tpu => "tpu",
        }
    }

    /// Toolchain variable set to `ON` when the backend is enabled.
    pub fn toolchain_variable(&self) -> &'static str {
        match self {
            Accelerator::Cuda => "TABLR_CUDA_SUPPORT",
            Accelerator::Xpu => "TABLR_XPU_SUPPORT",
            Accelerator::Npu => "TABLR_NPU_SUPPORT",
            Accelerator::Tpu => "TABLR_TPU_SUPPORT",
        }
    }

    /// Compiler executables that indicate a usable toolchain for the backend.
    pub fn probe_tools(&self) -> &'static [&'static str] {
        match self {
            Accelerator::Cuda => &["nvcc"],
            Accelerator::Xpu => &["icpx", "dpcpp"],
            Accelerator::Npu => &["atc"],
            Accelerator::Tpu => &["edgetpu_compiler"],
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Schema entry for one option in a recipe revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub default: bool,
    pub availability: Availability,
}

impl OptionDecl {
    /// A boolean option available on every platform.
    pub const fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            domain: OptionDomain::Boolean,
            default,
            availability: Availability::Everywhere,
        }
    }

    pub fn unavailable_on(mut self, os: Os) -> Self {
        self.availability = Availability::NotOn(os);
        self
    }
}

/// Current value of one option together with its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub domain: OptionDomain,
    pub value: bool,
}

/// Options available in this invocation, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: BTreeMap<String, OptionEntry>,
}

impl OptionSet {
    /// Build the default option set from a list of declarations.
    pub fn from_decls(decls: &[OptionDecl]) -> Self {
        let entries = decls
            .iter()
            .map(|d| {
                (
                    d.name.to_string(),
                    OptionEntry {
                        domain: d.domain,
                        value: d.default,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.get(name).map(|e| e.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether the option is present and set to `true`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    /// Set an option that is present in the set.
    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        match self.entries.get_mut(name) {
            Some(entry) if entry.domain.values().contains(&value) => {
                entry.value = value;
                Ok(())
            }
            Some(_) => Err(RecipeError::InvalidOptionValue {
                name: name.into(),
                value: value.to_string(),
            }),
            None => Err(RecipeError::UnknownOption { name: name.into() }),
        }
    }

    /// Set an option from its textual form.
    pub fn set_str(&mut self, name: &str, value: &str) -> Result<()> {
        let domain = self
            .entries
            .get(name)
            .map(|e| e.domain)
            .ok_or_else(|| RecipeError::UnknownOption { name: name.into() })?;
        let parsed = domain.parse(name, value)?;
        self.set(name, parsed)
    }

    /// Remove an option entirely. Returns its last value, if it was present.
    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.entries.remove(name).map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e.value))
    }

    /// Accelerator backends that are present and enabled.
    pub fn enabled_accelerators(&self) -> Vec<Accelerator> {
        Accelerator::ALL
            .into_iter()
            .filter(|a| self.is_enabled(a.option_name()))
            .collect()
    }

    /// Plain `name -> value` view, used for reports.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl Serialize for OptionSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OptionSet {
        OptionSet::from_decls(&[
            OptionDecl::boolean(SHARED, false),
            OptionDecl::boolean(FPIC, true).unavailable_on(Os::Windows),
            OptionDecl::boolean("cuda", false),
        ])
    }

    #[test]
    fn defaults_from_decls() {
        let opts = sample();
        assert_eq!(opts.len(), 3);
        assert_eq!(opts.get(SHARED), Some(false));
        assert_eq!(opts.get(FPIC), Some(true));
        assert_eq!(opts.get("cuda"), Some(false));
        assert_eq!(opts.get("xpu"), None);
    }

    #[test]
    fn set_unknown_option_fails() {
        let mut opts = sample();
        let err = opts.set("xpu", true).unwrap_err();
        assert!(matches!(err, RecipeError::UnknownOption { .. }));
    }

    #[test]
    fn set_str_parses_values() {
        let mut opts = sample();
        opts.set_str("cuda", "True").unwrap();
        assert!(opts.is_enabled("cuda"));
        opts.set_str(SHARED, "off").unwrap();
        assert!(!opts.is_enabled(SHARED));
        assert!(matches!(
            opts.set_str("cuda", "maybe"),
            Err(RecipeError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn removed_option_is_not_settable() {
        let mut opts = sample();
        assert_eq!(opts.remove(FPIC), Some(true));
        assert_eq!(opts.remove(FPIC), None);
        assert!(opts.set(FPIC, false).is_err());
        assert!(!opts.contains(FPIC));
    }

    #[test]
    fn availability_predicate() {
        let not_windows = Availability::NotOn(Os::Windows);
        assert!(!not_windows.supported_on(&PlatformSettings::for_os(Os::Windows)));
        assert!(not_windows.supported_on(&PlatformSettings::for_os(Os::Linux)));
        assert!(not_windows.supported_on(&PlatformSettings::default()));
        assert!(Availability::Everywhere.supported_on(&PlatformSettings::for_os(Os::Windows)));
    }

    #[test]
    fn accelerator_names() {
        for acc in Accelerator::ALL {
            let var = acc.toolchain_variable();
            assert_eq!(
                var,
                format!("TABLR_{}_SUPPORT", acc.option_name().to_uppercase())
            );
        }
    }

    #[test]
    fn enabled_accelerators_ignores_missing() {
        let mut opts = sample();
        opts.set("cuda", true).unwrap();
        assert_eq!(opts.enabled_accelerators(), vec![Accelerator::Cuda]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["fPIC"], serde_json::json!(true));
        assert_eq!(json["shared"], serde_json::json!(false));
    }
}
