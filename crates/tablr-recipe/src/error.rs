//! Error types for descriptor operations.

use std::path::PathBuf;

use crate::recipe::Phase;

/// Errors that can occur while configuring, generating, building or packaging.
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    /// No recipe revision is published for the requested version.
    #[error("no recipe revision for tablr {version}")]
    UnknownVersion { version: String },

    /// The option is not declared by the recipe revision.
    #[error("option '{name}' is not declared by this recipe")]
    UnknownOption { name: String },

    /// The value is outside the option's allowed domain.
    #[error("invalid value '{value}' for option '{name}' (expected true or false)")]
    InvalidOptionValue { name: String, value: String },

    /// Options cannot change once `config_options` has run.
    #[error("option '{name}' cannot be changed after config_options")]
    OptionsFrozen { name: String },

    /// A platform setting could not be parsed.
    #[error("invalid setting {key}='{value}'")]
    InvalidSetting { key: String, value: String },

    /// A phase was invoked before its predecessor completed.
    #[error("phase '{requested}' requires '{expected}' to have run first")]
    PhaseOrder { requested: Phase, expected: Phase },

    /// An exported source pattern matched nothing under the package root.
    #[error("exported source '{pattern}' not found under {}", root.display())]
    MissingExport { pattern: String, root: PathBuf },

    /// The external build driver reported a failure.
    #[error("build step '{step}' failed: {detail}")]
    BuildFailed { step: String, detail: String },

    /// I/O error reading or writing descriptor files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Semver parse error.
    #[error("invalid version: {0}")]
    Semver(#[from] semver::Error),
}

/// Result type alias for descriptor operations.
pub type Result<T> = std::result::Result<T, RecipeError>;
