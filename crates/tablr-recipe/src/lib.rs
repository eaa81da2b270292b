//! Package descriptor for the Tablr native library.
//!
//! Models the packaging contract of the C/C++ dataframe library:
//! - **Metadata and revisions:** package identity and a versioned option schema
//! - **Option pruning:** options unavailable on the target platform are removed
//! - **Toolchain generation:** enabled accelerator backends become
//!   `TABLR_<NAME>_SUPPORT = "ON"` variables written to a CMake toolchain file
//! - **Build sequencing:** configure, build and install are delegated to an
//!   external driver, strictly in order
//!
//! The library itself (dataframes, kernels, its C API) is built by CMake and
//! is opaque to this crate.

pub mod configure;
pub mod driver;
pub mod error;
pub mod exports;
pub mod layout;
pub mod metadata;
pub mod options;
pub mod package_info;
pub mod recipe;
pub mod revision;
pub mod settings;
pub mod toolchain;

pub use configure::configure_options;
pub use driver::{BuildContext, Builder, CMakeDriver};
pub use error::{RecipeError, Result};
pub use layout::Layout;
pub use metadata::PackageMetadata;
pub use options::{Accelerator, OptionSet};
pub use package_info::LibraryExports;
pub use recipe::{BuildReport, Phase, Recipe};
pub use revision::RecipeRevision;
pub use settings::{BuildType, Os, PlatformSettings};
pub use toolchain::{generate_toolchain, CMakeToolchain, ToolchainEmitter, ToolchainVariables};
