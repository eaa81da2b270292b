//! Toolchain variable generation and toolchain file emission.
//!
//! [`generate_toolchain`] turns the enabled accelerator options into
//! `TABLR_<NAME>_SUPPORT = "ON"` entries. A [`ToolchainEmitter`] then writes
//! those entries, together with the usual shared/PIC/build-type block, into
//! a file the build driver hands to CMake.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::layout::Layout;
use crate::metadata::PackageMetadata;
use crate::options::{OptionSet, FPIC, SHARED};
use crate::settings::PlatformSettings;

/// Toolchain variables, ordered by name.
pub type ToolchainVariables = BTreeMap<String, String>;

/// Value written for every enabled backend.
pub const ON: &str = "ON";

/// Map enabled accelerator options to toolchain variables.
///
/// Disabled or absent accelerators produce no entry; `OFF` is never emitted.
pub fn generate_toolchain(options: &OptionSet) -> ToolchainVariables {
    options
        .enabled_accelerators()
        .into_iter()
        .map(|acc| (acc.toolchain_variable().to_string(), ON.to_string()))
        .collect()
}

/// Everything an emitter may read while writing a toolchain.
#[derive(Debug, Clone, Copy)]
pub struct ToolchainContext<'a> {
    pub metadata: &'a PackageMetadata,
    pub settings: &'a PlatformSettings,
    pub options: &'a OptionSet,
    pub layout: &'a Layout,
}

/// Writes toolchain variables somewhere the build driver can pick them up.
pub trait ToolchainEmitter {
    /// Emit the toolchain and return the path of the file to pass to the driver.
    fn emit(&self, ctx: &ToolchainContext<'_>, variables: &ToolchainVariables) -> Result<PathBuf>;
}

/// Emits `tablr_toolchain.cmake` plus a JSON summary into the generators folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct CMakeToolchain;

#[derive(Serialize)]
struct ToolchainSummary<'a> {
    package: String,
    settings: &'a PlatformSettings,
    options: &'a OptionSet,
    variables: &'a ToolchainVariables,
}

impl CMakeToolchain {
    /// Render the toolchain file contents.
    pub fn render(ctx: &ToolchainContext<'_>, variables: &ToolchainVariables) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Toolchain for {}\n", ctx.metadata.reference()));
        out.push_str("# Generated by tablr-pkg. Do not edit.\n\n");

        if let Some(shared) = ctx.options.get(SHARED) {
            out.push_str(&format!(
                "set(BUILD_SHARED_LIBS {} CACHE BOOL \"Build shared libraries\" FORCE)\n",
                cmake_bool(shared)
            ));
        }
        // Absent on platforms where the option was pruned.
        if let Some(fpic) = ctx.options.get(FPIC) {
            out.push_str(&format!(
                "set(CMAKE_POSITION_INDEPENDENT_CODE {} CACHE BOOL \"Position independent code\" FORCE)\n",
                cmake_bool(fpic)
            ));
        }
        if let Some(build_type) = ctx.settings.build_type {
            out.push_str(&format!(
                "set(CMAKE_BUILD_TYPE \"{build_type}\" CACHE STRING \"Build type\" FORCE)\n"
            ));
        }

        if !variables.is_empty() {
            out.push('\n');
            for (name, value) in variables {
                out.push_str(&format!("set({name} \"{value}\" CACHE STRING \"\" FORCE)\n"));
            }
        }
        out
    }
}

fn cmake_bool(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

impl ToolchainEmitter for CMakeToolchain {
    fn emit(&self, ctx: &ToolchainContext<'_>, variables: &ToolchainVariables) -> Result<PathBuf> {
        ctx.layout.create_dirs()?;

        let path = ctx.layout.toolchain_file();
        fs::write(&path, Self::render(ctx, variables))?;

        let summary = ToolchainSummary {
            package: ctx.metadata.reference(),
            settings: ctx.settings,
            options: ctx.options,
            variables,
        };
        fs::write(
            ctx.layout.toolchain_json(),
            serde_json::to_string_pretty(&summary)?,
        )?;

        debug!(path = %path.display(), variables = variables.len(), "toolchain written");
        Ok(path)
    }
}
