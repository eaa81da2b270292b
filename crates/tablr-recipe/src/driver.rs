//! External build driver.
//!
//! The descriptor never compiles anything itself; it hands the toolchain
//! file to a [`Builder`] and sequences configure, build and install.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{RecipeError, Result};
use crate::layout::Layout;
use crate::settings::BuildType;

/// Inputs every driver step receives.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub layout: &'a Layout,
    pub toolchain_file: &'a Path,
    pub build_type: BuildType,
}

/// Configure, compile and install collaborator.
pub trait Builder {
    fn configure(&mut self, ctx: &BuildContext<'_>) -> Result<()>;
    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<()>;
    fn install(&mut self, ctx: &BuildContext<'_>) -> Result<()>;
}

/// Drives the `cmake` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeDriver {
    /// Program to invoke, `cmake` unless configured otherwise.
    pub program: String,
    /// Value for `-G`, if any.
    pub generator: Option<String>,
    /// Value for `--parallel`, if any.
    pub jobs: Option<u32>,
}

impl Default for CMakeDriver {
    fn default() -> Self {
        Self {
            program: "cmake".to_string(),
            generator: None,
            jobs: None,
        }
    }
}

impl CMakeDriver {
    pub fn configure_args(&self, ctx: &BuildContext<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-S".into(),
            ctx.layout.source_dir.clone().into(),
            "-B".into(),
            ctx.layout.build_dir.clone().into(),
        ];
        if let Some(generator) = &self.generator {
            args.push("-G".into());
            args.push(generator.into());
        }
        args.push(define("CMAKE_TOOLCHAIN_FILE", ctx.toolchain_file));
        args.push(define("CMAKE_INSTALL_PREFIX", &ctx.layout.package_dir));
        args
    }

    pub fn build_args(&self, ctx: &BuildContext<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--build".into(),
            ctx.layout.build_dir.clone().into(),
            "--config".into(),
            ctx.build_type.as_str().into(),
        ];
        if let Some(jobs) = self.jobs {
            args.push("--parallel".into());
            args.push(jobs.to_string().into());
        }
        args
    }

    pub fn install_args(&self, ctx: &BuildContext<'_>) -> Vec<OsString> {
        vec![
            "--install".into(),
            ctx.layout.build_dir.clone().into(),
            "--config".into(),
            ctx.build_type.as_str().into(),
        ]
    }

    fn run(&self, step: &str, args: Vec<OsString>) -> Result<()> {
        debug!(step, program = %self.program, ?args, "running build driver");
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| RecipeError::BuildFailed {
                step: step.into(),
                detail: format!("could not run '{}': {e}", self.program),
            })?;
        if !status.success() {
            return Err(RecipeError::BuildFailed {
                step: step.into(),
                detail: format!("'{}' exited with {status}", self.program),
            });
        }
        Ok(())
    }
}

fn define(name: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(format!("-D{name}="));
    arg.push(path);
    arg
}

impl Builder for CMakeDriver {
    fn configure(&mut self, ctx: &BuildContext<'_>) -> Result<()> {
        self.run("configure", self.configure_args(ctx))
    }

    fn build(&mut self, ctx: &BuildContext<'_>) -> Result<()> {
        self.run("build", self.build_args(ctx))
    }

    fn install(&mut self, ctx: &BuildContext<'_>) -> Result<()> {
        self.run("install", self.install_args(ctx))
    }
}
