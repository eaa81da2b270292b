//! The package descriptor and its phase sequence.
//!
//! Phases run strictly in order:
//! `config_options -> layout -> generate -> build -> package`.
//! Each phase can run once, and only after its predecessor succeeded. A
//! failing phase leaves the descriptor where it was, so the caller cannot
//! continue past it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::configure::configure_options;
use crate::driver::{BuildContext, Builder};
use crate::error::{RecipeError, Result};
use crate::layout::Layout;
use crate::metadata::PackageMetadata;
use crate::options::OptionSet;
use crate::package_info::LibraryExports;
use crate::revision::RecipeRevision;
use crate::settings::PlatformSettings;
use crate::toolchain::{generate_toolchain, ToolchainContext, ToolchainEmitter, ToolchainVariables};

/// Descriptor phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Defaults loaded, user overrides still accepted.
    Declared,
    ConfigOptions,
    Layout,
    Generate,
    Build,
    Package,
}

impl Phase {
    /// The phase that must have completed before this one may start.
    pub fn predecessor(&self) -> Phase {
        match self {
            Phase::Declared | Phase::ConfigOptions => Phase::Declared,
            Phase::Layout => Phase::ConfigOptions,
            Phase::Generate => Phase::Layout,
            Phase::Build => Phase::Generate,
            Phase::Package => Phase::Build,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Declared => "declared",
            Phase::ConfigOptions => "config_options",
            Phase::Layout => "layout",
            Phase::Generate => "generate",
            Phase::Build => "build",
            Phase::Package => "package",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub package: String,
    pub options: OptionSet,
    pub variables: ToolchainVariables,
    pub toolchain_file: PathBuf,
    pub package_dir: PathBuf,
    pub exports: LibraryExports,
}

/// The tablr package descriptor for one invocation.
#[derive(Debug, Clone)]
pub struct Recipe {
    revision: RecipeRevision,
    settings: PlatformSettings,
    options: OptionSet,
    phase: Phase,
    layout: Option<Layout>,
    variables: ToolchainVariables,
    toolchain_file: Option<PathBuf>,
}

impl Recipe {
    /// A descriptor with the revision's default options.
    pub fn new(revision: RecipeRevision, settings: PlatformSettings) -> Self {
        let options = revision.default_options();
        Self {
            revision,
            settings,
            options,
            phase: Phase::Declared,
            layout: None,
            variables: ToolchainVariables::new(),
            toolchain_file: None,
        }
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.revision.metadata
    }

    pub fn revision(&self) -> &RecipeRevision {
        &self.revision
    }

    pub fn settings(&self) -> &PlatformSettings {
        &self.settings
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Override an option before `config_options` runs.
    ///
    /// Options the revision does not declare are rejected. Options that are
    /// declared but unavailable on the target platform are ignored.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        if self.phase != Phase::Declared {
            return Err(RecipeError::OptionsFrozen { name: name.into() });
        }
        let decl = self
            .revision
            .decl(name)
            .ok_or_else(|| RecipeError::UnknownOption { name: name.into() })?;
        if !decl.availability.supported_on(&self.settings) {
            let parsed = decl.domain.parse(name, value)?;
            warn!(
                option = name,
                value = parsed,
                "option is not available on the target platform, ignoring"
            );
            return Ok(());
        }
        self.options.set_str(name, value)
    }

    fn enter(&self, requested: Phase) -> Result<()> {
        let expected = requested.predecessor();
        if self.phase != expected || requested == Phase::Declared {
            return Err(RecipeError::PhaseOrder {
                requested,
                expected,
            });
        }
        Ok(())
    }

    /// Prune options unavailable on the target platform and freeze the set.
    pub fn config_options(&mut self) -> Result<&OptionSet> {
        self.enter(Phase::ConfigOptions)?;
        let options = std::mem::take(&mut self.options);
        self.options = configure_options(&self.revision.options, &self.settings, options);
        self.phase = Phase::ConfigOptions;
        info!(options = self.options.len(), "options configured");
        Ok(&self.options)
    }

    /// Lay out the build folders under `source_dir`.
    pub fn layout(&mut self, source_dir: &Path, package_dir: Option<&Path>) -> Result<&Layout> {
        self.enter(Phase::Layout)?;
        let mut layout = Layout::cmake(source_dir, self.settings.build_type_or_default());
        if let Some(dir) = package_dir {
            layout = layout.with_package_dir(dir);
        }
        info!(build_dir = %layout.build_dir.display(), "layout");
        self.phase = Phase::Layout;
        Ok(&*self.layout.insert(layout))
    }

    /// Derive toolchain variables and hand them to `emitter`.
    pub fn generate(&mut self, emitter: &dyn ToolchainEmitter) -> Result<&ToolchainVariables> {
        self.enter(Phase::Generate)?;
        let layout = self.require_layout(Phase::Generate)?;
        let variables = generate_toolchain(&self.options);
        let ctx = ToolchainContext {
            metadata: &self.revision.metadata,
            settings: &self.settings,
            options: &self.options,
            layout,
        };
        let path = emitter.emit(&ctx, &variables)?;
        info!(toolchain = %path.display(), variables = variables.len(), "toolchain generated");
        self.toolchain_file = Some(path);
        self.variables = variables;
        self.phase = Phase::Generate;
        Ok(&self.variables)
    }

    /// Configure and compile through `builder`.
    pub fn build(&mut self, builder: &mut dyn Builder) -> Result<()> {
        self.enter(Phase::Build)?;
        let ctx = self.build_context(Phase::Build)?;
        builder.configure(&ctx)?;
        builder.build(&ctx)?;
        info!("build finished");
        self.phase = Phase::Build;
        Ok(())
    }

    /// Install the built artifacts into the package folder through `builder`.
    pub fn package(&mut self, builder: &mut dyn Builder) -> Result<()> {
        self.enter(Phase::Package)?;
        let ctx = self.build_context(Phase::Package)?;
        builder.install(&ctx)?;
        info!(package_dir = %ctx.layout.package_dir.display(), "package installed");
        self.phase = Phase::Package;
        Ok(())
    }

    /// Libraries consumers link against. Independent of options and phase.
    pub fn package_info(&self) -> LibraryExports {
        LibraryExports::tablr()
    }

    /// Run every phase in order and summarise the result.
    pub fn run(
        &mut self,
        source_dir: &Path,
        package_dir: Option<&Path>,
        emitter: &dyn ToolchainEmitter,
        builder: &mut dyn Builder,
    ) -> Result<BuildReport> {
        self.config_options()?;
        self.layout(source_dir, package_dir)?;
        self.generate(emitter)?;
        self.build(builder)?;
        self.package(builder)?;
        self.report()
    }

    /// Summary of the current state; requires `generate` to have run.
    pub fn report(&self) -> Result<BuildReport> {
        let layout = self.require_layout(Phase::Build)?;
        let toolchain_file = self.require_toolchain(Phase::Build)?;
        Ok(BuildReport {
            package: self.revision.metadata.reference(),
            options: self.options.clone(),
            variables: self.variables.clone(),
            toolchain_file: toolchain_file.to_path_buf(),
            package_dir: layout.package_dir.clone(),
            exports: self.package_info(),
        })
    }

    fn require_layout(&self, requested: Phase) -> Result<&Layout> {
        self.layout.as_ref().ok_or(RecipeError::PhaseOrder {
            requested,
            expected: Phase::Layout,
        })
    }

    fn require_toolchain(&self, requested: Phase) -> Result<&Path> {
        self.toolchain_file
            .as_deref()
            .ok_or(RecipeError::PhaseOrder {
                requested,
                expected: Phase::Generate,
            })
    }

    fn build_context(&self, requested: Phase) -> Result<BuildContext<'_>> {
        Ok(BuildContext {
            layout: self.require_layout(requested)?,
            toolchain_file: self.require_toolchain(requested)?,
            build_type: self.settings.build_type_or_default(),
        })
    }
}
