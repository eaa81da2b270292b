//! tablr-pkg — build and package the Tablr native library.

mod commands;
mod profile;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Format, RecipeRequest};
use profile::{TablrProfile, PROFILE_FILE};

#[derive(Parser)]
#[command(name = "tablr-pkg", version, about = "Build and package the Tablr library")]
struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    /// Profile file (default: search upward for tablr.toml)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Recipe selection shared by the commands that run descriptor phases.
#[derive(Args, Debug, Clone, Default)]
struct RecipeArgs {
    /// Recipe version (e.g., 0.0.0, 0.0.1; default: newest)
    #[arg(long)]
    recipe_version: Option<String>,
    /// Setting override, key=value (os, compiler, build_type, arch)
    #[arg(short = 's', long = "setting")]
    settings: Vec<String>,
    /// Option override, name=value (shared, fPIC, cuda, xpu, npu, tpu)
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,
    /// Source folder containing CMakeLists.txt (default: profile directory)
    #[arg(long)]
    source: Option<String>,
}

impl RecipeArgs {
    fn request(&self) -> RecipeRequest {
        RecipeRequest {
            version: self.recipe_version.clone(),
            settings: self.settings.clone(),
            options: self.options.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a tablr.toml profile into the current directory
    Init,
    /// Show the option set after platform pruning
    Options {
        #[command(flatten)]
        recipe: RecipeArgs,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Generate the CMake toolchain without building
    Toolchain {
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Generate, build and install the library
    Build {
        #[command(flatten)]
        recipe: RecipeArgs,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Show package metadata, options and exports
    Info {
        /// Recipe version (default: newest)
        #[arg(long)]
        recipe_version: Option<String>,
        /// Show every published revision
        #[arg(long)]
        all: bool,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Check exported sources and write their manifest
    Export {
        /// Source folder (default: profile directory)
        #[arg(long)]
        source: Option<String>,
    },
    /// Remove build output
    Clean {
        /// Source folder (default: profile directory)
        #[arg(long)]
        source: Option<String>,
        /// Also remove the package folder
        #[arg(long)]
        package: bool,
    },
    /// Check build tools and accelerator toolchains
    Doctor,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (profile, profile_dir) = load_profile(&cwd, cli.profile.as_deref())?;
    let profile = profile.as_ref();
    let profile_dir = profile_dir.as_deref();

    match cli.command {
        Commands::Init => commands::init::run(&cwd),

        Commands::Options { recipe, format } => {
            let format = Format::parse(format.as_deref())?;
            let recipe = commands::resolve_recipe(profile, &recipe.request())?;
            commands::options::run(recipe, format)
        }

        Commands::Toolchain { recipe: args } => {
            let source_dir = commands::resolve_source_dir(args.source.as_deref(), profile_dir, &cwd);
            let recipe = commands::resolve_recipe(profile, &args.request())?;
            let build = profile.map(|p| p.build_config()).unwrap_or_default();
            commands::toolchain::run(
                recipe,
                &source_dir,
                build.package_dir.as_deref().map(Path::new),
            )
        }

        Commands::Build {
            recipe: args,
            format,
        } => {
            let format = Format::parse(format.as_deref())?;
            let source_dir = commands::resolve_source_dir(args.source.as_deref(), profile_dir, &cwd);
            let recipe = commands::resolve_recipe(profile, &args.request())?;
            let build = profile.map(|p| p.build_config()).unwrap_or_default();
            commands::build::run(recipe, &source_dir, &build, format)
        }

        Commands::Info {
            recipe_version,
            all,
            format,
        } => {
            let format = Format::parse(format.as_deref())?;
            let request = RecipeRequest {
                version: recipe_version,
                ..RecipeRequest::default()
            };
            let revision = commands::resolve_revision(profile, &request)?;
            commands::info::run(&revision, all, format)
        }

        Commands::Export { source } => {
            let source_dir = commands::resolve_source_dir(source.as_deref(), profile_dir, &cwd);
            commands::export::run(&source_dir)
        }

        Commands::Clean { source, package } => {
            let source_dir = commands::resolve_source_dir(source.as_deref(), profile_dir, &cwd);
            let build = profile.map(|p| p.build_config()).unwrap_or_default();
            let package_dir = match build.package_dir.as_deref() {
                Some(dir) => source_dir.join(dir),
                None => source_dir.join("package"),
            };
            commands::clean::run(&source_dir, &package_dir, package)
        }

        Commands::Doctor => {
            let build = profile.map(|p| p.build_config()).unwrap_or_default();
            let cmake = build.cmake.unwrap_or_else(|| "cmake".to_string());
            commands::doctor::run(&cwd, &cmake)
        }
    }
}

/// Load the profile from `--profile`, or search upward from `cwd`.
/// Returns (None, None) if no profile exists.
fn load_profile(
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<(Option<TablrProfile>, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        let profile = TablrProfile::load(&path)?;
        let dir = path.parent().map(Path::to_path_buf);
        debug!(profile = %path.display(), "loaded profile");
        return Ok((Some(profile), dir));
    }
    match TablrProfile::find_and_load(cwd)? {
        Some((profile, dir)) => {
            debug!(dir = %dir.display(), "found {}", PROFILE_FILE);
            Ok((Some(profile), Some(dir)))
        }
        None => {
            debug!("no {} found, using host settings", PROFILE_FILE);
            Ok((None, None))
        }
    }
}
