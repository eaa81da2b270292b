//! CLI command implementations.

pub mod build;
pub mod clean;
pub mod doctor;
pub mod export;
pub mod info;
pub mod init;
pub mod options;
pub mod toolchain;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tablr_recipe::{PlatformSettings, Recipe, RecipeRevision};
use tracing::warn;

use crate::profile::TablrProfile;

/// Recipe selection and overrides shared by most commands.
#[derive(Debug, Clone, Default)]
pub struct RecipeRequest {
    /// Recipe version (`--recipe-version`).
    pub version: Option<String>,
    /// `key=value` setting overrides (`-s`).
    pub settings: Vec<String>,
    /// `name=value` option overrides (`-o`).
    pub options: Vec<String>,
}

/// Output format for report-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(format: Option<&str>) -> Result<Self> {
        match format {
            None | Some("text") => Ok(Format::Text),
            Some("json") => Ok(Format::Json),
            Some(other) => bail!("unknown format: '{other}'. Choose: text, json"),
        }
    }
}

/// Select the recipe revision: command line, then profile, then newest.
pub fn resolve_revision(
    profile: Option<&TablrProfile>,
    request: &RecipeRequest,
) -> Result<RecipeRevision> {
    let version = request
        .version
        .as_deref()
        .or_else(|| profile.and_then(|p| p.recipe_version()));
    match version {
        Some(v) => RecipeRevision::for_version(v).with_context(|| format!("selecting tablr {v}")),
        None => Ok(RecipeRevision::latest()),
    }
}

/// Host settings, overlaid with the profile, overlaid with `-s` flags.
pub fn resolve_settings(
    profile: Option<&TablrProfile>,
    request: &RecipeRequest,
) -> Result<PlatformSettings> {
    let mut settings = PlatformSettings::host();
    if let Some(profile) = profile {
        settings.merge(&profile.settings);
    }
    for pair in &request.settings {
        let (key, value) = split_pair(pair, "-s")?;
        settings.set(key, value)?;
    }
    Ok(settings)
}

/// Build a descriptor with profile and command-line option overrides applied.
pub fn resolve_recipe(profile: Option<&TablrProfile>, request: &RecipeRequest) -> Result<Recipe> {
    let revision = resolve_revision(profile, request)?;
    let settings = resolve_settings(profile, request)?;
    let mut recipe = Recipe::new(revision, settings);

    if let Some(profile) = profile {
        for (name, value) in &profile.options {
            // Profiles may list options an older revision never declared.
            if recipe.revision().decl(name).is_none() {
                warn!(
                    option = %name,
                    version = %recipe.metadata().version,
                    "profile option not declared by this revision, skipping"
                );
                continue;
            }
            recipe
                .set_option(name, &value.to_string())
                .with_context(|| format!("applying profile option '{name}'"))?;
        }
    }
    for pair in &request.options {
        let (name, value) = split_pair(pair, "-o")?;
        recipe.set_option(name, value)?;
    }
    Ok(recipe)
}

/// Source folder: explicit flag, then the profile's directory, then cwd.
pub fn resolve_source_dir(
    source: Option<&str>,
    profile_dir: Option<&Path>,
    cwd: &Path,
) -> PathBuf {
    match source {
        Some(dir) => cwd.join(dir),
        None => profile_dir.unwrap_or(cwd).to_path_buf(),
    }
}

fn split_pair<'a>(pair: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.trim(), value.trim())),
        _ => bail!("expected {flag} key=value, got '{pair}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablr_recipe::options::FPIC;
    use tablr_recipe::Os;

    fn request(settings: &[&str], options: &[&str]) -> RecipeRequest {
        RecipeRequest {
            version: None,
            settings: settings.iter().map(|s| s.to_string()).collect(),
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn command_line_overrides_profile() {
        let profile = TablrProfile::from_str(
            r#"
[settings]
os = "Linux"

[options]
cuda = true
"#,
        )
        .unwrap();
        let mut recipe = resolve_recipe(
            Some(&profile),
            &request(&["os=Windows"], &["cuda=False", "tpu=True"]),
        )
        .unwrap();
        assert_eq!(recipe.settings().os, Some(Os::Windows));
        recipe.config_options().unwrap();
        assert!(!recipe.options().contains(FPIC));
        assert_eq!(recipe.options().get("cuda"), Some(false));
        assert_eq!(recipe.options().get("tpu"), Some(true));
    }

    #[test]
    fn profile_version_selects_revision() {
        let profile = TablrProfile::from_str("[package]\nversion = \"0.0.0\"\n").unwrap();
        let revision = resolve_revision(Some(&profile), &RecipeRequest::default()).unwrap();
        assert_eq!(revision.version().to_string(), "0.0.0");

        let req = RecipeRequest {
            version: Some("0.0.1".into()),
            ..RecipeRequest::default()
        };
        let revision = resolve_revision(Some(&profile), &req).unwrap();
        assert_eq!(revision.version().to_string(), "0.0.1");
    }

    #[test]
    fn accelerator_on_old_revision_fails() {
        let req = RecipeRequest {
            version: Some("0.0.0".into()),
            options: vec!["cuda=True".into()],
            ..RecipeRequest::default()
        };
        assert!(resolve_recipe(None, &req).is_err());
    }

    #[test]
    fn init_template_works_with_old_revision() {
        let profile = TablrProfile::from_str(&TablrProfile::template("0.0.1")).unwrap();
        let req = RecipeRequest {
            version: Some("0.0.0".into()),
            settings: vec!["os=Linux".into()],
            ..RecipeRequest::default()
        };
        let mut recipe = resolve_recipe(Some(&profile), &req).unwrap();
        assert_eq!(recipe.metadata().version.to_string(), "0.0.0");
        assert!(!recipe.options().contains("cuda"));
        assert_eq!(recipe.options().get("shared"), Some(false));
        recipe.config_options().unwrap();
        assert!(recipe.options().contains(FPIC));

        // explicit overrides still reject undeclared options
        let req = RecipeRequest {
            options: vec!["cuda=False".into()],
            ..req
        };
        assert!(resolve_recipe(Some(&profile), &req).is_err());
    }

    #[test]
    fn malformed_pairs_rejected() {
        assert!(resolve_settings(None, &request(&["os"], &[])).is_err());
        assert!(resolve_recipe(None, &request(&[], &["=true"])).is_err());
        assert!(resolve_settings(None, &request(&["color=blue"], &[])).is_err());
    }

    #[test]
    fn source_dir_precedence() {
        let cwd = Path::new("/work");
        assert_eq!(
            resolve_source_dir(Some("lib"), Some(Path::new("/proj")), cwd),
            Path::new("/work/lib")
        );
        assert_eq!(
            resolve_source_dir(None, Some(Path::new("/proj")), cwd),
            Path::new("/proj")
        );
        assert_eq!(resolve_source_dir(None, None, cwd), Path::new("/work"));
    }

    #[test]
    fn format_parse() {
        assert_eq!(Format::parse(None).unwrap(), Format::Text);
        assert_eq!(Format::parse(Some("json")).unwrap(), Format::Json);
        assert!(Format::parse(Some("yaml")).is_err());
    }
}
