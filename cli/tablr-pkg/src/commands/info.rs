//! `tablr-pkg info` — package metadata, declared options and exports.

use anyhow::Result;
use serde::Serialize;
use tablr_recipe::exports::EXPORT_SOURCES;
use tablr_recipe::options::Availability;
use tablr_recipe::{LibraryExports, PackageMetadata, RecipeRevision};

use super::Format;

#[derive(Serialize)]
struct OptionInfo {
    name: &'static str,
    default: bool,
    /// Operating system on which the option is removed, if any.
    unavailable_on: Option<String>,
}

#[derive(Serialize)]
struct InfoView<'a> {
    metadata: &'a PackageMetadata,
    options: Vec<OptionInfo>,
    exports_sources: &'static [&'static str],
    package_info: LibraryExports,
}

/// Print metadata for one revision, or every revision with `all`.
pub fn run(revision: &RecipeRevision, all: bool, format: Format) -> Result<()> {
    let revisions = if all {
        RecipeRevision::all()
    } else {
        vec![revision.clone()]
    };
    for revision in &revisions {
        print!("{}", render(revision, format)?);
    }
    Ok(())
}

fn render(revision: &RecipeRevision, format: Format) -> Result<String> {
    let view = InfoView {
        metadata: &revision.metadata,
        options: revision
            .options
            .iter()
            .map(|d| OptionInfo {
                name: d.name,
                default: d.default,
                unavailable_on: match &d.availability {
                    Availability::Everywhere => None,
                    Availability::NotOn(os) => Some(os.to_string()),
                },
            })
            .collect(),
        exports_sources: &EXPORT_SOURCES,
        package_info: LibraryExports::tablr(),
    };

    match format {
        Format::Json => Ok(serde_json::to_string_pretty(&view)? + "\n"),
        Format::Text => {
            let mut out = view.metadata.to_string();
            out.push_str("Options:\n");
            for opt in &view.options {
                out.push_str(&format!("  {:<8} default={}", opt.name, opt.default));
                if let Some(os) = &opt.unavailable_on {
                    out.push_str(&format!(" (not on {os})"));
                }
                out.push('\n');
            }
            out.push_str(&format!("Exports:     {}\n", view.exports_sources.join(", ")));
            out.push_str(&view.package_info.to_string());
            out.push('\n');
            Ok(out)
        }
    }
}
