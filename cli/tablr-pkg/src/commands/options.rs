//! `tablr-pkg options` — show the option set after platform pruning.

use anyhow::Result;
use serde::Serialize;
use tablr_recipe::{OptionSet, Recipe};

use super::Format;

#[derive(Serialize)]
struct OptionsView<'a> {
    package: String,
    os: Option<&'a str>,
    options: &'a OptionSet,
}

/// Run `config_options` and print the resulting option set.
pub fn run(mut recipe: Recipe, format: Format) -> Result<()> {
    recipe.config_options()?;
    print!("{}", render(&recipe, format)?);
    Ok(())
}

fn render(recipe: &Recipe, format: Format) -> Result<String> {
    let os = recipe.settings().os.as_ref().map(|o| o.as_str());
    match format {
        Format::Json => {
            let view = OptionsView {
                package: recipe.metadata().reference(),
                os,
                options: recipe.options(),
            };
            Ok(serde_json::to_string_pretty(&view)? + "\n")
        }
        Format::Text => {
            let mut out = format!(
                "Options for {} (os: {})\n",
                recipe.metadata().reference(),
                os.unwrap_or("unset")
            );
            for (name, value) in recipe.options().iter() {
                out.push_str(&format!("  {name:<8} {value}\n"));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablr_recipe::{Os, PlatformSettings, RecipeRevision};

    fn configured(os: Os) -> Recipe {
        let mut recipe = Recipe::new(RecipeRevision::latest(), PlatformSettings::for_os(os));
        recipe.config_options().unwrap();
        recipe
    }

    #[test]
    fn text_lists_fpic_on_linux() {
        let text = render(&configured(Os::Linux), Format::Text).unwrap();
        assert!(text.contains("os: Linux"));
        assert!(text.contains("fPIC"));
        assert!(text.contains("cuda"));
    }

    #[test]
    fn json_omits_fpic_on_windows() {
        let json = render(&configured(Os::Windows), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["os"], "Windows");
        assert!(value["options"].get("fPIC").is_none());
        assert_eq!(value["options"]["shared"], false);
    }

    #[test]
    fn run_succeeds() {
        let recipe = Recipe::new(RecipeRevision::latest(), PlatformSettings::host());
        run(recipe, Format::Text).unwrap();
    }
}
