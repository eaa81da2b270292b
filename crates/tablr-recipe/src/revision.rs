//! Published recipe revisions.
//!
//! Each package version carries its own option schema and topic list, so
//! accelerator options added in later versions never change what older
//! versions accept.

use semver::Version;

use crate::error::{RecipeError, Result};
use crate::metadata::PackageMetadata;
use crate::options::{Accelerator, OptionDecl, OptionSet, FPIC, SHARED};
use crate::settings::Os;

/// Metadata and option schema of one package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRevision {
    pub metadata: PackageMetadata,
    pub options: Vec<OptionDecl>,
}

impl RecipeRevision {
    /// tablr 0.0.0: shared/fPIC only.
    pub fn v0_0_0() -> Self {
        Self {
            metadata: PackageMetadata::tablr(
                Version::new(0, 0, 0),
                &["dataframe", "data-manipulation", "c", "cpp"],
            ),
            options: base_options(),
        }
    }

    /// tablr 0.0.1: adds the accelerator toggles and the `cuda`/`gpu` topics.
    pub fn v0_0_1() -> Self {
        let mut options = base_options();
        options.extend(
            Accelerator::ALL
                .iter()
                .map(|a| OptionDecl::boolean(a.option_name(), false)),
        );
        Self {
            metadata: PackageMetadata::tablr(
                Version::new(0, 0, 1),
                &["dataframe", "data-manipulation", "c", "cpp", "cuda", "gpu"],
            ),
            options,
        }
    }

    /// Every published revision, oldest first.
    pub fn all() -> Vec<Self> {
        vec![Self::v0_0_0(), Self::v0_0_1()]
    }

    /// The newest published revision.
    pub fn latest() -> Self {
        Self::v0_0_1()
    }

    /// Look up a revision by exact version string.
    pub fn for_version(version: &str) -> Result<Self> {
        let wanted = Version::parse(version)?;
        Self::all()
            .into_iter()
            .find(|r| r.metadata.version == wanted)
            .ok_or_else(|| RecipeError::UnknownVersion {
                version: version.to_string(),
            })
    }

    pub fn version(&self) -> &Version {
        &self.metadata.version
    }

    pub fn decl(&self, name: &str) -> Option<&OptionDecl> {
        self.options.iter().find(|d| d.name == name)
    }

    /// Option set with every declared default.
    pub fn default_options(&self) -> OptionSet {
        OptionSet::from_decls(&self.options)
    }

    /// Accelerator backends this revision declares options for.
    pub fn accelerators(&self) -> Vec<Accelerator> {
        Accelerator::ALL
            .into_iter()
            .filter(|a| self.decl(a.option_name()).is_some())
            .collect()
    }
}

fn base_options() -> Vec<OptionDecl> {
    vec![
        OptionDecl::boolean(SHARED, false),
        OptionDecl::boolean(FPIC, true).unavailable_on(Os::Windows),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_revision_has_no_accelerators() {
        let r = RecipeRevision::v0_0_0();
        let opts = r.default_options();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts.get(SHARED), Some(false));
        assert_eq!(opts.get(FPIC), Some(true));
        assert!(r.accelerators().is_empty());
        assert_eq!(r.metadata.topics.len(), 4);
    }

    #[test]
    fn accelerator_revision_defaults() {
        let r = RecipeRevision::v0_0_1();
        let opts = r.default_options();
        assert_eq!(opts.len(), 6);
        for acc in Accelerator::ALL {
            assert_eq!(opts.get(acc.option_name()), Some(false));
        }
        assert_eq!(r.accelerators().len(), 4);
    }

    #[test]
    fn topics_grow_between_versions() {
        let old = RecipeRevision::v0_0_0().metadata.topics;
        let new = RecipeRevision::v0_0_1().metadata.topics;
        assert_eq!(&new[..old.len()], &old[..]);
        assert_eq!(&new[old.len()..], &["cuda".to_string(), "gpu".to_string()]);
    }

    #[test]
    fn lookup_by_version() {
        assert_eq!(
            RecipeRevision::for_version("0.0.0").unwrap().version(),
            &Version::new(0, 0, 0)
        );
        assert_eq!(RecipeRevision::latest().version(), &Version::new(0, 0, 1));
        assert!(matches!(
            RecipeRevision::for_version("9.9.9"),
            Err(RecipeError::UnknownVersion { .. })
        ));
        assert!(matches!(
            RecipeRevision::for_version("not-a-version"),
            Err(RecipeError::Semver(_))
        ));
    }

    #[test]
    fn every_default_is_in_its_domain() {
        for r in RecipeRevision::all() {
            for d in &r.options {
                assert!(d.domain.values().contains(&d.default), "{}", d.name);
            }
        }
    }
}
