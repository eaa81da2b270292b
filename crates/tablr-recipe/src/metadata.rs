//! Package identity surfaced to registries.

use std::fmt;

use semver::Version;
use serde::Serialize;

/// Package name, also the name of the exported library.
pub const PACKAGE_NAME: &str = "tablr";

/// Immutable identity of one published package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: Version,
    pub license: String,
    pub author: String,
    pub url: String,
    pub description: String,
    /// Topic tags, in publication order.
    pub topics: Vec<String>,
}

impl PackageMetadata {
    /// Metadata shared by every tablr revision, with the given version and topics.
    pub fn tablr(version: Version, topics: &[&str]) -> Self {
        Self {
            name: PACKAGE_NAME.to_string(),
            version,
            license: "Apache-2.0".to_string(),
            author: "Muhammad Fiaz contact@muhammadfiaz.com".to_string(),
            url: "https://github.com/muhammad-fiaz/tablr".to_string(),
            description: "Fastest and simpler data manipulation library for C/C++".to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// `name/version` reference.
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for PackageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package:     {}", self.reference())?;
        writeln!(f, "License:     {}", self.license)?;
        writeln!(f, "Author:      {}", self.author)?;
        writeln!(f, "URL:         {}", self.url)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Topics:      {}", self.topics.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tablr_identity() {
        let meta = PackageMetadata::tablr(Version::new(0, 0, 1), &["dataframe", "cuda"]);
        assert_eq!(meta.name, "tablr");
        assert_eq!(meta.license, "Apache-2.0");
        assert_eq!(meta.reference(), "tablr/0.0.1");
        assert_eq!(meta.topics, vec!["dataframe", "cuda"]);
    }

    #[test]
    fn display_lists_topics_in_order() {
        let meta = PackageMetadata::tablr(Version::new(0, 0, 0), &["c", "cpp"]);
        let text = meta.to_string();
        assert!(text.contains("tablr/0.0.0"));
        assert!(text.contains("Topics:      c, cpp"));
    }
}
