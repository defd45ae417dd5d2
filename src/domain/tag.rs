use crate::error::{ChangelogError, Result};
use git2::Oid;
use regex::Regex;

/// Naming convention that marks a tag as a release candidate.
///
/// The first capture group of the pattern holds the semantic version text.
pub const DEFAULT_TAG_PATTERN: &str = r"/tags/v(.+)";

/// A tag reference discovered while enumerating the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    /// Full reference name, e.g. `refs/tags/v1.2.3`
    pub name: String,
    /// Parsed version, `None` when the name does not follow the convention or fails to parse
    pub version: Option<semver::Version>,
    /// Commit the tag points at
    pub commit: Oid,
}

impl VersionTag {
    /// Create a tag without version information
    pub fn new(name: impl Into<String>, commit: Oid) -> Self {
        VersionTag {
            name: name.into(),
            version: None,
            commit,
        }
    }

    /// Short name without the `refs/tags/` prefix
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("refs/tags/").unwrap_or(&self.name)
    }
}

/// Tag naming convention (e.g., `/tags/v<semver>`)
#[derive(Debug, Clone)]
pub struct TagConvention {
    regex: Regex,
}

impl TagConvention {
    /// Create a convention from a pattern with one capture group for the version
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ChangelogError::config(format!("Invalid tag pattern '{}': {}", pattern, e)))?;
        if regex.captures_len() < 2 {
            return Err(ChangelogError::config(format!(
                "Tag pattern '{}' must capture the version",
                pattern
            )));
        }
        Ok(TagConvention { regex })
    }

    /// The `/tags/v<semver>` convention
    pub fn standard() -> Result<Self> {
        Self::new(DEFAULT_TAG_PATTERN)
    }

    /// Extract the version text from a tag name, if the name follows the convention
    pub fn version_text<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.regex
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|text| !text.is_empty())
    }

    /// Parse the version of a tag name.
    ///
    /// # Returns
    /// * `None` - The name does not follow the convention
    /// * `Some(Err)` - The name follows the convention but the version is not valid semver
    /// * `Some(Ok)` - Parsed version
    pub fn parse(&self, name: &str) -> Option<Result<semver::Version>> {
        let text = self.version_text(name)?;
        Some(semver::Version::parse(text).map_err(|e| {
            ChangelogError::version(format!("Invalid version '{}' in tag '{}': {}", text, name, e))
        }))
    }
}
