//! Extraction of merge/pull request identifiers from commit messages.

use crate::domain::CommitRecord;
use crate::error::{ChangelogError, Result};
use regex::Regex;

/// GitLab merge commits end with `See merge request group/project!<id>`
pub const MERGE_REQUEST_PATTERN: &str = r"!(\d+)$";
/// GitHub merge commits start with `Merge pull request #<id> from owner/branch`
pub const PULL_REQUEST_PATTERN: &str = r"#(\d+) from";

/// Which line of a merge commit message carries the request reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceLine {
    First,
    Last,
}

/// How a provider's generated merge commits reference their request
#[derive(Debug, Clone)]
pub struct MergeConvention {
    /// Literal substring identifying a generated merge commit
    pub marker: &'static str,
    pub line: ReferenceLine,
    extractor: ReferenceExtractor,
}

impl MergeConvention {
    /// GitLab merge request convention
    pub fn merge_request() -> Result<Self> {
        Ok(MergeConvention {
            marker: "See merge request",
            line: ReferenceLine::Last,
            extractor: ReferenceExtractor::new(MERGE_REQUEST_PATTERN)?,
        })
    }

    /// GitHub pull request convention
    pub fn pull_request() -> Result<Self> {
        Ok(MergeConvention {
            marker: "Merge pull request",
            line: ReferenceLine::First,
            extractor: ReferenceExtractor::new(PULL_REQUEST_PATTERN)?,
        })
    }

    /// Whether the commit is a generated merge commit
    pub fn is_merge_commit(&self, commit: &CommitRecord) -> bool {
        commit.message.contains(self.marker)
    }

    /// Extract the request identifier from a merge commit
    pub fn request_id(&self, commit: &CommitRecord) -> Result<u64> {
        let line = match self.line {
            ReferenceLine::First => commit.first_line(),
            ReferenceLine::Last => commit.last_line(),
        };
        self.extractor.extract(line)
    }
}

/// Pulls an integer request identifier out of a single line
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    regex: Regex,
}

impl ReferenceExtractor {
    /// Create an extractor from a pattern whose first capture group holds the digits
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            ChangelogError::config(format!("Invalid reference pattern '{}': {}", pattern, e))
        })?;
        Ok(ReferenceExtractor { regex })
    }

    /// Extract the identifier from `line`. Only the first match is used.
    ///
    /// # Returns
    /// * `Ok(id)` - Parsed identifier
    /// * `Err(ReferenceNotFound)` - The pattern does not match
    /// * `Err(MalformedReference)` - The match is not an unsigned integer
    pub fn extract(&self, line: &str) -> Result<u64> {
        let digits = self
            .regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| {
                ChangelogError::ReferenceNotFound(format!(
                    "could not find request number in '{}'",
                    line
                ))
            })?;

        digits.parse::<u64>().map_err(|e| {
            ChangelogError::MalformedReference(format!(
                "failed to parse request number '{}': {}",
                digits, e
            ))
        })
    }
}

/// Extract a GitLab merge request identifier (`!<digits>` at end of line)
pub fn extract_request_id(line: &str) -> Result<u64> {
    ReferenceExtractor::new(MERGE_REQUEST_PATTERN)?.extract(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Oid;

    fn commit(message: &str) -> CommitRecord {
        CommitRecord::new(Oid::from_bytes(&[3; 20]).unwrap(), message, 0)
    }

    #[test]
    fn test_extract_bang_reference() {
        assert_eq!(extract_request_id("Merge pull request !482").unwrap(), 482);
        assert_eq!(
            extract_request_id("See merge request group/project!17").unwrap(),
            17
        );
    }

    #[test]
    fn test_extract_not_found() {
        let err = extract_request_id("no id here").unwrap_err();
        assert!(matches!(err, ChangelogError::ReferenceNotFound(_)));
    }

    #[test]
    fn test_reference_must_end_line() {
        let err = extract_request_id("See merge request a/b!12 (reverted)").unwrap_err();
        assert!(matches!(err, ChangelogError::ReferenceNotFound(_)));
    }

    #[test]
    fn test_extract_overflow_is_malformed() {
        let err = extract_request_id("See merge request a/b!99999999999999999999999").unwrap_err();
        assert!(matches!(err, ChangelogError::MalformedReference(_)));
    }

    #[test]
    fn test_pull_request_pattern_uses_first_match() {
        let extractor = ReferenceExtractor::new(PULL_REQUEST_PATTERN).unwrap();
        assert_eq!(
            extractor
                .extract("Merge pull request #12 from a/b and #13 from c/d")
                .unwrap(),
            12
        );
    }

    #[test]
    fn test_merge_request_convention() {
        let convention = MergeConvention::merge_request().unwrap();
        let merge = commit("Merge branch 'x' into 'main'\n\nAdd x\n\nSee merge request team/app!31");
        assert!(convention.is_merge_commit(&merge));
        assert_eq!(convention.request_id(&merge).unwrap(), 31);
        assert!(!convention.is_merge_commit(&commit("fix: typo")));
    }

    #[test]
    fn test_pull_request_convention() {
        let convention = MergeConvention::pull_request().unwrap();
        let merge = commit("Merge pull request #9 from owner/feature\n\nAdd feature");
        assert!(convention.is_merge_commit(&merge));
        assert_eq!(convention.request_id(&merge).unwrap(), 9);
    }
}
