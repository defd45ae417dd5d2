//! Selection of the release tag that closes the changelog window.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, info, warn};

use crate::domain::{TagConvention, VersionTag};
use crate::error::{ChangelogError, Result};

/// Warnings raised while locating the changelog window.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No merge/pull requests were merged since the boundary tag
    NoNewRequests { boundary: String, head: String },
    /// Tag follows the naming convention but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Several tags end with the requested name
    AmbiguousTag { suffix: String, chosen: String, count: usize },
    /// A merge commit whose request number could not be read
    UnreadableMergeCommit { commit: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewRequests { boundary, head } => {
                write!(
                    f,
                    "No merged requests since tag '{}' on '{}'",
                    boundary, head
                )
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::AmbiguousTag {
                suffix,
                chosen,
                count,
            } => {
                write!(
                    f,
                    "{} tags end with '{}', using '{}'",
                    count, suffix, chosen
                )
            }
            BoundaryWarning::UnreadableMergeCommit { commit, reason } => {
                let short_hash = if commit.len() > 7 {
                    &commit[..7]
                } else {
                    commit.as_str()
                };
                write!(f, "Skipping merge commit {}: {}", short_hash, reason)
            }
        }
    }
}

/// Semantic version precedence, ignoring build metadata
fn compare_precedence(a: &semver::Version, b: &semver::Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Picks the "last released" tag from a repository's tag set
#[derive(Debug, Clone)]
pub struct BoundaryResolver {
    convention: TagConvention,
}

impl BoundaryResolver {
    /// Create a resolver for tags following `convention`
    pub fn new(convention: TagConvention) -> Self {
        BoundaryResolver { convention }
    }

    /// Create a resolver for the `/tags/v<semver>` convention
    pub fn standard() -> Result<Self> {
        Ok(Self::new(TagConvention::standard()?))
    }

    /// Resolve the boundary tag.
    ///
    /// With a non-empty `explicit_name`, the tag whose name ends with it is selected and no
    /// version parsing happens. Otherwise the convention-matching tag with the highest
    /// semantic version is selected.
    ///
    /// # Returns
    /// * `Ok(VersionTag)` - The boundary tag
    /// * `Err(NoBoundaryFound)` - If no tag qualifies
    pub fn resolve(&self, tags: &[VersionTag], explicit_name: Option<&str>) -> Result<VersionTag> {
        let boundary = match explicit_name.filter(|name| !name.is_empty()) {
            Some(suffix) => self.resolve_explicit(tags, suffix)?,
            None => self.resolve_latest(tags)?,
        };
        info!(
            "Last Tag/Hash: {} ({})",
            boundary.name, boundary.commit
        );
        Ok(boundary)
    }

    /// Select the tag whose name ends with `suffix`.
    ///
    /// An exact match on the full or short tag name wins over other suffix matches; the
    /// remaining ties go to the lexicographically smallest name.
    pub fn resolve_explicit(&self, tags: &[VersionTag], suffix: &str) -> Result<VersionTag> {
        let mut candidates: Vec<&VersionTag> = tags
            .iter()
            .inspect(|tag| debug!("Tag Name: {}", tag.name))
            .filter(|tag| tag.name.ends_with(suffix))
            .collect();

        candidates.sort_by(|a, b| {
            let a_exact = a.name == suffix || a.short_name() == suffix;
            let b_exact = b.name == suffix || b.short_name() == suffix;
            b_exact.cmp(&a_exact).then_with(|| a.name.cmp(&b.name))
        });

        let chosen = candidates.first().copied().ok_or_else(|| {
            ChangelogError::NoBoundaryFound(format!("no tag ends with '{}'", suffix))
        })?;

        if candidates.len() > 1 {
            warn!(
                "{}",
                BoundaryWarning::AmbiguousTag {
                    suffix: suffix.to_string(),
                    chosen: chosen.name.clone(),
                    count: candidates.len(),
                }
            );
        }

        Ok(chosen.clone())
    }

    /// Select the convention-matching tag with the highest semantic version.
    ///
    /// Tags with an unparsable version are skipped with a warning. Equal versions go to
    /// the lexicographically smallest name so the result never depends on enumeration order.
    pub fn resolve_latest(&self, tags: &[VersionTag]) -> Result<VersionTag> {
        let mut best: Option<(semver::Version, &VersionTag)> = None;

        for tag in tags {
            debug!("Tag Name: {}", tag.name);
            let version = match self.convention.parse(&tag.name) {
                None => continue,
                Some(Err(e)) => {
                    warn!(
                        "{}",
                        BoundaryWarning::UnparsableTag {
                            tag: tag.name.clone(),
                            reason: e.to_string(),
                        }
                    );
                    continue;
                }
                Some(Ok(version)) => version,
            };

            let replace = match &best {
                None => true,
                Some((best_version, best_tag)) => {
                    match compare_precedence(&version, best_version) {
                        Ordering::Greater => true,
                        Ordering::Equal => tag.name < best_tag.name,
                        Ordering::Less => false,
                    }
                }
            };

            if replace {
                best = Some((version, tag));
            }
        }

        best.map(|(version, tag)| VersionTag {
            version: Some(version),
            ..tag.clone()
        })
        .ok_or_else(|| {
            ChangelogError::NoBoundaryFound("no tag follows the release naming convention".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Oid;

    fn tag(name: &str, byte: u8) -> VersionTag {
        VersionTag::new(name, Oid::from_bytes(&[byte; 20]).unwrap())
    }

    fn resolver() -> BoundaryResolver {
        BoundaryResolver::standard().unwrap()
    }

    #[test]
    fn test_latest_selects_highest_version_in_any_order() {
        let tags = vec![
            tag("refs/tags/v1.0.0", 1),
            tag("refs/tags/v1.2.0", 2),
            tag("refs/tags/v1.1.5", 3),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let shuffled: Vec<VersionTag> = order.iter().map(|i| tags[*i].clone()).collect();
            let boundary = resolver().resolve(&shuffled, None).unwrap();
            assert_eq!(boundary.name, "refs/tags/v1.2.0");
            assert_eq!(boundary.version, Some(semver::Version::new(1, 2, 0)));
        }
    }

    #[test]
    fn test_latest_prefers_release_over_prerelease() {
        let tags = vec![tag("refs/tags/v2.0.0-rc.1", 1), tag("refs/tags/v2.0.0", 2)];
        let boundary = resolver().resolve(&tags, None).unwrap();
        assert_eq!(boundary.name, "refs/tags/v2.0.0");
    }

    #[test]
    fn test_latest_skips_unparsable_and_unconventional() {
        let tags = vec![
            tag("refs/tags/v9.9", 1),
            tag("refs/tags/release-10.0.0", 2),
            tag("refs/tags/v0.3.0", 3),
        ];
        let boundary = resolver().resolve(&tags, None).unwrap();
        assert_eq!(boundary.name, "refs/tags/v0.3.0");
    }

    #[test]
    fn test_latest_tie_prefers_smallest_name() {
        let tags = vec![tag("refs/tags/v1.0.0+b", 1), tag("refs/tags/v1.0.0+a", 2)];
        let boundary = resolver().resolve(&tags, None).unwrap();
        assert_eq!(boundary.name, "refs/tags/v1.0.0+a");

        let reversed: Vec<VersionTag> = tags.into_iter().rev().collect();
        let boundary = resolver().resolve(&reversed, None).unwrap();
        assert_eq!(boundary.name, "refs/tags/v1.0.0+a");
    }

    #[test]
    fn test_latest_without_candidates() {
        let tags = vec![tag("refs/tags/nightly", 1)];
        let err = resolver().resolve(&tags, None).unwrap_err();
        assert!(matches!(err, ChangelogError::NoBoundaryFound(_)));
        assert!(resolver().resolve(&[], None).is_err());
    }

    #[test]
    fn test_explicit_suffix_ignores_versions() {
        let tags = vec![tag("refs/tags/v3.0.0", 1), tag("refs/tags/legacy-cut", 2)];
        let boundary = resolver().resolve(&tags, Some("legacy-cut")).unwrap();
        assert_eq!(boundary.name, "refs/tags/legacy-cut");
        assert_eq!(boundary.version, None);
    }

    #[test]
    fn test_explicit_prefers_exact_name() {
        let tags = vec![tag("refs/tags/app-v1.0.0", 1), tag("refs/tags/v1.0.0", 2)];
        let boundary = resolver().resolve(&tags, Some("v1.0.0")).unwrap();
        assert_eq!(boundary.name, "refs/tags/v1.0.0");
    }

    #[test]
    fn test_explicit_ambiguous_is_deterministic() {
        let tags = vec![tag("refs/tags/b-v1.0.0", 1), tag("refs/tags/a-v1.0.0", 2)];
        let boundary = resolver().resolve(&tags, Some("-v1.0.0")).unwrap();
        assert_eq!(boundary.name, "refs/tags/a-v1.0.0");
    }

    #[test]
    fn test_explicit_not_found() {
        let tags = vec![tag("refs/tags/v1.0.0", 1)];
        let err = resolver().resolve(&tags, Some("v2.0.0")).unwrap_err();
        assert!(matches!(err, ChangelogError::NoBoundaryFound(_)));
    }

    #[test]
    fn test_empty_explicit_name_uses_latest() {
        let tags = vec![tag("refs/tags/v1.0.0", 1), tag("refs/tags/v1.0.1", 2)];
        let boundary = resolver().resolve(&tags, Some("")).unwrap();
        assert_eq!(boundary.name, "refs/tags/v1.0.1");
    }

    #[test]
    fn test_warning_display() {
        let warning = BoundaryWarning::UnreadableMergeCommit {
            commit: "abc1234def5678".to_string(),
            reason: "no id".to_string(),
        };
        assert_eq!(warning.to_string(), "Skipping merge commit abc1234: no id");

        let warning = BoundaryWarning::NoNewRequests {
            boundary: "v1.0.0".to_string(),
            head: "main".to_string(),
        };
        assert!(warning.to_string().contains("v1.0.0"));
    }
}
