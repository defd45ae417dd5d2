//! Orchestration of boundary resolution, range walking, fetching and parsing.

use tracing::{error, info};

use crate::boundary::{BoundaryResolver, BoundaryWarning};
use crate::domain::{Changelog, VersionTag};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;
use crate::parser::SectionParser;
use crate::provider::DescriptionFetcher;
use crate::range::RangeWalker;

/// Everything learned while assembling a changelog
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub changelog: Changelog,
    pub boundary: VersionTag,
    /// Requests found in range, most recent first
    pub request_ids: Vec<String>,
    /// Requests whose description could not be fetched
    pub skipped: Vec<String>,
    /// Non-fatal conditions to show the user
    pub warnings: Vec<BoundaryWarning>,
}

/// Builds a [`Changelog`] from a repository and a description provider
pub struct ChangelogAssembler<'a, R: Repository, F: DescriptionFetcher> {
    repo: &'a R,
    fetcher: &'a F,
    resolver: BoundaryResolver,
}

impl<'a, R: Repository, F: DescriptionFetcher> ChangelogAssembler<'a, R, F> {
    /// Create an assembler using the `/tags/v<semver>` tag convention
    pub fn new(repo: &'a R, fetcher: &'a F) -> Result<Self> {
        Ok(Self::with_resolver(repo, fetcher, BoundaryResolver::standard()?))
    }

    pub fn with_resolver(repo: &'a R, fetcher: &'a F, resolver: BoundaryResolver) -> Self {
        ChangelogAssembler {
            repo,
            fetcher,
            resolver,
        }
    }

    /// Assemble the changelog for `release_label`.
    ///
    /// # Arguments
    /// * `boundary_name` - Explicit boundary tag name (suffix match), or `None` for the latest version tag
    /// * `release_label` - Version label of the release being described
    ///
    /// # Returns
    /// * `Err(NoBoundaryFound)` - No tag qualifies as the boundary
    /// * `Err(BoundaryUnreachable)` - The boundary is not in the history of HEAD
    pub fn assemble(&self, boundary_name: Option<&str>, release_label: &str) -> Result<Changelog> {
        self.run(boundary_name, release_label)
            .map(|assembly| assembly.changelog)
    }

    /// Like [`ChangelogAssembler::assemble`], also reporting the boundary and requests seen
    pub fn run(&self, boundary_name: Option<&str>, release_label: &str) -> Result<Assembly> {
        let tags = self.repo.list_tags()?;
        let boundary = self.resolver.resolve(&tags, boundary_name)?;

        let head = self.repo.head_oid()?;
        let head_name = self.repo.head_name()?;
        info!("HEAD: {}", head_name);

        let walker = RangeWalker::new(self.fetcher.kind().merge_convention()?);
        let walk = walker.walk(self.repo, head, boundary.commit)?;
        if !walk.reached_boundary {
            error!(
                "The TAG you specified was NOT in the currently selected BRANCH: {}",
                head_name
            );
            return Err(ChangelogError::BoundaryUnreachable {
                boundary: boundary.name.clone(),
                head: head_name,
            });
        }

        let mut warnings = Vec::new();
        if walk.request_ids.is_empty() {
            warnings.push(BoundaryWarning::NoNewRequests {
                boundary: boundary.short_name().to_string(),
                head: head_name,
            });
        }

        let mut changelog = Changelog::new(release_label);
        let mut skipped = Vec::new();
        let label = self.fetcher.kind().request_label();

        for request_id in &walk.request_ids {
            match self.fetcher.fetch(request_id) {
                Ok(description) => {
                    SectionParser::new(request_id, label, &description.web_url)
                        .parse(&description.body, &mut changelog);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Error getting request #{}: {}", request_id, e);
                    skipped.push(request_id.clone());
                }
            }
        }

        Ok(Assembly {
            changelog,
            boundary,
            request_ids: walk.request_ids,
            skipped,
            warnings,
        })
    }
}
