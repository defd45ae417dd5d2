//! Collection of request identifiers between HEAD and the boundary commit.

use git2::Oid;
use tracing::{info, trace, warn};

use crate::boundary::BoundaryWarning;
use crate::domain::CommitRecord;
use crate::git::Repository;
use crate::reference::MergeConvention;
use crate::error::Result;

/// Outcome of walking history from HEAD to the boundary
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeWalk {
    /// Request identifiers, most recent merge first
    pub request_ids: Vec<String>,
    /// Whether the boundary commit is an ancestor of (or equal to) HEAD
    pub reached_boundary: bool,
}

/// Walks history newest-first and collects merge request references
#[derive(Debug, Clone)]
pub struct RangeWalker {
    convention: MergeConvention,
}

impl RangeWalker {
    pub fn new(convention: MergeConvention) -> Self {
        RangeWalker { convention }
    }

    /// Walk the history of `head` down to `boundary` (exclusive).
    ///
    /// When `boundary` is not in the history no identifiers are returned and
    /// `reached_boundary` is false.
    pub fn walk<R: Repository>(&self, repo: &R, head: Oid, boundary: Oid) -> Result<RangeWalk> {
        let history = repo.history_from(head)?;
        Ok(self.walk_history(&history, boundary))
    }

    /// Same as [`RangeWalker::walk`] over an already collected history
    pub fn walk_history(&self, history: &[CommitRecord], boundary: Oid) -> RangeWalk {
        let Some(end) = history.iter().position(|c| c.hash == boundary) else {
            return RangeWalk::default();
        };

        let mut request_ids = Vec::new();

        for commit in &history[..end] {
            trace!("{}", commit.message);
            if !self.convention.is_merge_commit(commit) {
                continue;
            }

            match self.convention.request_id(commit) {
                Ok(id) => {
                    info!("{} references request #{}", commit.hash, id);
                    request_ids.push(id.to_string());
                }
                Err(e) => warn!(
                    "{}",
                    BoundaryWarning::UnreadableMergeCommit {
                        commit: commit.hash.to_string(),
                        reason: e.to_string(),
                    }
                ),
            }
        }

        RangeWalk {
            request_ids,
            reached_boundary: true,
        }
    }
}
