use crate::domain::{CommitRecord, VersionTag};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;
use git2::Oid;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
///
/// Commits are kept in insertion order and treated as a linear history, oldest first.
pub struct MockRepository {
    commits: Vec<CommitRecord>,
    tags: Vec<VersionTag>,
    remotes: HashMap<String, String>,
    head: Option<Oid>,
    head_name: String,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            remotes: HashMap::new(),
            head: None,
            head_name: "main".to_string(),
        }
    }

    /// Append a commit on top of the history and move HEAD to it
    pub fn add_commit(&mut self, commit: CommitRecord) {
        self.head = Some(commit.hash);
        self.commits.push(commit);
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push(VersionTag::new(name, oid));
    }

    /// Add a remote
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Set the head commit and branch name
    pub fn set_head(&mut self, branch: impl Into<String>, oid: Oid) {
        self.head_name = branch.into();
        self.head = Some(oid);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.head
            .ok_or_else(|| ChangelogError::config("Mock repository has no commits"))
    }

    fn head_name(&self) -> Result<String> {
        Ok(self.head_name.clone())
    }

    fn list_tags(&self) -> Result<Vec<VersionTag>> {
        Ok(self.tags.clone())
    }

    fn history_from(&self, from: Oid) -> Result<Vec<CommitRecord>> {
        let start = self
            .commits
            .iter()
            .position(|c| c.hash == from)
            .ok_or_else(|| ChangelogError::config(format!("Unknown commit: {}", from)))?;

        let mut history: Vec<CommitRecord> = self.commits[..=start].to_vec();
        history.reverse();
        Ok(history)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }
}
