use crate::domain::{CommitRecord, VersionTag};
use crate::error::{ChangelogError, Result};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::{debug, trace};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id())
    }

    fn head_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn list_tags(&self) -> Result<Vec<VersionTag>> {
        let mut tags = Vec::new();

        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;
            let name = match reference.name() {
                Some(name) => name.to_string(),
                None => continue,
            };

            // Annotated tags resolve to the commit they annotate
            match reference.peel_to_commit() {
                Ok(commit) => {
                    debug!("Tag Name: {} -> {}", name, commit.id());
                    tags.push(VersionTag::new(name, commit.id()));
                }
                Err(e) => debug!("Ignoring tag {} without a commit: {}", name, e),
            }
        }

        Ok(tags)
    }

    fn history_from(&self, from: Oid) -> Result<Vec<CommitRecord>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(from)?;

        let mut commits = Vec::new();

        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            trace!("{} {}", oid, message);

            commits.push(CommitRecord::new(oid, message, commit.time().seconds()));
        }

        Ok(commits)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(|url| url.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(ChangelogError::Git(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, message: &str, time: i64) -> Oid {
        let signature =
            git2::Signature::new("Test User", "test@example.com", &git2::Time::new(time, 0))
                .unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parent_refs,
        )
        .unwrap()
    }

    #[test]
    fn test_history_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&raw, "first", 1_000);
        let second = commit(&raw, "second", 2_000);

        let repo = Git2Repository::from_git2(raw);
        let head = repo.head_oid().unwrap();
        assert_eq!(head, second);

        let history = repo.history_from(head).unwrap();
        let hashes: Vec<Oid> = history.iter().map(|c| c.hash).collect();
        assert_eq!(hashes, vec![second, first]);
        assert_eq!(history[0].timestamp, 2_000);
    }

    #[test]
    fn test_annotated_and_lightweight_tags_peel_to_commit() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        let oid = commit(&raw, "first", 1_000);
        {
            let object = raw.find_object(oid, None).unwrap();
            raw.tag_lightweight("v1.0.0", &object, false).unwrap();
            let signature = git2::Signature::now("Test User", "test@example.com").unwrap();
            raw.tag("v1.1.0", &object, &signature, "release", false)
                .unwrap();
        }

        let repo = Git2Repository::from_git2(raw);
        let mut tags = repo.list_tags().unwrap();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "refs/tags/v1.0.0");
        assert_eq!(tags[1].name, "refs/tags/v1.1.0");
        assert!(tags.iter().all(|t| t.commit == oid));
    }

    #[test]
    fn test_missing_remote() {
        let dir = TempDir::new().unwrap();
        let raw = Git2Repo::init(dir.path()).unwrap();
        raw.remote("origin", "git@gitlab.com:team/app.git").unwrap();

        let repo = Git2Repository::from_git2(raw);
        assert_eq!(
            repo.remote_url("origin").unwrap().as_deref(),
            Some("git@gitlab.com:team/app.git")
        );
        assert_eq!(repo.remote_url("upstream").unwrap(), None);
    }
}
