//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository reads the
//! changelog needs, allowing for both real Git repositories and mock implementations
//! for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use changelog_pr::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let head = repo.head_oid()?;
//! for commit in repo.history_from(head)? {
//!     println!("{} {}", commit.short_hash(), commit.first_line());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitRecord, VersionTag};
use crate::error::Result;
use git2::Oid;

/// Read access to tags and commit history
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying errors
/// (like `git2::Error`) to the appropriate [crate::error::ChangelogError] variants.
pub trait Repository {
    /// Commit the current branch head points at
    fn head_oid(&self) -> Result<Oid>;

    /// Short name of the current head (branch name, or `HEAD` when detached)
    fn head_name(&self) -> Result<String>;

    /// All tags in the repository
    ///
    /// Names are full reference names (e.g. `refs/tags/v1.0.0`) and each tag carries the
    /// commit it points at. No particular order is guaranteed.
    fn list_tags(&self) -> Result<Vec<VersionTag>>;

    /// Commit history reachable from `from`, most recent commit time first
    ///
    /// The starting commit is the first element.
    fn history_from(&self, from: Oid) -> Result<Vec<CommitRecord>>;

    /// URL of a configured remote, `None` if the remote does not exist
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
}
