//! Domain logic - pure data and rules independent of git and provider I/O

pub mod changelog;
pub mod commit;
pub mod tag;

pub use changelog::{Category, Changelog, ChangelogEntry};
pub use commit::CommitRecord;
pub use tag::{TagConvention, VersionTag};
