use git2::Oid;

/// A commit as seen while walking history from HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: Oid,
    pub message: String,
    /// Commit time in seconds since the epoch
    pub timestamp: i64,
}

impl CommitRecord {
    /// Create a new commit record
    pub fn new(hash: Oid, message: impl Into<String>, timestamp: i64) -> Self {
        CommitRecord {
            hash,
            message: message.into(),
            timestamp,
        }
    }

    /// First line of the message (the summary)
    pub fn first_line(&self) -> &str {
        self.message.split('\n').next().unwrap_or_default()
    }

    /// Final line of the message, split on line feeds.
    ///
    /// A message ending in a newline has an empty final line.
    pub fn last_line(&self) -> &str {
        self.message.split('\n').next_back().unwrap_or_default()
    }

    /// Abbreviated hash for display
    pub fn short_hash(&self) -> String {
        let hash = self.hash.to_string();
        hash[..7.min(hash.len())].to_string()
    }
}
