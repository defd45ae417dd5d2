use thiserror::Error;

/// Unified error type for changelog-pr operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("No boundary tag found: {0}")]
    NoBoundaryFound(String),

    #[error("Boundary tag '{boundary}' is not in the history of '{head}'")]
    BoundaryUnreachable { boundary: String, head: String },

    #[error("Request reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("Malformed request reference: {0}")]
    MalformedReference(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in changelog-pr
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ChangelogError::Version(msg.into())
    }

    /// Create a provider error with context
    pub fn provider(msg: impl Into<String>) -> Self {
        ChangelogError::Provider(msg.into())
    }

    /// Create a render error with context
    pub fn render(msg: impl Into<String>) -> Self {
        ChangelogError::Render(msg.into())
    }

    /// Whether this error aborts a whole run rather than a single request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ChangelogError::NoBoundaryFound(_)
                | ChangelogError::BoundaryUnreachable { .. }
                | ChangelogError::Render(_)
                | ChangelogError::Git(_)
                | ChangelogError::Io(_)
        )
    }
}
