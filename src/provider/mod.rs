//! Request description providers
//!
//! A provider fetches the description of one merge/pull request by identifier.
//! Implementations:
//!
//! - [gitlab::GitLabClient]: GitLab merge requests over the REST API
//! - [github::GitHubClient]: GitHub pull requests over the REST API
//! - [mock::MockProvider]: In-memory descriptions for testing

pub mod github;
pub mod gitlab;
pub mod mock;
pub mod remote;

pub use github::GitHubClient;
pub use gitlab::GitLabClient;
pub use mock::MockProvider;
pub use remote::{parse_remote_url, RemoteProject};

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};
use crate::reference::MergeConvention;

/// Supported git hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "github")]
    GitHub,
    #[default]
    #[serde(rename = "gitlab")]
    GitLab,
}

impl ProviderKind {
    /// Human label used in changelog links
    pub fn request_label(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "Pull Request",
            ProviderKind::GitLab => "Merge Request",
        }
    }

    /// How this provider's merge commits reference their request
    pub fn merge_convention(&self) -> Result<MergeConvention> {
        match self {
            ProviderKind::GitHub => MergeConvention::pull_request(),
            ProviderKind::GitLab => MergeConvention::merge_request(),
        }
    }

    /// Environment variable holding the access token
    pub fn token_env_var(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "GITHUB_TOKEN",
            ProviderKind::GitLab => "GITLAB_TOKEN",
        }
    }

    /// Host used when none is configured
    pub fn default_host(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github.com",
            ProviderKind::GitLab => "gitlab.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::GitHub => f.write_str("github"),
            ProviderKind::GitLab => f.write_str("gitlab"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "gitlab" => Ok(ProviderKind::GitLab),
            other => Err(ChangelogError::config(format!(
                "unsupported provider '{}' (expected github or gitlab)",
                other
            ))),
        }
    }
}

/// Raw description of a request plus its canonical web link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestDescription {
    pub body: String,
    pub web_url: String,
}

/// Fetches request descriptions by identifier
pub trait DescriptionFetcher {
    /// Provider this fetcher talks to
    fn kind(&self) -> ProviderKind;

    /// Fetch the description of request `request_id`
    fn fetch(&self, request_id: &str) -> Result<RequestDescription>;
}

/// A provider client selected at runtime
#[derive(Debug)]
pub enum HostedProvider {
    GitHub(GitHubClient),
    GitLab(GitLabClient),
}

impl HostedProvider {
    /// Create the client for `kind`
    pub fn connect(
        kind: ProviderKind,
        host: &str,
        project: RemoteProject,
        token: Option<String>,
    ) -> Result<Self> {
        Ok(match kind {
            ProviderKind::GitHub => HostedProvider::GitHub(GitHubClient::new(host, project, token)?),
            ProviderKind::GitLab => HostedProvider::GitLab(GitLabClient::new(host, project, token)?),
        })
    }
}

impl DescriptionFetcher for HostedProvider {
    fn kind(&self) -> ProviderKind {
        match self {
            HostedProvider::GitHub(client) => client.kind(),
            HostedProvider::GitLab(client) => client.kind(),
        }
    }

    fn fetch(&self, request_id: &str) -> Result<RequestDescription> {
        match self {
            HostedProvider::GitHub(client) => client.fetch(request_id),
            HostedProvider::GitLab(client) => client.fetch(request_id),
        }
    }
}

/// Build the base URL for a host given either as `host[:port]` or a full URL
pub(crate) fn base_url(host: &str) -> Result<Url> {
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    Url::parse(&raw).map_err(|e| ChangelogError::provider(format!("invalid host '{}': {}", host, e)))
}

/// Append path segments to `url`, percent-encoding each one
pub(crate) fn with_segments(mut url: Url, segments: &[&str]) -> Result<Url> {
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ChangelogError::provider("cannot build a request path on a cannot-be-a-base URL"))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("GitHub".parse::<ProviderKind>().unwrap(), ProviderKind::GitHub);
        assert_eq!(" gitlab ".parse::<ProviderKind>().unwrap(), ProviderKind::GitLab);
        assert!("bitbucket".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_labels() {
        assert_eq!(ProviderKind::GitHub.request_label(), "Pull Request");
        assert_eq!(ProviderKind::GitLab.request_label(), "Merge Request");
        assert_eq!(ProviderKind::default(), ProviderKind::GitLab);
    }

    #[test]
    fn test_connect_selects_client() {
        let project = RemoteProject {
            owner: "team".to_string(),
            repo: "app".to_string(),
        };
        let provider = HostedProvider::connect(ProviderKind::GitHub, "github.com", project, None).unwrap();
        assert_eq!(provider.kind(), ProviderKind::GitHub);
    }

    #[test]
    fn test_base_url_variants() {
        assert_eq!(base_url("gitlab.com").unwrap().as_str(), "https://gitlab.com/");
        assert_eq!(
            base_url("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_with_segments_escapes_slashes() {
        let url = with_segments(base_url("gitlab.com").unwrap(), &["projects", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://gitlab.com/projects/a%2Fb");
    }
}
