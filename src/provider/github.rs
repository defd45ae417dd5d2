use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{base_url, with_segments, DescriptionFetcher, ProviderKind, RemoteProject, RequestDescription};
use crate::error::{ChangelogError, Result};

const PUBLIC_HOST: &str = "github.com";

/// GitHub API response for a single pull request
#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    #[serde(default)]
    body: Option<String>,
    html_url: String,
}

/// Decode a pull request JSON document
pub fn decode_pull_request(json: &str) -> Result<RequestDescription> {
    let response: PullRequestResponse = serde_json::from_str(json).map_err(|e| {
        ChangelogError::provider(format!("could not decode pull request: {}", e))
    })?;
    Ok(RequestDescription {
        body: response.body.unwrap_or_default(),
        web_url: response.html_url,
    })
}

/// Fetches pull request descriptions from GitHub or GitHub Enterprise
#[derive(Debug)]
pub struct GitHubClient {
    client: Client,
    host: String,
    project: RemoteProject,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `project` on `host` (e.g. "github.com")
    pub fn new(host: impl Into<String>, project: RemoteProject, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("changelog-pr/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GitHubClient {
            client,
            host: host.into(),
            project,
            token,
        })
    }

    /// `api.github.com/repos/<owner>/<repo>/pulls/<id>`, or `/api/v3/...` on enterprise hosts
    pub fn pull_request_url(&self, request_id: &str) -> Result<Url> {
        let owner_segments: Vec<&str> = self.project.owner.split('/').collect();
        let mut segments: Vec<&str> = Vec::new();

        let base = if self.host == PUBLIC_HOST {
            base_url("api.github.com")?
        } else {
            segments.extend(["api", "v3"]);
            base_url(&self.host)?
        };

        segments.push("repos");
        segments.extend(owner_segments);
        segments.extend([self.project.repo.as_str(), "pulls", request_id]);

        with_segments(base, &segments)
    }
}

impl DescriptionFetcher for GitHubClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn fetch(&self, request_id: &str) -> Result<RequestDescription> {
        let url = self.pull_request_url(request_id)?;
        debug!("PR URI: {}", url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send()?.error_for_status()?;
        let body = response.text()?;
        trace!("PR Response: {}", body);

        decode_pull_request(&body)
    }
}
