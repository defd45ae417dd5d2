use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{base_url, with_segments, DescriptionFetcher, ProviderKind, RemoteProject, RequestDescription};
use crate::error::{ChangelogError, Result};

/// GitLab API response for a single merge request
#[derive(Debug, Deserialize)]
struct MergeRequestResponse {
    #[serde(default)]
    description: Option<String>,
    web_url: String,
}

/// Decode a merge request JSON document
pub fn decode_merge_request(json: &str) -> Result<RequestDescription> {
    let response: MergeRequestResponse = serde_json::from_str(json).map_err(|e| {
        ChangelogError::provider(format!("could not decode merge request: {}", e))
    })?;
    Ok(RequestDescription {
        body: response.description.unwrap_or_default(),
        web_url: response.web_url,
    })
}

/// Fetches merge request descriptions from a GitLab instance
#[derive(Debug)]
pub struct GitLabClient {
    client: Client,
    host: String,
    project: RemoteProject,
    token: Option<String>,
}

impl GitLabClient {
    /// Create a client for `project` on `host` (e.g. "gitlab.com")
    pub fn new(host: impl Into<String>, project: RemoteProject, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("changelog-pr/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GitLabClient {
            client,
            host: host.into(),
            project,
            token,
        })
    }

    /// `/api/v4/projects/<owner%2Frepo>/merge_requests/<id>`
    pub fn merge_request_url(&self, request_id: &str) -> Result<Url> {
        let project = self.project.path();
        with_segments(
            base_url(&self.host)?,
            &["api", "v4", "projects", project.as_str(), "merge_requests", request_id],
        )
    }
}

impl DescriptionFetcher for GitLabClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitLab
    }

    fn fetch(&self, request_id: &str) -> Result<RequestDescription> {
        let url = self.merge_request_url(request_id)?;
        debug!("MR URI: {}", url);

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header("PRIVATE-TOKEN", token);
        }

        let response = request.send()?.error_for_status()?;
        let body = response.text()?;
        trace!("MR Response: {}", body);

        decode_merge_request(&body)
    }
}
