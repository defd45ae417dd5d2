use std::collections::HashMap;

use super::{DescriptionFetcher, ProviderKind, RequestDescription};
use crate::error::{ChangelogError, Result};

/// In-memory provider for testing without network access
pub struct MockProvider {
    kind: ProviderKind,
    descriptions: HashMap<String, RequestDescription>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Self {
        MockProvider {
            kind,
            descriptions: HashMap::new(),
        }
    }

    /// Register the description returned for `request_id`
    pub fn add_description(
        &mut self,
        request_id: impl Into<String>,
        body: impl Into<String>,
        web_url: impl Into<String>,
    ) {
        self.descriptions.insert(
            request_id.into(),
            RequestDescription {
                body: body.into(),
                web_url: web_url.into(),
            },
        );
    }
}

impl DescriptionFetcher for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn fetch(&self, request_id: &str) -> Result<RequestDescription> {
        self.descriptions
            .get(request_id)
            .cloned()
            .ok_or_else(|| ChangelogError::provider(format!("request #{} not found", request_id)))
    }
}
