//! Markdown section classification for request descriptions.
//!
//! A description is scanned line by line. Text under a `### <name>` subsection of the
//! `## Changelog Inclusions` heading becomes one [`ChangelogEntry`] in the matching
//! [`Category`]. Anything else in the description is ignored.

use crate::domain::{Category, Changelog, ChangelogEntry};
use tracing::{debug, info, trace};

/// Top-level heading whose subsections feed the changelog
pub const INCLUSIONS_HEADING: &str = "## Changelog Inclusions";

const DEPTH_2_MARKER: &str = "## ";
const DEPTH_3_MARKER: &str = "### ";
const UNSET_HEADING: &str = "none";

/// Map a fully qualified section key to its category
pub fn category_for(section_name: &str) -> Option<Category> {
    let subsection = section_name
        .strip_prefix(INCLUSIONS_HEADING)?
        .strip_prefix('.')?;
    Category::ALL
        .into_iter()
        .find(|category| category.heading() == subsection)
}

/// Transient state while scanning one description
#[derive(Debug)]
struct ParserState {
    current_depth: u8,
    depth2_name: String,
    depth3_name: String,
    section_name: String,
    section_text: String,
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState {
            current_depth: 0,
            depth2_name: UNSET_HEADING.to_string(),
            depth3_name: UNSET_HEADING.to_string(),
            section_name: String::new(),
            section_text: String::new(),
        }
    }
}

impl ParserState {
    fn has_pending_text(&self) -> bool {
        !self.section_name.is_empty() && !self.section_text.is_empty()
    }

    fn enter_heading(&mut self, heading: &str) {
        if heading.starts_with(DEPTH_2_MARKER) {
            self.current_depth = 2;
            self.depth2_name = heading.to_string();
            self.section_name = heading.to_string();
        } else if heading.starts_with(DEPTH_3_MARKER) {
            self.current_depth = 3;
            self.depth3_name = heading.to_string();
            self.section_name = format!("{}.{}", self.depth2_name, self.depth3_name);
        } else {
            // Other heading levels close the pending text but keep the current section
            return;
        }
        debug!(depth = self.current_depth, section = %self.section_name, "entered section");
    }
}

/// Classifies request descriptions into a [`Changelog`]
#[derive(Debug, Clone)]
pub struct SectionParser<'a> {
    request_id: &'a str,
    request_label: &'a str,
    request_url: &'a str,
}

impl<'a> SectionParser<'a> {
    /// Create a parser for one request
    ///
    /// # Arguments
    /// * `request_id` - Request identifier used in the entry link
    /// * `request_label` - Human label, "Merge Request" or "Pull Request"
    /// * `request_url` - Web link to the request
    pub fn new(request_id: &'a str, request_label: &'a str, request_url: &'a str) -> Self {
        SectionParser {
            request_id,
            request_label,
            request_url,
        }
    }

    /// Parse a description body, appending every recognised section to `changelog`.
    ///
    /// Malformed or unrelated markdown simply produces no entries.
    pub fn parse(&self, body: &str, changelog: &mut Changelog) {
        let mut state = ParserState::default();

        info!("Searching request #{} for changelog inclusions", self.request_id);
        trace!(body, "request description");

        for line in split_lines(body) {
            trace!(line, "description line");
            let trimmed = line.trim();

            if trimmed.starts_with('#') {
                if state.has_pending_text() {
                    self.flush(&mut state, changelog);
                }
                state.enter_heading(trimmed);
            } else if !state.section_name.is_empty() {
                let content = line.trim_matches(|c| c == '\n' || c == '\r');
                if !trimmed.trim_matches(|c| c == '\n' || c == '\r').is_empty() {
                    state.section_text.push_str(content);
                    state.section_text.push('\n');
                }
            }
        }

        if state.has_pending_text() {
            debug!(section = %state.section_name, "collecting trailing section");
            self.flush(&mut state, changelog);
        }
    }

    fn flush(&self, state: &mut ParserState, changelog: &mut Changelog) {
        let text = std::mem::take(&mut state.section_text);
        if let Some(category) = category_for(&state.section_name) {
            debug!(%category, request = self.request_id, "adding changelog entry");
            changelog.push(
                category,
                ChangelogEntry::new(text, self.request_label, self.request_id, self.request_url),
            );
        }
    }
}

/// Split on carriage returns when any are present, otherwise on line feeds
fn split_lines(body: &str) -> std::str::Split<'_, char> {
    if body.contains('\r') {
        body.split('\r')
    } else {
        body.split('\n')
    }
}

/// Parse a description into `changelog` for the given request
pub fn parse_description(
    body: &str,
    request_id: &str,
    request_label: &str,
    request_url: &str,
    changelog: &mut Changelog,
) {
    SectionParser::new(request_id, request_label, request_url).parse(body, changelog);
}

/// Description template that contributors paste into their requests
pub fn description_template() -> String {
    let mut template = String::from("## Description\n\n<!-- What does this change do? -->\n\n");
    template.push_str(INCLUSIONS_HEADING);
    template.push_str("\n\n<!-- Keep only the subsections that apply. -->\n");
    for category in Category::ALL {
        template.push('\n');
        template.push_str(category.heading());
        template.push('\n');
    }
    template
}
