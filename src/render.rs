//! Markdown rendering of a finished [`Changelog`].

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::{Category, Changelog};
use crate::error::{ChangelogError, Result};

/// Order in which categories appear in the rendered changelog
pub const RENDER_ORDER: [Category; 6] = [
    Category::Breaking,
    Category::Additions,
    Category::Changes,
    Category::Bugfixes,
    Category::Deprecations,
    Category::Removals,
];

const EMPTY_NOTICE: &str = "No changelog inclusions found.";

/// Render the changelog as markdown.
///
/// Each entry is its description followed by the request link on its own line.
/// Categories without entries are left out.
pub fn render_markdown(changelog: &Changelog) -> Result<String> {
    let mut out = String::new();
    write_markdown(&mut out, changelog)
        .map_err(|e| ChangelogError::render(format!("could not format changelog: {}", e)))?;
    Ok(out)
}

fn write_markdown(out: &mut String, changelog: &Changelog) -> std::fmt::Result {
    writeln!(out, "## {}", changelog.version)?;

    if changelog.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", EMPTY_NOTICE)?;
        return Ok(());
    }

    for category in RENDER_ORDER {
        let entries = changelog.entries(category);
        if entries.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, "### {}", category.title())?;

        for entry in entries {
            writeln!(out)?;
            out.push_str(&entry.description);
            if !entry.description.is_empty() && !entry.description.ends_with('\n') {
                writeln!(out)?;
            }
            writeln!(out, "{}", entry.link)?;
        }
    }

    Ok(())
}

/// Render the changelog and write it to `path`, replacing any existing file
pub fn write_changelog(changelog: &Changelog, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let markdown = render_markdown(changelog)?;
    fs::write(path, markdown).map_err(|e| {
        ChangelogError::render(format!("could not write '{}': {}", path.display(), e))
    })?;
    info!("Changelog written to {}", path.display());
    Ok(())
}
