//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::assembler::Assembly;
use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Summary line describing the window an assembly covered
pub fn format_assembly_summary(assembly: &Assembly) -> String {
    let mut summary = format!(
        "{} request(s) since {}, {} changelog entr{}",
        assembly.request_ids.len(),
        assembly.boundary.short_name(),
        assembly.changelog.len(),
        if assembly.changelog.len() == 1 { "y" } else { "ies" }
    );
    if !assembly.skipped.is_empty() {
        summary.push_str(&format!(
            " ({} skipped: #{})",
            assembly.skipped.len(),
            assembly.skipped.join(", #")
        ));
    }
    summary
}

/// Display what an assembly found.
///
/// Lists up to 10 request identifiers, then a count of the remainder.
pub fn display_assembly_summary(assembly: &Assembly) {
    eprintln!("\n{}", style(format_assembly_summary(assembly)).bold());

    for id in assembly.request_ids.iter().take(10) {
        eprintln!("  #{}", id);
    }

    if assembly.request_ids.len() > 10 {
        eprintln!("  ... and {} more requests", assembly.request_ids.len() - 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Changelog, VersionTag};
    use git2::Oid;

    fn assembly(skipped: Vec<String>) -> Assembly {
        Assembly {
            changelog: Changelog::new("1.0.0"),
            boundary: VersionTag::new("refs/tags/v0.9.0", Oid::zero()),
            request_ids: vec!["3".to_string(), "2".to_string()],
            skipped,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_assembly_summary(&assembly(Vec::new())),
            "2 request(s) since v0.9.0, 0 changelog entries"
        );
    }

    #[test]
    fn test_format_summary_with_skipped() {
        let summary = format_assembly_summary(&assembly(vec!["3".to_string()]));
        assert!(summary.ends_with("(1 skipped: #3)"));
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
        display_success("test success");
        display_status("test status");
    }
}
