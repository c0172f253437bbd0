//! Pure formatting functions for UI output.
//!
//! Rendering is kept separate from printing so the text can be tested.

use console::style;

use crate::analyzer::NextVersion;
use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", render_error(message));
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", render_warning(warning));
}

pub fn render_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().for_stderr(), message)
}

pub fn render_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow().for_stderr(), warning)
}

/// Explain how a next version was calculated.
///
/// Shows the previous and next tag, the applied level and directives, the
/// scope and the scoped log with the matched commit highlighted.
pub fn render_explanation(next: &NextVersion) -> String {
    let mut out = String::new();

    let previous = next
        .previous
        .as_ref()
        .map(|tag| tag.raw.clone())
        .unwrap_or_else(|| "none".to_string());
    let scope = if next.log_dir.is_empty() {
        "repository root".to_string()
    } else {
        next.log_dir.clone()
    };
    let directives = if next.directives.is_empty() {
        "none".to_string()
    } else {
        next.directives
            .to_vec()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let level = if next.directives.force.is_some() {
        format!("{} (forced, commits asked for {})", next.level, next.matched.level)
    } else {
        next.level.to_string()
    };

    out.push_str(&format!("{}\n", style("Next version").bold()));
    out.push_str(&format!("  previous:   {}\n", previous));
    out.push_str(&format!("  next:       {}\n", style(&next.formatted).green()));
    out.push_str(&format!("  bump:       {}\n", level));
    out.push_str(&format!("  directives: {}\n", directives));
    out.push_str(&format!("  scope:      {}\n", scope));

    if let Some(commit) = next.matched_commit() {
        out.push_str(&format!(
            "  matched:    {} {}\n",
            commit.short_hash(),
            commit.summary()
        ));
    }

    out.push_str(&format!(
        "\n{}\n",
        style(format!("Commits since {} ({})", previous, next.log.len())).underlined()
    ));
    for (i, commit) in next.log.iter().enumerate() {
        let line = format!("{} {}", commit.short_hash(), commit.summary());
        if Some(i) == next.matched.index {
            out.push_str(&format!("  {} {}\n", style(">>").green(), style(line).green().bold()));
        } else {
            out.push_str(&format!("     {}\n", line));
        }
    }

    out
}
