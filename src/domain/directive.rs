//! Commit body directives
//!
//! Directives are explicit instructions written on their own line in a
//! commit body, overriding what the commit headers would infer:
//!
//! ```text
//! feat: everything is now stable
//!
//! nsv:force~major
//! nsv:pre~alpha
//! ```
//!
//! Several commands can share one marker: `nsv:pre~rc,force~minor`.

use crate::domain::prerelease::is_valid_label;
use crate::domain::version::BumpLevel;
use std::fmt;

const MARKER: &str = "nsv:";

/// A single instruction found in a commit body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Replace the inferred bump with this level
    ForceBump(BumpLevel),
    /// Release as a prerelease; an empty label continues the current one
    Prerelease(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::ForceBump(level) => write!(f, "{}force~{}", MARKER, level),
            Directive::Prerelease(label) if label.is_empty() => write!(f, "{}pre", MARKER),
            Directive::Prerelease(label) => write!(f, "{}pre~{}", MARKER, label),
        }
    }
}

/// Directives accumulated across a range of commits, one per kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub force: Option<BumpLevel>,
    pub prerelease: Option<String>,
}

impl Directives {
    /// Record a directive unless one of the same kind was already seen.
    ///
    /// Commits are fed newest first, so the most recent directive wins.
    pub fn absorb(&mut self, directive: &Directive) {
        match directive {
            Directive::ForceBump(level) => {
                self.force.get_or_insert(*level);
            }
            Directive::Prerelease(label) => {
                self.prerelease.get_or_insert_with(|| label.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_none() && self.prerelease.is_none()
    }

    /// Directives in display form, force first
    pub fn to_vec(&self) -> Vec<Directive> {
        let mut out = Vec::new();
        if let Some(level) = self.force {
            out.push(Directive::ForceBump(level));
        }
        if let Some(label) = &self.prerelease {
            out.push(Directive::Prerelease(label.clone()));
        }
        out
    }
}

/// Result of scanning one commit message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveScan {
    /// Recognised directives in the order they appear
    pub directives: Vec<Directive>,
    /// Marker lines carrying at least one unrecognised command
    pub malformed: Vec<String>,
}

/// Scans every line after the header for `nsv:` markers.
///
/// Unknown commands, levels and labels never fail the scan; the offending
/// line is reported in [`DirectiveScan::malformed`] and otherwise ignored.
pub fn extract_directives(message: &str) -> DirectiveScan {
    let mut scan = DirectiveScan::default();

    for line in message.lines().skip(1) {
        let line = line.trim();
        let Some(commands) = line.strip_prefix(MARKER) else {
            continue;
        };

        let mut line_ok = true;
        for command in commands.split(',') {
            match parse_command(command.trim()) {
                Some(directive) => scan.directives.push(directive),
                None => line_ok = false,
            }
        }

        if !line_ok {
            scan.malformed.push(line.to_string());
        }
    }

    scan
}

fn parse_command(command: &str) -> Option<Directive> {
    let (name, argument) = match command.split_once('~') {
        Some((name, argument)) => (name, Some(argument)),
        None => (command, None),
    };

    match (name, argument) {
        ("force", Some(level)) => BumpLevel::parse(level).map(Directive::ForceBump),
        ("pre", None) => Some(Directive::Prerelease(String::new())),
        ("pre", Some(label)) if is_valid_label(label) => {
            Some(Directive::Prerelease(label.to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_force() {
        let scan = extract_directives("feat: stable api\n\nnsv:force~major");
        assert_eq!(scan.directives, vec![Directive::ForceBump(BumpLevel::Major)]);
        assert!(scan.malformed.is_empty());
    }

    #[test]
    fn test_extract_prerelease() {
        let scan = extract_directives("feat: x\nnsv:pre");
        assert_eq!(scan.directives, vec![Directive::Prerelease(String::new())]);

        let scan = extract_directives("feat: x\nnsv:pre~alpha");
        assert_eq!(scan.directives, vec![Directive::Prerelease("alpha".into())]);
    }

    #[test]
    fn test_header_is_not_scanned() {
        let scan = extract_directives("nsv:force~major");
        assert!(scan.directives.is_empty());
    }

    #[test]
    fn test_combined_commands() {
        let scan = extract_directives("fix: y\n\n  nsv:pre~rc, force~minor  ");
        assert_eq!(
            scan.directives,
            vec![
                Directive::Prerelease("rc".into()),
                Directive::ForceBump(BumpLevel::Minor)
            ]
        );
    }

    #[test]
    fn test_malformed_lines_are_ignored() {
        let scan = extract_directives(
            "fix: y\nnsv:force~huge\nnsv:pre~not.valid\nnsv:shout\nnsv:force",
        );
        assert!(scan.directives.is_empty());
        assert_eq!(scan.malformed.len(), 4);
        assert_eq!(scan.malformed[0], "nsv:force~huge");
    }

    #[test]
    fn test_partially_malformed_line_keeps_valid_commands() {
        let scan = extract_directives("fix: y\nnsv:pre,force~never");
        assert_eq!(scan.directives, vec![Directive::Prerelease(String::new())]);
        assert_eq!(scan.malformed, vec!["nsv:pre,force~never".to_string()]);
    }

    #[test]
    fn test_absorb_keeps_first_per_kind() {
        let mut directives = Directives::default();
        directives.absorb(&Directive::ForceBump(BumpLevel::Patch));
        directives.absorb(&Directive::Prerelease("rc".into()));
        directives.absorb(&Directive::ForceBump(BumpLevel::Major));
        directives.absorb(&Directive::Prerelease("alpha".into()));

        assert_eq!(directives.force, Some(BumpLevel::Patch));
        assert_eq!(directives.prerelease.as_deref(), Some("rc"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Directive::ForceBump(BumpLevel::Major).to_string(),
            "nsv:force~major"
        );
        assert_eq!(Directive::Prerelease(String::new()).to_string(), "nsv:pre");
        assert_eq!(Directive::Prerelease("rc".into()).to_string(), "nsv:pre~rc");
    }
}
