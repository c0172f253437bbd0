use crate::domain::directive::{extract_directives, Directive};
use crate::domain::version::BumpLevel;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*)(?:\(([^()\r\n]+)\))?(!)?:\s*(.*)$")
        .expect("header pattern is valid")
});

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Conventional commit type, as far as versioning is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    /// Any other type (docs, ci, chore, ...), kept verbatim
    Other(String),
}

impl CommitType {
    fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "feat" => CommitType::Feat,
            "fix" => CommitType::Fix,
            _ => CommitType::Other(token.to_string()),
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitType::Feat => write!(f, "feat"),
            CommitType::Fix => write!(f, "fix"),
            CommitType::Other(t) => write!(f, "{}", t),
        }
    }
}

/// Classification of a commit header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// `type(scope)!: subject`
    Conventional {
        kind: CommitType,
        scope: Option<String>,
        breaking: bool,
        subject: String,
    },
    /// Anything that does not follow the convention
    Unrecognized,
}

impl Header {
    /// The bump this header asks for on its own
    pub fn bump(&self) -> BumpLevel {
        match self {
            Header::Conventional { breaking: true, .. } => BumpLevel::Major,
            Header::Conventional {
                kind: CommitType::Feat,
                ..
            } => BumpLevel::Minor,
            Header::Conventional {
                kind: CommitType::Fix,
                ..
            } => BumpLevel::Patch,
            _ => BumpLevel::None,
        }
    }
}

/// Parse the first line of a commit message.
///
/// Supports formats:
/// - type(scope)!: subject
/// - type(scope): subject
/// - type!: subject
/// - type: subject
///
/// A `BREAKING CHANGE:` footer in the body also marks a conventional commit as
/// breaking. Everything else is [`Header::Unrecognized`].
pub fn parse_header(message: &str) -> Header {
    let first_line = message.lines().next().unwrap_or("").trim_end();

    let Some(captures) = HEADER_RE.captures(first_line) else {
        return Header::Unrecognized;
    };

    let kind = captures
        .get(1)
        .map(|m| CommitType::from_token(m.as_str()))
        .unwrap_or_else(|| CommitType::Other(String::new()));
    let scope = captures.get(2).map(|m| m.as_str().to_string());
    let subject = captures
        .get(4)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let breaking = captures.get(3).is_some()
        || message.lines().skip(1).any(|line| {
            BREAKING_FOOTERS
                .iter()
                .any(|footer| line.trim_start().starts_with(footer))
        });

    Header::Conventional {
        kind,
        scope,
        breaking,
        subject,
    }
}

/// A commit from the scoped history, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub header: Header,
    pub directives: Vec<Directive>,
    /// Directive lines that were ignored
    pub malformed: Vec<String>,
}

impl Commit {
    /// Classify a commit. Header and directives are two independent passes.
    pub fn parse(hash: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let header = parse_header(&message);
        let scan = extract_directives(&message);

        Commit {
            hash: hash.into(),
            message,
            header,
            directives: scan.directives,
            malformed: scan.malformed,
        }
    }

    pub fn bump(&self) -> BumpLevel {
        self.header.bump()
    }

    /// First line of the message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}
