use std::fmt;

/// Non-fatal outcomes reported alongside (or instead of) a next version.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Nothing in the scoped history asks for a release
    NoApplicableBump {
        latest_tag: Option<String>,
        commits: usize,
    },
    /// A directive line was recognised but could not be understood
    MalformedDirective { commit: String, line: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoApplicableBump {
                latest_tag,
                commits,
            } => {
                let since = latest_tag.as_deref().unwrap_or("the first commit");
                write!(
                    f,
                    "No release: {} commit(s) since {} carry no version bump",
                    commits, since
                )
            }
            BoundaryWarning::MalformedDirective { commit, line } => {
                let short_hash = commit.get(..7).unwrap_or(commit);
                write!(f, "Ignoring malformed directive '{}' in {}", line, short_hash)
            }
        }
    }
}
