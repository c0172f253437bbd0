//! Pre-release progression for semantic versions
//!
//! A pre-release such as `beta.3` is split into a label (`beta`) and an
//! optional trailing iteration number (`3`). Progressing a pre-release either
//! advances the iteration or restarts the sequence under a new label.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{NsvError, Result};
use std::fmt;

/// Returns true when `label` can be used as a single pre-release identifier.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Pre-release version with optional iteration number
///
/// # Examples
/// - "alpha" -> PreRelease { label: "alpha", iteration: None }
/// - "beta.1" -> PreRelease { label: "beta", iteration: Some(1) }
/// - "rc.x.3" -> PreRelease { label: "rc.x", iteration: Some(3) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    /// Everything before the trailing numeric identifier
    pub label: String,
    /// Trailing numeric identifier, when present
    pub iteration: Option<u64>,
}

impl PreRelease {
    /// Create a new pre-release version
    pub fn new(label: impl Into<String>, iteration: Option<u64>) -> Self {
        PreRelease {
            label: label.into(),
            iteration,
        }
    }

    /// Start of a fresh sequence: `{label}.1`
    pub fn first(label: impl Into<String>) -> Self {
        PreRelease::new(label, Some(1))
    }

    /// Parse a pre-release from its dotted form (e.g. "beta.1")
    ///
    /// # Returns
    /// * `Ok(PreRelease)` - Parsed pre-release version
    /// * `Err` - If the string is empty
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(NsvError::tag("empty pre-release identifier"));
        }

        match s.rsplit_once('.') {
            Some((label, last)) if is_numeric(last) => Ok(PreRelease {
                label: label.to_string(),
                iteration: last.parse::<u64>().ok(),
            }),
            None if is_numeric(s) => Ok(PreRelease {
                label: String::new(),
                iteration: s.parse::<u64>().ok(),
            }),
            _ => Ok(PreRelease::new(s, None)),
        }
    }

    /// Increment the iteration number
    ///
    /// If iteration is None, returns Some(1). Otherwise increments by 1.
    pub fn increment_iteration(&self) -> Result<Self> {
        let new_iteration = match self.iteration {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                NsvError::tag(format!("pre-release '{}' cannot be incremented any further", self))
            })?,
            None => 1,
        };

        Ok(PreRelease {
            label: self.label.clone(),
            iteration: Some(new_iteration),
        })
    }

    /// Move the sequence forward for a requested label.
    ///
    /// An empty or identical label continues the current sequence, any other
    /// label restarts it at `{label}.1`. A restart may sort below `self`.
    pub fn advance(&self, label: &str) -> Result<Self> {
        if label.is_empty() || label == self.label {
            self.increment_iteration()
        } else {
            Ok(PreRelease::first(label))
        }
    }

    /// Convert into the `semver` representation
    pub fn to_semver(&self) -> Result<semver::Prerelease> {
        let text = self.to_string();
        semver::Prerelease::new(&text)
            .map_err(|e| NsvError::tag(format!("invalid pre-release '{}': {}", text, e)))
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.label.is_empty(), self.iteration) {
            (true, Some(iter)) => write!(f, "{}", iter),
            (false, Some(iter)) => write!(f, "{}.{}", self.label, iter),
            (_, None) => write!(f, "{}", self.label),
        }
    }
}
