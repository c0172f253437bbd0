//! Git operations abstraction layer
//!
//! The version calculation only needs three things from source control: where
//! the tool was invoked, the newest tag matching a prefix and the history above
//! that tag. The [Repository] trait captures exactly that, with two
//! implementations:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory history for testing
//!
//! ```rust
//! # use nsv::git::{MockRepository, Repository};
//! # fn example() -> nsv::Result<()> {
//! let repo = MockRepository::from_log(
//!     "fix(search): search is not being aggregated correctly
//! (tag: 0.1.0) feat(search): support aggregations for search analytics",
//! );
//! assert_eq!(repo.latest_tag(None)?.as_deref(), Some("0.1.0"));
//! assert_eq!(repo.log(Some("0.1.0"), None)?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message
    pub message: String,
    /// Files changed by the commit, relative to the repository root
    pub changed_paths: Vec<String>,
}

/// Source control operations needed to calculate a version
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying
/// errors (like `git2::Error`) to [crate::error::NsvError] variants.
pub trait Repository {
    /// Directory the tool was invoked from, relative to the repository root
    fn current_path(&self) -> Result<PathBuf>;

    /// Newest tag reachable from HEAD that looks like a version
    ///
    /// With `Some(prefix)` only tags starting with `prefix` are considered,
    /// with `None` tags with any prefix match.
    ///
    /// # Returns
    /// * `Ok(Some(name))` - The tag name, unparsed
    /// * `Ok(None)` - No matching tag (or no commits at all)
    fn latest_tag(&self, prefix: Option<&str>) -> Result<Option<String>>;

    /// Commits reachable from HEAD, newest first
    ///
    /// When `since` names a tag, history stops before the tagged commit.
    /// `within` is the directory history will be filtered by; with `None`
    /// implementations may leave `changed_paths` empty.
    fn log(&self, since: Option<&str>, within: Option<&str>) -> Result<Vec<CommitInfo>>;
}

/// Whether a tag name is a version candidate for `prefix`.
///
/// The part after the prefix (or after the last `/` when no prefix is given)
/// must start with a digit or a `v` followed by a digit. Candidates are still
/// parsed strictly afterwards, so `v1.2` is picked up and then rejected.
pub fn is_version_tag(name: &str, prefix: Option<&str>) -> bool {
    let rest = match prefix {
        Some(prefix) => match name.strip_prefix(prefix) {
            Some(rest) => rest,
            None => return false,
        },
        None => name.rsplit_once('/').map(|(_, rest)| rest).unwrap_or(name),
    };

    let rest = rest.strip_prefix('v').unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}
