//! Domain logic - pure versioning rules independent of git operations

pub mod commit;
pub mod directive;
pub mod prerelease;
pub mod scope;
pub mod tag;
pub mod version;

pub use commit::{parse_header, Commit, CommitType, Header};
pub use directive::{extract_directives, Directive, DirectiveScan, Directives};
pub use prerelease::PreRelease;
pub use scope::Scope;
pub use tag::{format_tag, Tag, TagFormat};
pub use version::{next_version, BumpLevel};
