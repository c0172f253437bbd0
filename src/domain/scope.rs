//! Path scoping for monorepos.
//!
//! Running inside `src/search` (or passing `--path src/search`) versions that
//! directory on its own: tags are searched and created under the `search/`
//! prefix and only commits touching `src/search` are considered.

use std::path::Path;

/// Directory the next version is calculated for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    log_dir: String,
    prefix: String,
}

impl Scope {
    /// The repository root: no prefix and no path filtering
    pub fn root() -> Self {
        Scope::default()
    }

    /// Resolve a path relative to the repository root.
    ///
    /// `.`, empty paths and `./` segments are ignored, `..` steps back up and
    /// both `/` and `\` are treated as separators.
    pub fn resolve(path: impl AsRef<Path>) -> Self {
        let text = path.as_ref().to_string_lossy().replace('\\', "/");

        let mut parts: Vec<&str> = Vec::new();
        for part in text.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }

        let prefix = parts
            .last()
            .map(|name| format!("{}/", name))
            .unwrap_or_default();

        Scope {
            log_dir: parts.join("/"),
            prefix,
        }
    }

    pub fn is_root(&self) -> bool {
        self.log_dir.is_empty()
    }

    /// Directory relative to the repository root, empty at the root
    pub fn log_dir(&self) -> &str {
        &self.log_dir
    }

    /// Prefix given to new tags, e.g. `search/`
    pub fn tag_prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix existing tags must carry to count; any tag matches at the root
    pub fn tag_filter(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(&self.prefix)
        }
    }

    /// Directory commits must touch to count; nothing is filtered at the root
    pub fn path_filter(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(&self.log_dir)
        }
    }

    /// Whether a changed file lies inside this scope
    pub fn contains(&self, path: &str) -> bool {
        if self.is_root() {
            return true;
        }
        path == self.log_dir
            || path
                .strip_prefix(self.log_dir.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Whether a commit with these changed files belongs to this scope
    pub fn touches<S: AsRef<str>>(&self, changed_paths: &[S]) -> bool {
        self.is_root() || changed_paths.iter().any(|p| self.contains(p.as_ref()))
    }
}
