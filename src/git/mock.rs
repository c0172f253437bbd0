use crate::error::Result;
use crate::git::{is_version_tag, CommitInfo, Repository};
use std::path::PathBuf;

#[derive(Debug, Clone)]
struct MockCommit {
    info: CommitInfo,
    tags: Vec<String>,
}

/// In-memory repository for testing without actual git operations
///
/// History is built oldest first with [MockRepository::commit], or read from a
/// newest-first log with [MockRepository::from_log].
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    commits: Vec<MockCommit>,
    current_path: PathBuf,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a newest-first log, one commit per line.
    ///
    /// Lines may start with a decoration such as `(tag: 0.1.0)` or
    /// `(HEAD -> main, tag: v1.0.0)`; only `tag:` entries are kept. When any
    /// line starts with `> `, commits start at those lines and the lines in
    /// between form their message bodies.
    ///
    /// ```text
    /// > (main) feat: stable api
    /// nsv:force~major
    /// > (tag: 0.9.9) fix: stability issues
    /// ```
    pub fn from_log(log: &str) -> Self {
        let multiline = log.lines().any(|line| line.starts_with("> "));

        let mut entries: Vec<(Vec<String>, String)> = Vec::new();
        for line in log.lines() {
            let start = if multiline {
                line.strip_prefix("> ")
            } else {
                Some(line)
            };

            match start {
                Some(text) => {
                    let (tags, message) = split_decoration(text.trim());
                    entries.push((tags, message.to_string()));
                }
                None => {
                    if let Some((_, message)) = entries.last_mut() {
                        message.push('\n');
                        message.push_str(line);
                    }
                }
            }
        }

        let mut repo = MockRepository::new();
        for (tags, message) in entries.into_iter().rev() {
            repo = repo.commit(&message);
            for tag in tags {
                repo = repo.tag(&tag);
            }
        }
        repo
    }

    /// Add a commit on top of the history that changes no files
    pub fn commit(self, message: &str) -> Self {
        self.commit_files(message, &[])
    }

    /// Add a commit on top of the history changing the given files
    pub fn commit_files(mut self, message: &str, paths: &[&str]) -> Self {
        let hash = format!("{:040x}", self.commits.len() + 1);
        self.commits.push(MockCommit {
            info: CommitInfo {
                hash,
                message: message.to_string(),
                changed_paths: paths.iter().map(|p| p.to_string()).collect(),
            },
            tags: Vec::new(),
        });
        self
    }

    /// Tag the newest commit
    pub fn tag(mut self, name: &str) -> Self {
        if let Some(last) = self.commits.last_mut() {
            last.tags.push(name.to_string());
        }
        self
    }

    /// Set the directory the tool is invoked from, relative to the root
    pub fn with_current_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_path = path.into();
        self
    }

    fn newest_first(&self) -> impl Iterator<Item = &MockCommit> {
        self.commits.iter().rev()
    }
}

/// Split `(tag: x, main) message` into its tag names and message
fn split_decoration(text: &str) -> (Vec<String>, &str) {
    let Some(rest) = text.strip_prefix('(') else {
        return (Vec::new(), text);
    };
    let Some((decoration, message)) = rest.split_once(')') else {
        return (Vec::new(), text);
    };

    let tags = decoration
        .split(',')
        .filter_map(|item| item.trim().strip_prefix("tag:"))
        .map(|tag| tag.trim().to_string())
        .collect();

    (tags, message.trim_start())
}

impl Repository for MockRepository {
    fn current_path(&self) -> Result<PathBuf> {
        Ok(self.current_path.clone())
    }

    fn latest_tag(&self, prefix: Option<&str>) -> Result<Option<String>> {
        Ok(self.newest_first().find_map(|commit| {
            commit
                .tags
                .iter()
                .find(|tag| is_version_tag(tag, prefix))
                .cloned()
        }))
    }

    fn log(&self, since: Option<&str>, _within: Option<&str>) -> Result<Vec<CommitInfo>> {
        Ok(self
            .newest_first()
            .take_while(|commit| match since {
                Some(tag) => !commit.tags.iter().any(|t| t == tag),
                None => true,
            })
            .map(|commit| commit.info.clone())
            .collect())
    }
}
