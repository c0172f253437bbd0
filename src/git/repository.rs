use crate::domain::Tag;
use crate::error::{NsvError, Result};
use crate::git::{is_version_tag, CommitInfo};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    invoked_from: PathBuf,
}

impl Git2Repository {
    /// Discover the repository containing `path`, which also becomes the
    /// directory the tool is considered to be invoked from
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())?;

        Ok(Git2Repository {
            repo,
            invoked_from: path.as_ref().to_path_buf(),
        })
    }

    /// Create from existing git2::Repository, invoked from its working directory
    pub fn from_git2(repo: Git2Repo) -> Self {
        let invoked_from = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo.path().to_path_buf());

        Git2Repository { repo, invoked_from }
    }

    /// HEAD commit, or None for a repository without commits
    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Tag names grouped by the commit they point at.
    ///
    /// Handles both lightweight and annotated tags.
    fn tags_by_commit(&self) -> Result<HashMap<Oid, Vec<String>>> {
        let mut tags: HashMap<Oid, Vec<String>> = HashMap::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            match reference.peel_to_commit() {
                Ok(commit) => tags.entry(commit.id()).or_default().push(name.to_string()),
                Err(e) => tracing::debug!(tag = name, error = %e, "skipping tag not pointing at a commit"),
            }
        }

        Ok(tags)
    }

    fn revwalk_from_head(&self, head: Oid) -> Result<git2::Revwalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;
        Ok(revwalk)
    }

    /// Files changed by a commit compared to its first parent
    fn changed_paths(&self, commit: &git2::Commit<'_>) -> Result<Vec<String>> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    let path = path.to_string_lossy().replace('\\', "/");
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
        }

        Ok(paths)
    }
}

impl super::Repository for Git2Repository {
    fn current_path(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| NsvError::config("bare repositories have no working directory"))?
            .canonicalize()?;
        let here = self.invoked_from.canonicalize()?;

        here.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                NsvError::config(format!(
                    "'{}' is outside the repository at '{}'",
                    here.display(),
                    workdir.display()
                ))
            })
    }

    fn latest_tag(&self, prefix: Option<&str>) -> Result<Option<String>> {
        let Some(head) = self.head_oid()? else {
            return Ok(None);
        };

        let tags = self.tags_by_commit()?;
        if tags.is_empty() {
            return Ok(None);
        }

        for oid in self.revwalk_from_head(head)? {
            let oid = oid?;
            let Some(names) = tags.get(&oid) else {
                continue;
            };

            // Several tags on one commit: prefer the highest version
            let best = names
                .iter()
                .filter(|name| is_version_tag(name, prefix))
                .max_by(|a, b| {
                    let a_ver = Tag::parse(a).ok().map(|t| t.semver);
                    let b_ver = Tag::parse(b).ok().map(|t| t.semver);
                    a_ver.cmp(&b_ver).then_with(|| a.cmp(b))
                });

            if let Some(name) = best {
                tracing::debug!(tag = %name, commit = %oid, "found latest matching tag");
                return Ok(Some(name.clone()));
            }
        }

        Ok(None)
    }

    fn log(&self, since: Option<&str>, within: Option<&str>) -> Result<Vec<CommitInfo>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.revwalk_from_head(head)?;

        if let Some(tag_name) = since {
            let boundary = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag_name))?
                .peel_to_commit()?;
            revwalk.hide(boundary.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            let changed_paths = match within {
                Some(_) => self.changed_paths(&commit)?,
                None => Vec::new(),
            };

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
                changed_paths,
            });
        }

        tracing::debug!(commits = commits.len(), since = ?since, "read history");
        Ok(commits)
    }
}
