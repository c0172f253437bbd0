use crate::boundary::BoundaryWarning;
use crate::config::Options;
use crate::domain::{BumpLevel, Commit, Directives, Scope, Tag, TagFormat};
use crate::error::Result;
use crate::git::{CommitInfo, Repository};

/// The commit that decided the natural bump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Position in the scoped, newest-first log
    pub index: Option<usize>,
    /// Level that commit asked for
    pub level: BumpLevel,
}

/// Everything the commits in a range asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub matched: MatchResult,
    pub directives: Directives,
}

impl Resolution {
    /// A `force` directive replaces the natural level entirely
    pub fn applied_level(&self) -> BumpLevel {
        self.directives.force.unwrap_or(self.matched.level)
    }
}

/// Fold a newest-first log into a single decision.
///
/// The strongest level reached by any one commit wins; on a tie the newest
/// commit is the match. Directives keep the most recent one of each kind.
pub fn resolve(log: &[Commit]) -> Resolution {
    let mut resolution = Resolution::default();

    for (index, commit) in log.iter().enumerate() {
        let level = commit.bump();
        if level > resolution.matched.level {
            resolution.matched = MatchResult {
                index: Some(index),
                level,
            };
        }

        for directive in &commit.directives {
            resolution.directives.absorb(directive);
        }
    }

    resolution
}

/// A calculated next version and how it was reached
#[derive(Debug, Clone, PartialEq)]
pub struct NextVersion {
    pub tag: Tag,
    /// The tag as printed, after any format template
    pub formatted: String,
    pub previous: Option<Tag>,
    pub matched: MatchResult,
    /// Level applied to the previous version
    pub level: BumpLevel,
    pub directives: Directives,
    /// Scoped history since the previous tag, newest first
    pub log: Vec<Commit>,
    /// Directory the version was calculated for, empty at the root
    pub log_dir: String,
}

impl NextVersion {
    pub fn matched_commit(&self) -> Option<&Commit> {
        self.matched.index.and_then(|i| self.log.get(i))
    }
}

/// Result of one analysis; `next` is None when there is nothing to release
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub next: Option<NextVersion>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Calculates the next version of a repository
pub struct VersionAnalyzer {
    options: Options,
    format: Option<TagFormat>,
}

impl VersionAnalyzer {
    /// Create a new version analyzer. The format template is validated here,
    /// before any history is read.
    pub fn new(options: Options) -> Result<Self> {
        let format = options.format.as_deref().map(TagFormat::parse).transpose()?;
        Ok(VersionAnalyzer { options, format })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Analyze the history of a repository
    pub fn analyze<R: Repository>(&self, repo: &R) -> Result<Analysis> {
        let scope = match &self.options.path {
            Some(path) => Scope::resolve(path),
            None => Scope::resolve(repo.current_path()?),
        };
        tracing::debug!(log_dir = scope.log_dir(), prefix = scope.tag_prefix(), "resolved scope");

        let previous = repo
            .latest_tag(scope.tag_filter())?
            .map(|raw| Tag::parse(&raw))
            .transpose()?;

        let history = repo.log(
            previous.as_ref().map(|tag| tag.raw.as_str()),
            scope.path_filter(),
        )?;

        self.analyze_history(previous, &scope, history)
    }

    /// Analyze history already read from a repository.
    ///
    /// Commits outside `scope` are dropped before classification.
    pub fn analyze_history(
        &self,
        previous: Option<Tag>,
        scope: &Scope,
        history: Vec<CommitInfo>,
    ) -> Result<Analysis> {
        let log: Vec<Commit> = history
            .into_iter()
            .filter(|info| scope.touches(info.changed_paths.as_slice()))
            .map(|info| Commit::parse(info.hash, info.message))
            .collect();

        let mut warnings: Vec<BoundaryWarning> = log
            .iter()
            .flat_map(|commit| {
                commit
                    .malformed
                    .iter()
                    .map(move |line| BoundaryWarning::MalformedDirective {
                        commit: commit.hash.clone(),
                        line: line.clone(),
                    })
            })
            .collect();

        for warning in &warnings {
            tracing::debug!(%warning, "directive ignored");
        }

        let resolution = resolve(&log);
        let level = resolution.applied_level();
        tracing::debug!(
            natural = %resolution.matched.level,
            applied = %level,
            matched = ?resolution.matched.index,
            directives = ?resolution.directives,
            "resolved bump"
        );

        let next = Tag::increment(
            previous.as_ref(),
            scope.tag_prefix(),
            level,
            &resolution.directives,
            &self.options.prerelease_label,
        )?;

        let Some(tag) = next else {
            warnings.push(BoundaryWarning::NoApplicableBump {
                latest_tag: previous.map(|tag| tag.raw),
                commits: log.len(),
            });
            return Ok(Analysis {
                next: None,
                warnings,
            });
        };

        let formatted = match &self.format {
            Some(format) => format.render(&tag),
            None => tag.raw.clone(),
        };
        tracing::info!(tag = %formatted, "calculated next version");

        Ok(Analysis {
            next: Some(NextVersion {
                tag,
                formatted,
                previous,
                matched: resolution.matched,
                level,
                directives: resolution.directives,
                log,
                log_dir: scope.log_dir().to_string(),
            }),
            warnings,
        })
    }
}
