//! Main workflow orchestration logic
//!
//! Turns command line arguments and the configuration file into one
//! immutable [Options] value, then runs the analysis. Keeping this out of
//! main.rs lets the workflow be called programmatically without clap.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analyzer::{Analysis, VersionAnalyzer};
use crate::config::{self, Config, Options};
use crate::git::{Git2Repository, Repository};

/// Arguments for the next version workflow
///
/// Mirrors the CLI Args; `None` and `false` defer to the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NextVersionArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Explain how the version was calculated
    pub show: bool,

    /// Template for the printed version
    pub format: Option<String>,

    /// Directory to version instead of the working directory
    pub path: Option<String>,
}

/// Result of a successful workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub analysis: Analysis,

    /// Whether the explanation should be printed
    pub show: bool,
}

/// Build information printed by `nsv version`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuildDetails {
    pub version: String,
    pub os: String,
    pub arch: String,
}

impl BuildDetails {
    pub fn current() -> Self {
        BuildDetails {
            version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Merge command line arguments over the configuration file
pub fn build_options(args: &NextVersionArgs, config: &Config) -> Result<Options> {
    let mut options = Options::from_config(config)?;

    if args.show {
        options.show = true;
    }
    if let Some(format) = args.format.as_ref().filter(|f| !f.is_empty()) {
        options.format = Some(format.clone());
    }
    if let Some(path) = args.path.as_ref().filter(|p| !p.is_empty()) {
        options.path = Some(PathBuf::from(path));
    }

    Ok(options)
}

/// Calculate the next version for the repository containing the working
/// directory
///
/// 1. Load configuration and merge arguments
/// 2. Open the git repository
/// 3. Analyze commits since the latest matching tag
pub fn run_next_version(args: NextVersionArgs) -> Result<WorkflowResult> {
    let config = config::load_config(args.config_path.as_deref())?;
    let options = build_options(&args, &config)?;

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let repo = Git2Repository::open(&cwd)
        .with_context(|| format!("'{}' is not inside a git repository", cwd.display()))?;

    run_with_repository(&repo, options)
}

/// Calculate the next version using any repository implementation
pub fn run_with_repository<R: Repository>(repo: &R, options: Options) -> Result<WorkflowResult> {
    let show = options.show;
    let analyzer = VersionAnalyzer::new(options)?;
    let analysis = analyzer.analyze(repo)?;

    Ok(WorkflowResult { analysis, show })
}
