use crate::domain::prerelease::is_valid_label;
use crate::error::{NsvError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "nsv.toml";

/// Represents the contents of an `nsv.toml` file.
///
/// Every field is optional; command line flags and `NSV_*` environment
/// variables take precedence over the file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Explain how the version was calculated
    #[serde(default)]
    pub show: bool,

    /// Template for the printed version, e.g. `v{{.Version}}`
    #[serde(default)]
    pub format: Option<String>,

    /// Directory to version, relative to the repository root
    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,
}

/// Returns the label used by `nsv:pre` when none is given.
fn default_prerelease_label() -> String {
    "beta".to_string()
}

/// Configuration for prerelease versions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrereleaseConfig {
    #[serde(default = "default_prerelease_label")]
    pub default_label: String,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        PrereleaseConfig {
            default_label: default_prerelease_label(),
        }
    }
}

/// Immutable options for a single version calculation.
///
/// Built once from the configuration file and command line, then passed to
/// the analyzer by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub show: bool,
    pub format: Option<String>,
    /// Overrides the directory detected from the working directory
    pub path: Option<PathBuf>,
    pub prerelease_label: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            show: false,
            format: None,
            path: None,
            prerelease_label: default_prerelease_label(),
        }
    }
}

impl Options {
    /// Options described by a configuration file
    pub fn from_config(config: &Config) -> Result<Self> {
        let label = config.prerelease.default_label.trim();
        if !is_valid_label(label) {
            return Err(NsvError::config(format!(
                "invalid prerelease default_label '{}': use letters, digits and '-'",
                label
            )));
        }

        Ok(Options {
            show: config.show,
            format: config.format.clone().filter(|f| !f.is_empty()),
            path: config.path.as_ref().map(PathBuf::from),
            prerelease_label: label.to_string(),
        })
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `nsv.toml` in current directory
/// 3. `nsv/nsv.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => match find_config_file() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        NsvError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        NsvError::config(format!("cannot parse '{}': {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn find_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("nsv").join(CONFIG_FILE))
        .filter(|path| path.exists())
}
