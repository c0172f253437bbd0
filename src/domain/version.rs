use crate::domain::directive::Directives;
use crate::domain::prerelease::PreRelease;
use crate::error::{NsvError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Version bump level, ordered from weakest to strongest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BumpLevel {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl BumpLevel {
    /// Parse a bump level named in a directive (`patch`, `minor` or `major`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "patch" => Some(BumpLevel::Patch),
            "minor" => Some(BumpLevel::Minor),
            "major" => Some(BumpLevel::Major),
            _ => None,
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpLevel::None => "none",
            BumpLevel::Patch => "patch",
            BumpLevel::Minor => "minor",
            BumpLevel::Major => "major",
        };
        write!(f, "{}", name)
    }
}

/// Calculates the version that follows `current`.
///
/// - No current version: starts from `0.0.0`, a first release never lands on
///   `1.0.0` unless a `force~major` directive asks for it.
/// - Major-zero: while `major == 0` a major bump moves `minor` instead.
/// - A prerelease directive appends `-{label}.1` to the bumped core, or
///   advances an existing prerelease without touching the core. When the
///   advanced prerelease would sort below the current one the core is bumped.
/// - Leaving a prerelease finalises its core when that core already covers
///   the requested level.
/// - Build metadata is always dropped.
///
/// Returns `Ok(None)` when there is nothing to release.
pub fn next_version(
    current: Option<&Version>,
    level: BumpLevel,
    directives: &Directives,
    default_label: &str,
) -> Result<Option<Version>> {
    let force_major = directives.force == Some(BumpLevel::Major);

    let Some(current) = current else {
        let core = match level {
            BumpLevel::None => return Ok(None),
            BumpLevel::Patch => Version::new(0, 0, 1),
            BumpLevel::Major if force_major => Version::new(1, 0, 0),
            BumpLevel::Minor | BumpLevel::Major => Version::new(0, 1, 0),
        };
        return with_new_prerelease(core, directives, default_label).map(Some);
    };

    let core = Version::new(current.major, current.minor, current.patch);

    if !current.pre.is_empty() {
        if let Some(label) = &directives.prerelease {
            let pre = PreRelease::parse(current.pre.as_str())?
                .advance(label)?
                .to_semver()?;
            if pre > current.pre {
                let mut next = core;
                next.pre = pre;
                return Ok(Some(next));
            }

            // The restarted sequence sorts below the current one
            let next = bump_core(&core, level.max(BumpLevel::Patch), force_major)?;
            return with_new_prerelease(next, directives, default_label).map(Some);
        }

        if level == BumpLevel::None {
            return Ok(None);
        }

        if effective_level(&core, level, force_major) <= covered_level(&core) {
            return Ok(Some(core));
        }
        return bump_core(&core, level, force_major).map(Some);
    }

    if level == BumpLevel::None {
        return Ok(None);
    }

    let next = bump_core(&core, level, force_major)?;
    with_new_prerelease(next, directives, default_label).map(Some)
}

fn with_new_prerelease(
    mut version: Version,
    directives: &Directives,
    default_label: &str,
) -> Result<Version> {
    if let Some(label) = &directives.prerelease {
        let label = if label.is_empty() { default_label } else { label };
        version.pre = PreRelease::first(label).to_semver()?;
    }
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}

/// Applies the major-zero rule to a requested level
fn effective_level(core: &Version, level: BumpLevel, force_major: bool) -> BumpLevel {
    if core.major == 0 && level == BumpLevel::Major && !force_major {
        BumpLevel::Minor
    } else {
        level
    }
}

/// Level a prerelease core already represents over its predecessor
fn covered_level(core: &Version) -> BumpLevel {
    if core.major > 0 && core.minor == 0 && core.patch == 0 {
        BumpLevel::Major
    } else if core.patch == 0 {
        BumpLevel::Minor
    } else {
        BumpLevel::Patch
    }
}

fn bump_core(core: &Version, level: BumpLevel, force_major: bool) -> Result<Version> {
    let mut next = match effective_level(core, level, force_major) {
        BumpLevel::Major => Version::new(increment(core.major, core)?, 0, 0),
        BumpLevel::Minor => Version::new(core.major, increment(core.minor, core)?, 0),
        BumpLevel::Patch => Version::new(core.major, core.minor, increment(core.patch, core)?),
        BumpLevel::None => Version::new(core.major, core.minor, core.patch),
    };
    next.pre = Prerelease::EMPTY;
    Ok(next)
}

fn increment(component: u64, core: &Version) -> Result<u64> {
    component
        .checked_add(1)
        .ok_or_else(|| NsvError::tag(format!("'{}' cannot be incremented any further", core)))
}
