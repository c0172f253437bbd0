use crate::domain::directive::Directives;
use crate::domain::version::{next_version, BumpLevel};
use crate::error::{NsvError, Result};
use regex::{NoExpand, Regex};
use semver::Version;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<prefix>.+/)?(?P<version>v?(?P<semver>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?))$",
    )
    .expect("tag pattern is valid")
});

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("placeholder pattern is valid"));

const VERSION_FIELD: &str = ".Version";

/// A version tag: `[prefix/][v]major.minor.patch[-pre][+meta]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// The full tag text
    pub raw: String,
    /// Namespace including its trailing `/`, or empty
    pub prefix: String,
    /// Tag without the prefix, including any `v` marker
    pub version: String,
    pub semver: Version,
}

impl Tag {
    /// Parse a tag, keeping its prefix and `v` marker verbatim
    pub fn parse(raw: &str) -> Result<Self> {
        let captures = TAG_RE.captures(raw).ok_or_else(|| {
            NsvError::tag(format!(
                "'{}' does not match [prefix/][v]major.minor.patch[-pre][+meta]",
                raw
            ))
        })?;

        let prefix = captures
            .name("prefix")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let version = captures
            .name("version")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let semver_text = captures.name("semver").map(|m| m.as_str()).unwrap_or("");
        let semver = Version::parse(semver_text)
            .map_err(|e| NsvError::tag(format!("'{}': {}", raw, e)))?;

        Ok(Tag {
            raw: raw.to_string(),
            prefix,
            version,
            semver,
        })
    }

    /// Build a tag from its parts. A non-empty prefix gains a trailing `/`.
    pub fn new(prefix: &str, v_marker: bool, semver: Version) -> Self {
        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };
        let version = if v_marker {
            format!("v{}", semver)
        } else {
            semver.to_string()
        };

        Tag {
            raw: format!("{}{}", prefix, version),
            prefix,
            version,
            semver,
        }
    }

    pub fn has_v_marker(&self) -> bool {
        self.version.starts_with('v')
    }

    /// Prerelease identifiers, e.g. `beta.1`
    pub fn pre(&self) -> Option<&str> {
        Some(self.semver.pre.as_str()).filter(|s| !s.is_empty())
    }

    /// Build metadata, e.g. `20230207`
    pub fn metadata(&self) -> Option<&str> {
        Some(self.semver.build.as_str()).filter(|s| !s.is_empty())
    }

    /// Calculate the tag following `baseline`.
    ///
    /// The baseline's prefix and `v` marker carry over; without a baseline the
    /// given `prefix` is used and no marker is added. Returns `Ok(None)` when
    /// nothing should be released.
    pub fn increment(
        baseline: Option<&Tag>,
        prefix: &str,
        level: BumpLevel,
        directives: &Directives,
        default_label: &str,
    ) -> Result<Option<Tag>> {
        let next = next_version(
            baseline.map(|tag| &tag.semver),
            level,
            directives,
            default_label,
        )?;

        Ok(next.map(|semver| match baseline {
            Some(tag) => Tag::new(&tag.prefix, tag.has_v_marker(), semver),
            None => Tag::new(prefix, false, semver),
        }))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Tag {
    type Err = NsvError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

/// User supplied template for the printed version, e.g. `custom/v{{.Version}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormat {
    template: String,
}

impl TagFormat {
    /// Validate a template. `{{.Version}}` is the only field it may reference.
    pub fn parse(template: impl Into<String>) -> Result<Self> {
        let template = template.into();

        let mut found = false;
        for captures in PLACEHOLDER_RE.captures_iter(&template) {
            let field = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            if field != VERSION_FIELD {
                return Err(NsvError::format(format!(
                    "unrecognised field '{}' in template '{}', only {{{{{}}}}} is supported",
                    field, template, VERSION_FIELD
                )));
            }
            found = true;
        }

        if !found {
            return Err(NsvError::format(format!(
                "template '{}' does not reference {{{{{}}}}}",
                template, VERSION_FIELD
            )));
        }

        Ok(TagFormat { template })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute the tag's version: no prefix, `v` marker kept
    pub fn render(&self, tag: &Tag) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.template, NoExpand(&tag.version))
            .into_owned()
    }
}

/// Render a tag, through `template` when one is given
pub fn format_tag(tag: &Tag, template: Option<&str>) -> Result<String> {
    match template {
        Some(template) => Ok(TagFormat::parse(template)?.render(tag)),
        None => Ok(tag.raw.clone()),
    }
}
