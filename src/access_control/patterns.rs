//! Path patterns for role grants
//!
//! A grant is either an exact path or a prefix written with a `/*` suffix.

use crate::error::ConfigError;
use crate::util::normalize_path;
use std::fmt;
use std::str::FromStr;

const WILDCARD_SUFFIX: &str = "/*";

/// A single path grant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPattern {
    /// Matches this path only
    Exact(String),
    /// Matches the base path and everything nested under it
    Prefix(String),
}

impl PathPattern {
    /// Parse a textual pattern (`"/courses"`, `"/admin/*"`)
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if !pattern.starts_with('/') {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "must start with '/'".to_string(),
            });
        }

        match pattern.strip_suffix(WILDCARD_SUFFIX) {
            Some(base) if base.contains('*') => Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "wildcard is only allowed as a trailing '/*'".to_string(),
            }),
            Some("") => Ok(PathPattern::Prefix(String::new())),
            Some(base) if base == "/" || !is_normalized(base) => Err(not_normalized(pattern)),
            Some(base) => Ok(PathPattern::Prefix(base.to_string())),
            None if pattern.contains('*') => Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "wildcard is only allowed as a trailing '/*'".to_string(),
            }),
            None if !is_normalized(pattern) => Err(not_normalized(pattern)),
            None => Ok(PathPattern::Exact(pattern.to_string())),
        }
    }

    /// Check whether a normalized path is covered by this pattern
    ///
    /// Prefix matching is segment aware: `/admin/*` covers `/admin` and
    /// `/admin/reports` but not `/administrator`.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || base.is_empty(),
                None => false,
            },
        }
    }
}

/// Grants are compared against normalized request paths, so anything
/// normalization would rewrite could never match
pub(crate) fn is_normalized(path: &str) -> bool {
    normalize_path(path) == path
}

fn not_normalized(pattern: &str) -> ConfigError {
    ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: "path must be normalized (no trailing '/', '//', '?' or '#')".to_string(),
    }
}

impl FromStr for PathPattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(path) => f.write_str(path),
            PathPattern::Prefix(base) => write!(f, "{}{}", base, WILDCARD_SUFFIX),
        }
    }
}

/// Ordered set of grants for one role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<PathPattern>,
}

impl PatternSet {
    /// Compile a list of textual patterns
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| PathPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check if a path matches any pattern
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Find the first pattern covering the path
    pub fn find_match(&self, path: &str) -> Option<&PathPattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPattern> {
        self.patterns.iter()
    }
}

impl From<Vec<PathPattern>> for PatternSet {
    fn from(patterns: Vec<PathPattern>) -> Self {
        Self { patterns }
    }
}
