//! Dot-notation key paths.
//!
//! A config key such as `"auth.oauth.providers.google"` is shorthand for a
//! nested assignment. [`KeyPath`] splits such a key into its segments once so
//! that the override engine (shadow-clearing), the normalizer (tree walk) and
//! the schema layer (sub-schema lookup) all agree on how a key is addressed.
//!
//! # Examples
//!
//! ```
//! use config_format::path::KeyPath;
//!
//! let path = KeyPath::parse("auth.oauth.providers");
//! assert_eq!(path.segments(), &["auth", "oauth", "providers"]);
//! assert_eq!(path.depth(), 2);
//!
//! let (parents, last) = path.split_last();
//! assert_eq!(parents, &["auth", "oauth"]);
//! assert_eq!(last, "providers");
//!
//! assert!(path.is_shadowed_by("auth.oauth"));
//! assert!(!path.is_shadowed_by("auth.oa"));
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// The separator between segments of a dot-notation key.
pub const SEGMENT_SEPARATOR: char = '.';

static SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_:$][a-zA-Z_:$0-9\-]*$").expect("segment pattern is a valid regex")
});

/// Returns true if `segment` is a legal single key segment.
///
/// Segments consist of alphanumerics, underscores, colons, dollar signs and
/// hyphens, and must not start with a hyphen.
pub fn is_valid_segment(segment: &str) -> bool {
    SEGMENT_PATTERN.is_match(segment)
}

/// Returns true if every dot-separated segment of `key` is legal.
///
/// Empty segments (leading, trailing or doubled dots) make the key invalid.
pub fn is_valid_key(key: &str) -> bool {
    key.split(SEGMENT_SEPARATOR).all(is_valid_segment)
}

/// A key split into its dot-separated segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath<'a> {
    key: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    /// Splits `key` on dots.
    ///
    /// A key without dots yields a single segment.
    pub fn parse(key: &'a str) -> Self {
        Self {
            key,
            segments: key.split(SEGMENT_SEPARATOR).collect(),
        }
    }

    /// The original key this path was parsed from.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Number of dots in the key.
    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }

    /// Returns true if the key contains at least one dot.
    pub fn is_dotted(&self) -> bool {
        self.segments.len() > 1
    }

    /// Splits off the final segment.
    ///
    /// `split` always yields at least one item, so the last segment exists
    /// even for the empty key.
    pub fn split_last(&self) -> (&[&'a str], &'a str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, *last),
            None => (&[], self.key),
        }
    }

    /// Returns true if assigning at `key` would shadow this path.
    ///
    /// A path is shadowed by its own key and by every strict dot-prefix of it;
    /// it is never shadowed by a key that merely shares a string prefix or by
    /// a deeper key.
    pub fn is_shadowed_by(&self, key: &str) -> bool {
        let other = KeyPath::parse(key);
        other.segments.len() <= self.segments.len()
            && self.segments[..other.segments.len()] == other.segments[..]
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

/// Number of dots in `key`.
pub fn dot_count(key: &str) -> usize {
    key.matches(SEGMENT_SEPARATOR).count()
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
