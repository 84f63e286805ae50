//! The tenant configuration hierarchy.
//!
//! Settings are resolved through four levels, strictly ordered from parent to
//! child: a project owns branches, a branch owns environments, and an
//! environment owns organizations. Each level may override what it inherits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod hierarchy_tests;

/// A level of the configuration hierarchy.
///
/// The derived ordering follows the hierarchy: `Project < Branch <
/// Environment < Organization`.
///
/// # Examples
///
/// ```rust
/// use config_manager::ConfigLevel;
///
/// let level: ConfigLevel = "environment".parse().unwrap();
/// assert_eq!(level.parent(), Some(ConfigLevel::Branch));
/// assert_eq!(level.child(), Some(ConfigLevel::Organization));
/// assert!(ConfigLevel::Project < level);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLevel {
    Project,
    Branch,
    Environment,
    Organization,
}

impl ConfigLevel {
    /// All levels, parent first.
    pub const ALL: [ConfigLevel; 4] = [
        ConfigLevel::Project,
        ConfigLevel::Branch,
        ConfigLevel::Environment,
        ConfigLevel::Organization,
    ];

    /// Returns the lowercase name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::Project => "project",
            ConfigLevel::Branch => "branch",
            ConfigLevel::Environment => "environment",
            ConfigLevel::Organization => "organization",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// The level this one inherits from, if any.
    pub fn parent(&self) -> Option<ConfigLevel> {
        self.index().checked_sub(1).map(|index| Self::ALL[index])
    }

    /// The level that inherits from this one, if any.
    pub fn child(&self) -> Option<ConfigLevel> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Levels strictly after this one, nearest first.
    pub fn descendants(&self) -> &'static [ConfigLevel] {
        &Self::ALL[self.index() + 1..]
    }

    /// Levels from the project level up to and including this one.
    pub fn ancestors_and_self(&self) -> &'static [ConfigLevel] {
        &Self::ALL[..=self.index()]
    }

    /// Returns true if this level is `other` or one of its descendants.
    pub fn is_at_least(&self, other: ConfigLevel) -> bool {
        *self >= other
    }

    /// Top-level keys that exist in this level's schema but were fixed by an
    /// earlier level and can no longer be overridden here.
    pub fn no_longer_overridable_keys(&self) -> &'static [&'static str] {
        match self {
            ConfigLevel::Project => &[],
            ConfigLevel::Branch | ConfigLevel::Environment | ConfigLevel::Organization => {
                &["sourceOfTruth"]
            }
        }
    }
}

impl fmt::Display for ConfigLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown config level '{0}'. Expected one of: project, branch, environment, organization")]
pub struct UnknownConfigLevel(pub String);

impl FromStr for ConfigLevel {
    type Err = UnknownConfigLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownConfigLevel(s.to_string()))
    }
}
