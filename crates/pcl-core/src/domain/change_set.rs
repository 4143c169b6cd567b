//! Base reference and change set: the inputs the generation request is built from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a [`BaseReference`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseOrigin {
    /// Fork point between the candidate branch and the current position.
    ForkPoint,
    /// No fork point was found; the current position itself is the base.
    CurrentPosition,
}

/// Commit-ish the working tree is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseReference {
    rev: String,
    origin: BaseOrigin,
}

impl BaseReference {
    pub fn fork_point(rev: impl Into<String>) -> Self {
        Self {
            rev: rev.into(),
            origin: BaseOrigin::ForkPoint,
        }
    }

    pub fn current_position(rev: impl Into<String>) -> Self {
        Self {
            rev: rev.into(),
            origin: BaseOrigin::CurrentPosition,
        }
    }

    pub fn rev(&self) -> &str {
        &self.rev
    }

    pub fn origin(&self) -> BaseOrigin {
        self.origin
    }
}

impl fmt::Display for BaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rev)
    }
}

/// Normalized diff text.
///
/// A change set without hunks means "nothing to report" and is a regular
/// value, not an error. Pure renames and mode-only changes still print file
/// headers but count as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet(String);

impl ChangeSet {
    /// Wrap raw diff output, dropping surrounding whitespace.
    pub fn new(diff: impl AsRef<str>) -> Self {
        Self(diff.as_ref().trim().to_string())
    }

    /// True when the diff carries no hunk.
    pub fn is_empty(&self) -> bool {
        self.hunk_count() == 0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of `@@` hunk headers in the diff.
    pub fn hunk_count(&self) -> usize {
        self.0.lines().filter(|l| l.starts_with("@@")).count()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
