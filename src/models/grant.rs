//! Permission grants and downgrade results.

use super::{PermissionLevel, Repository};
use std::fmt;

/// A user's effective permission on one repository.
///
/// Ephemeral: recomputed on every audit, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    /// The repository the grant applies to.
    pub repository: Repository,
    /// The user's effective permission level.
    pub permission: PermissionLevel,
}

impl PermissionGrant {
    /// Creates a new grant.
    #[must_use]
    pub const fn new(repository: Repository, permission: PermissionLevel) -> Self {
        Self {
            repository,
            permission,
        }
    }
}

impl fmt::Display for PermissionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repository.archived {
            write!(f, "{} (archived): {}", self.repository.name, self.permission)
        } else {
            write!(f, "{}: {}", self.repository.name, self.permission)
        }
    }
}

/// Per-repository outcome of a downgrade attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DowngradeOutcome {
    /// The permission was set to the target level.
    Applied,
    /// The repository is archived; no mutation attempted.
    SkippedArchived,
    /// The permission already equals the target; no mutation attempted.
    SkippedAtTarget,
    /// The attempt failed; the reason is carried for reporting.
    Failed(String),
}

impl DowngradeOutcome {
    /// Returns true if a mutation was actually applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns true if the attempt failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for DowngradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::SkippedArchived => write!(f, "skipped (archived)"),
            Self::SkippedAtTarget => write!(f, "skipped (already at target)"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// The outcome of one downgrade attempt, reported to the operator and the
/// operational log; not persisted as structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DowngradeResult {
    /// The repository the attempt targeted.
    pub repository: String,
    /// The outcome.
    pub outcome: DowngradeOutcome,
}

impl DowngradeResult {
    /// Creates a new result.
    #[must_use]
    pub fn new(repository: impl Into<String>, outcome: DowngradeOutcome) -> Self {
        Self {
            repository: repository.into(),
            outcome,
        }
    }
}

impl fmt::Display for DowngradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.repository, self.outcome)
    }
}
