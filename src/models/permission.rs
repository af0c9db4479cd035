//! Permission levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered access tier governing a user's allowed actions on a repository.
///
/// Ordering matters: `None < Read < Write < Maintain < Admin`. The auditor
/// partitions grants by comparing against a target level, so the derive
/// order must match the access hierarchy.
///
/// The hosting API has used two naming conventions over time (`pull`/`push`
/// in early versions, `read`/`write` later). They denote the same tiers;
/// [`PermissionLevel::parse`] accepts both and the crate uses one canonical
/// set internally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// No access; the user has no grant on the repository.
    #[default]
    None,
    /// Read-only access (`pull` in the legacy naming).
    Read,
    /// Read and write access (`push` in the legacy naming).
    Write,
    /// Write access plus repository management without destructive actions.
    Maintain,
    /// Full administrative access.
    Admin,
}

impl PermissionLevel {
    /// Parses a permission string from either API naming convention.
    ///
    /// Unknown strings map to [`PermissionLevel::None`] — a grant the tool
    /// cannot classify is treated as no grant rather than guessed at.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "read" | "pull" => Self::Read,
            "write" | "push" => Self::Write,
            "maintain" => Self::Maintain,
            "admin" => Self::Admin,
            _ => Self::None,
        }
    }

    /// Returns the canonical name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }

    /// Returns the legacy wire name (`pull`/`push`) used by collaborator
    /// mutation endpoints.
    #[must_use]
    pub const fn as_wire_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "pull",
            Self::Write => "push",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for PermissionLevel {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
