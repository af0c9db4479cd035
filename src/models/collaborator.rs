//! Collaborator types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a collaborator is attached to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipClass {
    /// A full organization member.
    Member,
    /// A user granted repository access without being a member.
    Outside,
}

impl fmt::Display for MembershipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Outside => write!(f, "outside"),
        }
    }
}

/// A user with access to the organization, sourced live per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collaborator {
    /// Unique handle within the hosting provider.
    pub login: String,
    /// Membership class.
    pub membership: MembershipClass,
}

impl Collaborator {
    /// Creates an organization member.
    #[must_use]
    pub fn member(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            membership: MembershipClass::Member,
        }
    }

    /// Creates an outside collaborator.
    #[must_use]
    pub fn outside(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            membership: MembershipClass::Outside,
        }
    }
}

/// Which collaborators a session operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollaboratorScope {
    /// Organization members only.
    Members,
    /// Outside collaborators only.
    #[default]
    Outside,
    /// Members and outside collaborators.
    All,
}

impl CollaboratorScope {
    /// Parses a scope string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "members" | "member" => Self::Members,
            "all" | "both" => Self::All,
            _ => Self::Outside,
        }
    }

    /// Returns true if the scope covers the given membership class.
    #[must_use]
    pub const fn covers(self, membership: MembershipClass) -> bool {
        match self {
            Self::Members => matches!(membership, MembershipClass::Member),
            Self::Outside => matches!(membership, MembershipClass::Outside),
            Self::All => true,
        }
    }
}
