//! Repository type.

use serde::{Deserialize, Serialize};

/// A repository inside the organization, sourced live per session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name, unique within the organization.
    pub name: String,
    /// Whether the repository is archived. Archived repositories are never
    /// mutated.
    #[serde(default)]
    pub archived: bool,
}

impl Repository {
    /// Creates an active repository.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archived: false,
        }
    }

    /// Creates an archived repository.
    #[must_use]
    pub fn archived(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archived: true,
        }
    }
}
