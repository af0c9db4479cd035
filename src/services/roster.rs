//! Session roster snapshot.

use crate::directory::DirectoryClient;
use crate::models::{Collaborator, CollaboratorScope, MembershipClass, Repository};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::instrument;

/// Collaborator and repository roster fetched once per session.
///
/// Read-only after creation. The snapshot may be stale relative to
/// concurrent external changes; staleness surfaces only as per-repository
/// errors during a later audit or downgrade.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    /// Collaborators within the session's scope.
    pub collaborators: Vec<Collaborator>,
    /// All repositories in the organization.
    pub repositories: Vec<Repository>,
    /// The authenticated operator's login.
    pub viewer: String,
}

impl RosterSnapshot {
    /// Fetches the roster for the given scope.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the list calls fail; a session cannot
    /// start without a roster.
    #[instrument(skip(client), fields(operation = "roster.fetch"))]
    pub fn fetch<D: DirectoryClient + ?Sized>(
        client: &D,
        scope: CollaboratorScope,
    ) -> Result<Self> {
        let mut collaborators = Vec::new();
        if scope.covers(MembershipClass::Member) {
            collaborators.extend(client.organization_members()?);
        }
        if scope.covers(MembershipClass::Outside) {
            collaborators.extend(client.outside_collaborators()?);
        }

        Ok(Self {
            collaborators,
            repositories: client.repositories()?,
            viewer: client.authenticated_user()?,
        })
    }

    /// Resolves a login against the roster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if the login is absent; callers
    /// treat this as recoverable and re-prompt.
    pub fn resolve(&self, login: &str) -> Result<&Collaborator> {
        self.collaborators
            .iter()
            .find(|c| c.login == login)
            .ok_or_else(|| Error::UserNotFound(login.to_string()))
    }

    /// Returns collaborators absent from the previously-seen set.
    #[must_use]
    pub fn new_since(&self, seen: &HashSet<String>) -> Vec<&Collaborator> {
        self.collaborators
            .iter()
            .filter(|c| !seen.contains(&c.login))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::InMemoryDirectory;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new("admin")
            .with_member("alice")
            .with_member("admin")
            .with_outside("bob")
            .with_outside("carol")
            .with_repo(Repository::new("app"))
    }

    #[test]
    fn test_scope_selects_collaborators() {
        let dir = directory();

        let members = RosterSnapshot::fetch(&dir, CollaboratorScope::Members).unwrap();
        assert_eq!(members.collaborators.len(), 2);

        let outside = RosterSnapshot::fetch(&dir, CollaboratorScope::Outside).unwrap();
        assert_eq!(outside.collaborators.len(), 2);
        assert!(outside.resolve("bob").is_ok());
        assert!(outside.resolve("alice").is_err());

        let all = RosterSnapshot::fetch(&dir, CollaboratorScope::All).unwrap();
        assert_eq!(all.collaborators.len(), 4);
        assert_eq!(all.viewer, "admin");
    }

    #[test]
    fn test_new_since_subtracts_seen_set() {
        let dir = InMemoryDirectory::new("admin")
            .with_outside("a")
            .with_outside("b")
            .with_outside("c");
        let roster = RosterSnapshot::fetch(&dir, CollaboratorScope::Outside).unwrap();

        let seen: HashSet<String> = ["a".to_string()].into_iter().collect();
        let new: Vec<_> = roster
            .new_since(&seen)
            .into_iter()
            .map(|c| c.login.as_str())
            .collect();

        assert_eq!(new, vec!["b", "c"]);
    }

    #[test]
    fn test_resolve_unknown_login_is_user_not_found() {
        let dir = directory();
        let roster = RosterSnapshot::fetch(&dir, CollaboratorScope::All).unwrap();

        match roster.resolve("mallory") {
            Err(Error::UserNotFound(login)) => assert_eq!(login, "mallory"),
            other => panic!("expected UserNotFound, got {other:?}"),
        }
    }
}
