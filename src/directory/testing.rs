//! In-memory directory client for tests.
//!
//! Backs the unit and integration suites with a scriptable fake: grants
//! live in a mutex-guarded map, and individual repositories can be made to
//! fail their permission query, their remove step, or their add step so
//! error isolation and partial-mutation handling can be exercised.

use super::DirectoryClient;
use crate::models::{Collaborator, PermissionLevel, Repository};
use crate::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A recorded mutation, for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A collaborator was removed from a repository.
    Remove {
        /// Repository name.
        repo: String,
        /// Collaborator login.
        user: String,
    },
    /// A collaborator was added to a repository.
    Add {
        /// Repository name.
        repo: String,
        /// Collaborator login.
        user: String,
        /// Granted level.
        level: PermissionLevel,
    },
}

/// Scriptable in-memory [`DirectoryClient`].
#[derive(Default)]
pub struct InMemoryDirectory {
    /// Organization members.
    pub members: Vec<Collaborator>,
    /// Outside collaborators.
    pub outside: Vec<Collaborator>,
    /// Repositories.
    pub repos: Vec<Repository>,
    /// The authenticated user's login.
    pub viewer: String,
    /// Effective permissions keyed by (repo, user).
    grants: Mutex<HashMap<(String, String), PermissionLevel>>,
    /// Repositories whose permission query fails.
    fail_permission: HashSet<String>,
    /// Repositories whose remove step fails.
    fail_remove: HashSet<String>,
    /// Repositories whose add step fails (partial mutation).
    fail_add: HashSet<String>,
    /// Recorded mutations in call order.
    mutations: Mutex<Vec<Mutation>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory with the given authenticated user.
    #[must_use]
    pub fn new(viewer: impl Into<String>) -> Self {
        Self {
            viewer: viewer.into(),
            ..Self::default()
        }
    }

    /// Adds an organization member.
    #[must_use]
    pub fn with_member(mut self, login: &str) -> Self {
        self.members.push(Collaborator::member(login));
        self
    }

    /// Adds an outside collaborator.
    #[must_use]
    pub fn with_outside(mut self, login: &str) -> Self {
        self.outside.push(Collaborator::outside(login));
        self
    }

    /// Adds a repository.
    #[must_use]
    pub fn with_repo(mut self, repo: Repository) -> Self {
        self.repos.push(repo);
        self
    }

    /// Sets a user's permission on a repository.
    #[must_use]
    pub fn with_grant(self, repo: &str, user: &str, level: PermissionLevel) -> Self {
        self.set_grant(repo, user, level);
        self
    }

    /// Makes a repository's permission query fail.
    #[must_use]
    pub fn with_failing_permission(mut self, repo: &str) -> Self {
        self.fail_permission.insert(repo.to_string());
        self
    }

    /// Makes a repository's remove step fail.
    #[must_use]
    pub fn with_failing_remove(mut self, repo: &str) -> Self {
        self.fail_remove.insert(repo.to_string());
        self
    }

    /// Makes a repository's add step fail, producing a partial mutation.
    #[must_use]
    pub fn with_failing_add(mut self, repo: &str) -> Self {
        self.fail_add.insert(repo.to_string());
        self
    }

    /// Sets a grant outside the builder chain.
    pub fn set_grant(&self, repo: &str, user: &str, level: PermissionLevel) {
        self.grants
            .lock()
            .expect("grants lock")
            .insert((repo.to_string(), user.to_string()), level);
    }

    /// Returns the recorded mutations in call order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().expect("mutations lock").clone()
    }

    /// Returns the number of recorded mutations.
    pub fn mutation_count(&self) -> usize {
        self.mutations.lock().expect("mutations lock").len()
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn organization_members(&self) -> Result<Vec<Collaborator>> {
        Ok(self.members.clone())
    }

    fn outside_collaborators(&self) -> Result<Vec<Collaborator>> {
        Ok(self.outside.clone())
    }

    fn repositories(&self) -> Result<Vec<Repository>> {
        Ok(self.repos.clone())
    }

    fn collaborator_permission(&self, repo: &str, user: &str) -> Result<PermissionLevel> {
        if self.fail_permission.contains(repo) {
            return Err(Error::RepositoryAccess {
                repo: repo.to_string(),
                cause: "permission query denied".to_string(),
            });
        }
        let grants = self.grants.lock().expect("grants lock");
        Ok(grants
            .get(&(repo.to_string(), user.to_string()))
            .copied()
            .unwrap_or(PermissionLevel::None))
    }

    fn remove_collaborator(&self, repo: &str, user: &str) -> Result<()> {
        if self.fail_remove.contains(repo) {
            return Err(Error::RepositoryAccess {
                repo: repo.to_string(),
                cause: "remove denied".to_string(),
            });
        }
        self.grants
            .lock()
            .expect("grants lock")
            .remove(&(repo.to_string(), user.to_string()));
        self.mutations
            .lock()
            .expect("mutations lock")
            .push(Mutation::Remove {
                repo: repo.to_string(),
                user: user.to_string(),
            });
        Ok(())
    }

    fn add_collaborator(&self, repo: &str, user: &str, level: PermissionLevel) -> Result<()> {
        if self.fail_add.contains(repo) {
            return Err(Error::RepositoryAccess {
                repo: repo.to_string(),
                cause: "add denied".to_string(),
            });
        }
        self.set_grant(repo, user, level);
        self.mutations
            .lock()
            .expect("mutations lock")
            .push(Mutation::Add {
                repo: repo.to_string(),
                user: user.to_string(),
                level,
            });
        Ok(())
    }

    fn authenticated_user(&self) -> Result<String> {
        Ok(self.viewer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants_default_to_none() {
        let dir = InMemoryDirectory::new("admin");
        assert_eq!(
            dir.collaborator_permission("app", "bob").unwrap(),
            PermissionLevel::None
        );
    }

    #[test]
    fn test_remove_then_add_updates_grant() {
        let dir = InMemoryDirectory::new("admin").with_grant("app", "bob", PermissionLevel::Admin);

        dir.remove_collaborator("app", "bob").unwrap();
        assert_eq!(
            dir.collaborator_permission("app", "bob").unwrap(),
            PermissionLevel::None
        );

        dir.add_collaborator("app", "bob", PermissionLevel::Read)
            .unwrap();
        assert_eq!(
            dir.collaborator_permission("app", "bob").unwrap(),
            PermissionLevel::Read
        );
        assert_eq!(dir.mutation_count(), 2);
    }

    #[test]
    fn test_fault_injection() {
        let dir = InMemoryDirectory::new("admin")
            .with_failing_permission("broken")
            .with_failing_add("half");

        assert!(dir.collaborator_permission("broken", "bob").is_err());
        assert!(dir.remove_collaborator("half", "bob").is_ok());
        assert!(dir.add_collaborator("half", "bob", PermissionLevel::Read).is_err());
    }
}
