//! The directory client seam.
//!
//! The hosting provider's API is an external collaborator: this crate only
//! defines the operations it needs from it. [`GithubDirectory`] is the
//! production adapter; [`testing::InMemoryDirectory`] backs the test suites.

mod github;
pub mod testing;

pub use github::GithubDirectory;

use crate::Result;
use crate::models::{Collaborator, PermissionLevel, Repository};

/// Operations permaudit requires from the hosting provider.
///
/// Every call is a blocking remote request. Implementations are not expected
/// to retry, paginate beyond their own needs, or handle rate limits — those
/// concerns belong to the provider client, not this crate.
pub trait DirectoryClient: Send + Sync {
    /// Lists the organization's members.
    fn organization_members(&self) -> Result<Vec<Collaborator>>;

    /// Lists the organization's outside collaborators.
    fn outside_collaborators(&self) -> Result<Vec<Collaborator>>;

    /// Lists the organization's repositories.
    fn repositories(&self) -> Result<Vec<Repository>>;

    /// Returns the user's effective permission on a repository.
    fn collaborator_permission(&self, repo: &str, user: &str) -> Result<PermissionLevel>;

    /// Removes a collaborator from a repository.
    fn remove_collaborator(&self, repo: &str, user: &str) -> Result<()>;

    /// Adds a collaborator to a repository at the given level.
    ///
    /// Together with [`DirectoryClient::remove_collaborator`] this is the
    /// only way to change a permission: the provider offers no atomic
    /// "set permission" primitive.
    fn add_collaborator(&self, repo: &str, user: &str, level: PermissionLevel) -> Result<()>;

    /// Returns the login of the authenticated user.
    fn authenticated_user(&self) -> Result<String>;
}
