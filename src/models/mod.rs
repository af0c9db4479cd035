//! Domain types for collaborators, repositories, and permission grants.

mod collaborator;
mod grant;
mod permission;
mod repository;

pub use collaborator::{Collaborator, CollaboratorScope, MembershipClass};
pub use grant::{DowngradeOutcome, DowngradeResult, PermissionGrant};
pub use permission::PermissionLevel;
pub use repository::Repository;
