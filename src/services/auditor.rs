//! Permission auditor.
//!
//! Classifies a user's repositories by effective permission and archival
//! status, producing the partitions the downgrade engine and the session
//! controller work from.

use crate::Result;
use crate::directory::DirectoryClient;
use crate::models::{PermissionGrant, PermissionLevel, Repository};
use std::time::Instant;
use tracing::{instrument, warn};

/// Filters controlling an audit.
#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    /// The level grants are compared against.
    pub target: PermissionLevel,
    /// Whether at-or-below-target grants are kept in the report.
    pub include_at_target: bool,
    /// Whether archived repositories are kept in either partition.
    pub include_archived: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            target: PermissionLevel::Read,
            include_at_target: true,
            include_archived: false,
        }
    }
}

/// The result of an audit: two disjoint partitions of a user's grants.
///
/// The union of the partitions is exactly the set of repositories where the
/// user holds a non-`none` permission and which passed the archived filter.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Grants at or below the target level.
    pub at_target: Vec<PermissionGrant>,
    /// Grants above the target level; downgrade candidates.
    pub above_target: Vec<PermissionGrant>,
    /// Repositories whose permission query failed and were skipped.
    pub skipped: Vec<String>,
}

impl AuditReport {
    /// Returns the total number of audited grants.
    #[must_use]
    pub const fn grant_count(&self) -> usize {
        self.at_target.len() + self.above_target.len()
    }

    /// Returns true if the user has nothing above the target level.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.above_target.is_empty()
    }
}

/// Service that audits a user's permissions across a repository set.
pub struct PermissionAuditor<'a, D: DirectoryClient + ?Sized> {
    /// The directory client.
    client: &'a D,
}

impl<'a, D: DirectoryClient + ?Sized> PermissionAuditor<'a, D> {
    /// Creates a new auditor over a directory client.
    #[must_use]
    pub const fn new(client: &'a D) -> Self {
        Self { client }
    }

    /// Audits a user's permission on every repository in the set.
    ///
    /// Repositories where the user has no grant are excluded entirely.
    /// A failed permission query is logged and the repository skipped; one
    /// bad repository never aborts the audit of the rest.
    ///
    /// # Errors
    ///
    /// Currently infallible beyond the `Result` contract: per-repository
    /// failures are absorbed into [`AuditReport::skipped`].
    #[instrument(skip(self, repositories), fields(operation = "audit", user = user))]
    pub fn audit(
        &self,
        user: &str,
        repositories: &[Repository],
        options: &AuditOptions,
    ) -> Result<AuditReport> {
        let start = Instant::now();
        let mut report = AuditReport::default();

        for repo in repositories {
            if repo.archived && !options.include_archived {
                continue;
            }

            let permission = match self.client.collaborator_permission(&repo.name, user) {
                Ok(permission) => permission,
                Err(e) => {
                    warn!(repo = %repo.name, "permission query failed: {e}");
                    report.skipped.push(repo.name.clone());
                    continue;
                },
            };

            if permission == PermissionLevel::None {
                continue;
            }

            let grant = PermissionGrant::new(repo.clone(), permission);
            if permission <= options.target {
                if options.include_at_target {
                    report.at_target.push(grant);
                }
            } else {
                report.above_target.push(grant);
            }
        }

        metrics::counter!("permission_audit_total", "status" => "success").increment(1);
        metrics::histogram!("permission_audit_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(report)
    }
}
