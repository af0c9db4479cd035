//! Downgrade engine.
//!
//! Applies a target permission level to a user's excessive grants. The
//! provider offers no atomic "set permission" primitive, so a downgrade is
//! a remove followed by a re-add at the new level. The two calls are issued
//! back to back to keep the no-access window as small as possible, but a
//! fault between them leaves the user with zero access; that case is
//! reported as a first-class failure, never suppressed or rolled back.

use crate::directory::DirectoryClient;
use crate::models::{DowngradeOutcome, DowngradeResult, PermissionGrant, PermissionLevel};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{error, info, instrument};

/// Service that downgrades a user's grants to a target level.
pub struct DowngradeEngine<'a, D: DirectoryClient + ?Sized> {
    /// The directory client.
    client: &'a D,
}

impl<'a, D: DirectoryClient + ?Sized> DowngradeEngine<'a, D> {
    /// Creates a new engine over a directory client.
    #[must_use]
    pub const fn new(client: &'a D) -> Self {
        Self { client }
    }

    /// Downgrades every grant in the batch to the target level.
    ///
    /// Archived repositories and grants already at the target are never
    /// mutated. Each attempt is independent: a failure on one repository
    /// never prevents attempts on the rest. One log line is emitted per
    /// attempt so outcomes survive the interactive session.
    ///
    /// # Errors
    ///
    /// Currently infallible beyond the `Result` contract: per-repository
    /// failures are carried in the returned results.
    #[instrument(skip(self, grants), fields(operation = "downgrade", user = user))]
    pub fn downgrade(
        &self,
        user: &str,
        grants: &[PermissionGrant],
        target: PermissionLevel,
    ) -> Result<Vec<DowngradeResult>> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(grants.len());

        for grant in grants {
            let outcome = self.downgrade_one(user, grant, target);
            results.push(DowngradeResult::new(grant.repository.name.clone(), outcome));
        }

        let applied = results.iter().filter(|r| r.outcome.is_applied()).count();
        metrics::counter!("permission_downgrade_batch_total").increment(1);
        metrics::histogram!("permission_downgrade_batch_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);
        info!(
            user,
            attempted = grants.len(),
            applied,
            "downgrade batch finished"
        );

        Ok(results)
    }

    /// Attempts a single downgrade.
    fn downgrade_one(
        &self,
        user: &str,
        grant: &PermissionGrant,
        target: PermissionLevel,
    ) -> DowngradeOutcome {
        let repo = &grant.repository.name;

        if grant.repository.archived {
            info!(user, repo = %repo, "skipped: repository is archived");
            Self::count_attempt("skipped_archived");
            return DowngradeOutcome::SkippedArchived;
        }

        if grant.permission == target {
            info!(user, repo = %repo, "skipped: already at target level");
            Self::count_attempt("skipped_at_target");
            return DowngradeOutcome::SkippedAtTarget;
        }

        if let Err(e) = self.client.remove_collaborator(repo, user) {
            error!(user, repo = %repo, "downgrade failed before removal: {e}");
            Self::count_attempt("failed");
            return DowngradeOutcome::Failed(e.to_string());
        }

        // The user has no access from here until the re-add lands.
        if let Err(e) = self.client.add_collaborator(repo, user, target) {
            let partial = Error::PartialMutation {
                repo: repo.clone(),
                user: user.to_string(),
                cause: e.to_string(),
            };
            error!(user, repo = %repo, "{partial}");
            Self::count_attempt("partial_mutation");
            return DowngradeOutcome::Failed(partial.to_string());
        }

        info!(user, repo = %repo, from = %grant.permission, to = %target, "downgrade applied");
        Self::count_attempt("applied");
        DowngradeOutcome::Applied
    }

    fn count_attempt(status: &'static str) {
        metrics::counter!("permission_downgrade_total", "status" => status).increment(1);
    }
}
