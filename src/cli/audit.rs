//! Interactive audit session command.

use crate::Result;
use crate::config::AuditConfig;
use crate::directory::GithubDirectory;
use crate::services::{AuditOptions, RosterSnapshot};
use crate::session::SessionController;
use crate::storage::CollaboratorLog;

/// Runs an interactive audit-and-downgrade session on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the roster cannot be fetched or the console fails.
pub fn cmd_audit(config: &AuditConfig) -> Result<()> {
    let client = GithubDirectory::new(config);
    let roster = RosterSnapshot::fetch(&client, config.scope)?;

    println!(
        "Organization '{}': {} collaborators, {} repositories.",
        config.org,
        roster.collaborators.len(),
        roster.repositories.len()
    );

    let controller = SessionController::new(
        &client,
        roster,
        CollaboratorLog::new(&config.collaborator_log),
        AuditOptions {
            target: config.target,
            include_at_target: config.include_at_target,
            include_archived: config.include_archived,
        },
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    controller.run(&mut input, &mut output)
}
