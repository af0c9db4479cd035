//! Roster listing command.

use crate::Result;
use crate::config::AuditConfig;
use crate::directory::GithubDirectory;
use crate::services::RosterSnapshot;
use crate::storage::CollaboratorLog;

/// Prints the collaborator roster, or only collaborators absent from the
/// collaborator log when `new_only` is set.
///
/// # Errors
///
/// Returns an error if the roster or the collaborator log cannot be read.
pub fn cmd_roster(config: &AuditConfig, new_only: bool) -> Result<()> {
    let client = GithubDirectory::new(config);
    let roster = RosterSnapshot::fetch(&client, config.scope)?;
    let seen = CollaboratorLog::new(&config.collaborator_log).load()?;

    if new_only {
        let newcomers = roster.new_since(&seen);
        println!("New collaborators since last log update ({}):", newcomers.len());
        for collaborator in newcomers {
            println!(" - {} ({})", collaborator.login, collaborator.membership);
        }
        return Ok(());
    }

    println!("Collaborators ({}):", roster.collaborators.len());
    for collaborator in &roster.collaborators {
        let you = if collaborator.login == roster.viewer {
            " (You)"
        } else {
            ""
        };
        let new = if seen.contains(&collaborator.login) {
            ""
        } else {
            " [new]"
        };
        println!(" - {} ({}){you}{new}", collaborator.login, collaborator.membership);
    }
    Ok(())
}
