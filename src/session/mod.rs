//! Interactive session controller.
//!
//! Drives one audit-and-downgrade cycle per prompt iteration:
//!
//! `Start → ListCollaborators → AwaitUsernameInput → ResolveUser →
//! AuditPermissions → AwaitConfirmation → ApplyDowngrade → OfferLogUpdate →
//! AwaitUsernameInput | Exit`
//!
//! The controller is generic over its console handles so the tests can
//! script a full session. All state beyond the read-only roster snapshot
//! lives on the stack of [`SessionController::run`]; the loop is explicit
//! and unbounded, exited only by the `exit` command or end of input.

use crate::directory::DirectoryClient;
use crate::services::{AuditOptions, DowngradeEngine, PermissionAuditor, RosterSnapshot};
use crate::storage::CollaboratorLog;
use crate::{Error, Result};
use std::io::{BufRead, Write};
use tracing::info;

/// The command that terminates a session.
const EXIT_COMMAND: &str = "exit";

/// Interactive controller over a session-scoped roster snapshot.
pub struct SessionController<'a, D: DirectoryClient + ?Sized> {
    /// The directory client.
    client: &'a D,
    /// The roster snapshot, fetched once before the loop.
    roster: RosterSnapshot,
    /// The collaborator log.
    log: CollaboratorLog,
    /// Audit filters.
    options: AuditOptions,
}

impl<'a, D: DirectoryClient + ?Sized> SessionController<'a, D> {
    /// Creates a controller over an already-fetched roster.
    #[must_use]
    pub const fn new(
        client: &'a D,
        roster: RosterSnapshot,
        log: CollaboratorLog,
        options: AuditOptions,
    ) -> Self {
        Self {
            client,
            roster,
            log,
            options,
        }
    }

    /// Runs the interactive loop until `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the console handles fail or the collaborator
    /// log cannot be read. Per-repository audit and downgrade failures are
    /// reported inline and never abort the session.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> Result<()> {
        self.list_collaborators(output)?;

        loop {
            wout(output, "")?;
            wout(
                output,
                &format!("Enter a login to audit (or '{EXIT_COMMAND}' to quit):"),
            )?;

            let Some(line) = read_line(input)? else {
                // End of input is a graceful exit.
                return Ok(());
            };
            let login = line.trim();

            if login.is_empty() {
                // Re-prompt; an empty login never terminates the session.
                continue;
            }
            if login.eq_ignore_ascii_case(EXIT_COMMAND) {
                info!("session ended by operator");
                return Ok(());
            }

            let collaborator = match self.roster.resolve(login) {
                Ok(collaborator) => collaborator,
                // Recoverable: report and return to the prompt.
                Err(e @ Error::UserNotFound(_)) => {
                    wout(output, &e.to_string())?;
                    continue;
                },
                Err(e) => return Err(e),
            };
            let login = collaborator.login.clone();

            let report = self.audit(&login, input, output)?;
            let Some(report) = report else {
                continue;
            };

            if !report.above_target.is_empty() {
                let engine = DowngradeEngine::new(self.client);
                let results =
                    engine.downgrade(&login, &report.above_target, self.options.target)?;

                wout(output, "Downgrade results:")?;
                for result in &results {
                    wout(output, &format!(" - {result}"))?;
                }
            }

            self.offer_log_update(&login, input, output)?;
        }
    }

    /// Prints the roster, marking the operator and newcomers.
    fn list_collaborators<W: Write>(&self, output: &mut W) -> Result<()> {
        let seen = self.log.load()?;

        wout(
            output,
            &format!("Collaborators ({}):", self.roster.collaborators.len()),
        )?;
        for collaborator in &self.roster.collaborators {
            let you = if collaborator.login == self.roster.viewer {
                " (You)"
            } else {
                ""
            };
            let new = if seen.contains(&collaborator.login) {
                ""
            } else {
                " [new]"
            };
            wout(
                output,
                &format!(
                    " - {} ({}){you}{new}",
                    collaborator.login, collaborator.membership
                ),
            )?;
        }
        Ok(())
    }

    /// Audits a user, prints both partitions, and asks for confirmation.
    ///
    /// Returns `None` when the operator declines or there is nothing to do,
    /// handing control back to the prompt loop.
    fn audit<R: BufRead, W: Write>(
        &self,
        login: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<crate::services::AuditReport>> {
        wout(
            output,
            &format!(
                "Auditing permissions for '{login}' across {} repositories; this may take a while...",
                self.roster.repositories.len()
            ),
        )?;

        let auditor = PermissionAuditor::new(self.client);
        let report = auditor.audit(login, &self.roster.repositories, &self.options)?;

        if !report.skipped.is_empty() {
            wout(
                output,
                &format!("Skipped {} repositories (access errors):", report.skipped.len()),
            )?;
            for repo in &report.skipped {
                wout(output, &format!(" - {repo}"))?;
            }
        }

        if self.options.include_at_target {
            wout(
                output,
                &format!("At or below '{}' ({}):", self.options.target, report.at_target.len()),
            )?;
            for grant in &report.at_target {
                wout(output, &format!(" - {grant}"))?;
            }
        }

        wout(
            output,
            &format!("Above '{}' ({}):", self.options.target, report.above_target.len()),
        )?;
        for grant in &report.above_target {
            wout(output, &format!(" - {grant}"))?;
        }

        if report.is_clean() {
            wout(output, "Nothing to downgrade.")?;
            return Ok(Some(report));
        }

        wout(
            output,
            &format!(
                "Downgrade {} grant(s) to '{}'? [y/N]",
                report.above_target.len(),
                self.options.target
            ),
        )?;
        let Some(answer) = read_line(input)? else {
            return Ok(None);
        };
        if is_affirmative(&answer) {
            Ok(Some(report))
        } else {
            wout(output, "No changes made.")?;
            Ok(None)
        }
    }

    /// Offers to record an unlogged collaborator.
    fn offer_log_update<R: BufRead, W: Write>(
        &self,
        login: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        if self.log.contains(login)? {
            return Ok(());
        }

        wout(
            output,
            &format!("'{login}' is not in the collaborator log. Record them? [y/N]"),
        )?;
        let Some(answer) = read_line(input)? else {
            return Ok(());
        };
        if is_affirmative(&answer) {
            self.log.append(login)?;
            wout(output, &format!("Recorded '{login}'."))?;
        }
        Ok(())
    }
}

/// Reads one line; `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(|e| Error::OperationFailed {
        operation: "read_input".to_string(),
        cause: e.to_string(),
    })?;
    if read == 0 { Ok(None) } else { Ok(Some(line)) }
}

/// Case-insensitive `yes`/`y`; anything else declines.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Writes one console line.
fn wout<W: Write>(output: &mut W, line: &str) -> Result<()> {
    writeln!(output, "{line}").map_err(|e| Error::OperationFailed {
        operation: "write_output".to_string(),
        cause: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::InMemoryDirectory;
    use crate::models::{CollaboratorScope, PermissionLevel, Repository};
    use std::io::Cursor;

    fn controller_fixture(
        dir: &InMemoryDirectory,
    ) -> (SessionController<'_, InMemoryDirectory>, tempfile::TempDir) {
        let roster = RosterSnapshot::fetch(dir, CollaboratorScope::All).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let log = CollaboratorLog::new(tmp.path().join("seen.log"));
        (
            SessionController::new(dir, roster, log, AuditOptions::default()),
            tmp,
        )
    }

    fn run_session(
        controller: &SessionController<'_, InMemoryDirectory>,
        script: &str,
    ) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        controller.run(&mut input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new("admin")
            .with_member("admin")
            .with_outside("bob")
            .with_repo(Repository::new("repo1"))
            .with_repo(Repository::new("repo2"))
            .with_grant("repo1", "bob", PermissionLevel::Write)
            .with_grant("repo2", "bob", PermissionLevel::Read)
    }

    #[test]
    fn test_exit_command_terminates() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "exit\n");
        assert!(out.contains("Collaborators (2):"));
        assert!(out.contains("admin (member) (You)"));
        assert_eq!(dir.mutation_count(), 0);
    }

    #[test]
    fn test_empty_input_reprompts_without_terminating() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "\n\n\nexit\n");
        // One prompt per blank line plus the final one.
        assert_eq!(out.matches("Enter a login to audit").count(), 4);
        assert_eq!(dir.mutation_count(), 0);
    }

    #[test]
    fn test_unknown_user_reports_and_reprompts() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "mallory\nexit\n");
        assert!(out.contains("user 'mallory' not found in the organization roster"));
        assert_eq!(dir.mutation_count(), 0);
    }

    #[test]
    fn test_decline_leaves_grants_unchanged() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "bob\nno\nexit\n");
        assert!(out.contains("repo1: write"));
        assert!(out.contains("No changes made."));
        assert_eq!(dir.mutation_count(), 0);
        assert_eq!(
            dir.collaborator_permission("repo1", "bob").unwrap(),
            PermissionLevel::Write
        );
    }

    #[test]
    fn test_confirmed_downgrade_applies_and_offers_log_entry() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "bob\nyes\ny\nexit\n");

        assert!(out.contains("repo1: applied"));
        assert!(out.contains("Recorded 'bob'."));
        assert_eq!(
            dir.collaborator_permission("repo1", "bob").unwrap(),
            PermissionLevel::Read
        );
        // repo2 was already at target and never fed to the engine.
        assert_eq!(dir.mutation_count(), 2);
        assert!(controller.log.contains("bob").unwrap());
    }

    #[test]
    fn test_log_offer_declined_leaves_log_empty() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        run_session(&controller, "bob\ny\nn\nexit\n");
        assert!(!controller.log.contains("bob").unwrap());
    }

    #[test]
    fn test_end_of_input_is_graceful_exit() {
        let dir = directory();
        let (controller, _tmp) = controller_fixture(&dir);
        let out = run_session(&controller, "");
        assert!(out.contains("Collaborators"));
    }

    #[test]
    fn test_clean_user_skips_confirmation() {
        let dir = InMemoryDirectory::new("admin")
            .with_outside("carol")
            .with_repo(Repository::new("repo1"))
            .with_grant("repo1", "carol", PermissionLevel::Read);
        let (controller, _tmp) = controller_fixture(&dir);
        // The "n" answers the log offer; no downgrade confirmation is asked.
        let out = run_session(&controller, "carol\nn\nexit\n");
        assert!(out.contains("Nothing to downgrade."));
        assert_eq!(dir.mutation_count(), 0);
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Yes\n"));
        assert!(is_affirmative("  YES  "));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yep"));
    }
}
