//! End-to-end interactive session flows against the in-memory directory.
#![allow(clippy::panic, clippy::too_many_lines, clippy::uninlined_format_args)]

use permaudit::directory::testing::{InMemoryDirectory, Mutation};
use permaudit::models::{CollaboratorScope, PermissionLevel, Repository};
use permaudit::services::{AuditOptions, RosterSnapshot};
use permaudit::storage::CollaboratorLog;
use permaudit::{DirectoryClient, Error, SessionController};
use std::io::Cursor;

/// Runs a scripted session and returns the console transcript.
fn run_scripted(
    dir: &InMemoryDirectory,
    log: &std::path::Path,
    options: AuditOptions,
    scope: CollaboratorScope,
    script: &str,
) -> String {
    let roster = RosterSnapshot::fetch(dir, scope).expect("roster fetch");
    let controller = SessionController::new(dir, roster, CollaboratorLog::new(log), options);

    let mut input = Cursor::new(script.to_string());
    let mut output = Vec::new();
    controller
        .run(&mut input, &mut output)
        .expect("session run");
    String::from_utf8(output).expect("utf8 transcript")
}

fn org_directory() -> InMemoryDirectory {
    InMemoryDirectory::new("admin")
        .with_member("admin")
        .with_member("alice")
        .with_outside("bob")
        .with_outside("carol")
        .with_repo(Repository::new("repo1"))
        .with_repo(Repository::new("repo2"))
        .with_repo(Repository::archived("repo3"))
        .with_grant("repo1", "bob", PermissionLevel::Write)
        .with_grant("repo2", "bob", PermissionLevel::Read)
        .with_grant("repo3", "bob", PermissionLevel::Admin)
}

#[test]
fn full_downgrade_cycle_applies_only_excessive_grants() {
    let dir = org_directory();
    let tmp = tempfile::tempdir().unwrap();
    let log_path = tmp.path().join("seen.log");

    let transcript = run_scripted(
        &dir,
        &log_path,
        AuditOptions::default(),
        CollaboratorScope::All,
        "bob\nyes\ny\nexit\n",
    );

    // The audit displayed both partitions before asking.
    assert!(transcript.contains("repo2: read"));
    assert!(transcript.contains("repo1: write"));
    // repo3 is archived and was filtered out entirely by default.
    assert!(!transcript.contains("repo3"));

    // Only repo1 was mutated, as a remove-then-add pair.
    assert_eq!(
        dir.mutations(),
        vec![
            Mutation::Remove {
                repo: "repo1".to_string(),
                user: "bob".to_string()
            },
            Mutation::Add {
                repo: "repo1".to_string(),
                user: "bob".to_string(),
                level: PermissionLevel::Read
            },
        ]
    );
    assert_eq!(
        dir.collaborator_permission("repo1", "bob").unwrap(),
        PermissionLevel::Read
    );
    assert_eq!(
        dir.collaborator_permission("repo3", "bob").unwrap(),
        PermissionLevel::Admin
    );

    // The log offer was accepted.
    let log = CollaboratorLog::new(&log_path);
    assert!(log.contains("bob").unwrap());
}

#[test]
fn archived_repository_included_but_never_mutated() {
    let dir = org_directory();
    let tmp = tempfile::tempdir().unwrap();

    let options = AuditOptions {
        include_archived: true,
        ..AuditOptions::default()
    };
    let transcript = run_scripted(
        &dir,
        &tmp.path().join("seen.log"),
        options,
        CollaboratorScope::Outside,
        "bob\nyes\nn\nexit\n",
    );

    assert!(transcript.contains("repo3 (archived): admin"));
    assert!(transcript.contains("repo3: skipped (archived)"));
    // Still only repo1's pair of mutations.
    assert_eq!(dir.mutation_count(), 2);
    assert_eq!(
        dir.collaborator_permission("repo3", "bob").unwrap(),
        PermissionLevel::Admin
    );
}

#[test]
fn declined_confirmation_changes_nothing() {
    let dir = org_directory();
    let tmp = tempfile::tempdir().unwrap();

    let transcript = run_scripted(
        &dir,
        &tmp.path().join("seen.log"),
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "bob\nnope\nexit\n",
    );

    assert!(transcript.contains("No changes made."));
    assert_eq!(dir.mutation_count(), 0);
    assert_eq!(
        dir.collaborator_permission("repo1", "bob").unwrap(),
        PermissionLevel::Write
    );
}

#[test]
fn empty_and_unknown_input_keep_the_loop_alive() {
    let dir = org_directory();
    let tmp = tempfile::tempdir().unwrap();

    let transcript = run_scripted(
        &dir,
        &tmp.path().join("seen.log"),
        AuditOptions::default(),
        CollaboratorScope::All,
        "\nmallory\n\nexit\n",
    );

    assert!(transcript.contains("user 'mallory' not found in the organization roster"));
    // Four prompts: initial, after blank, after mallory, after second blank.
    assert_eq!(transcript.matches("Enter a login to audit").count(), 4);
    assert_eq!(dir.mutation_count(), 0);
}

#[test]
fn newcomers_are_marked_against_the_collaborator_log() {
    let dir = InMemoryDirectory::new("admin")
        .with_outside("a")
        .with_outside("b")
        .with_outside("c");
    let tmp = tempfile::tempdir().unwrap();
    let log_path = tmp.path().join("seen.log");
    CollaboratorLog::new(&log_path).append("a").unwrap();

    let transcript = run_scripted(
        &dir,
        &log_path,
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "exit\n",
    );

    assert!(transcript.contains(" - a (outside)\n"));
    assert!(transcript.contains(" - b (outside) [new]"));
    assert!(transcript.contains(" - c (outside) [new]"));
    assert!(!transcript.contains("a (outside) [new]"));
}

#[test]
fn partial_mutation_is_surfaced_in_the_transcript() {
    let dir = InMemoryDirectory::new("admin")
        .with_outside("bob")
        .with_repo(Repository::new("half"))
        .with_grant("half", "bob", PermissionLevel::Admin)
        .with_failing_add("half");
    let tmp = tempfile::tempdir().unwrap();

    let transcript = run_scripted(
        &dir,
        &tmp.path().join("seen.log"),
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "bob\ny\nn\nexit\n",
    );

    assert!(transcript.contains("half: failed"));
    assert!(transcript.contains("partial mutation"));
    // The remove landed; bob is left with no access and nothing rolls back.
    assert_eq!(
        dir.collaborator_permission("half", "bob").unwrap(),
        PermissionLevel::None
    );
}

#[test]
fn query_failures_skip_repositories_without_aborting() {
    let dir = InMemoryDirectory::new("admin")
        .with_outside("bob")
        .with_repo(Repository::new("good"))
        .with_repo(Repository::new("broken"))
        .with_grant("good", "bob", PermissionLevel::Maintain)
        .with_failing_permission("broken");
    let tmp = tempfile::tempdir().unwrap();

    let transcript = run_scripted(
        &dir,
        &tmp.path().join("seen.log"),
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "bob\ny\nn\nexit\n",
    );

    assert!(transcript.contains("Skipped 1 repositories"));
    assert!(transcript.contains("good: applied"));
    assert_eq!(
        dir.collaborator_permission("good", "bob").unwrap(),
        PermissionLevel::Read
    );
}

#[test]
fn second_cycle_is_idempotent() {
    let dir = org_directory();
    let tmp = tempfile::tempdir().unwrap();
    let log_path = tmp.path().join("seen.log");

    run_scripted(
        &dir,
        &log_path,
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "bob\ny\ny\nexit\n",
    );
    let after_first = dir.mutation_count();

    // Same user again; everything is now at target, so the controller skips
    // the confirmation and the engine is never invoked.
    let transcript = run_scripted(
        &dir,
        &log_path,
        AuditOptions::default(),
        CollaboratorScope::Outside,
        "bob\nexit\n",
    );

    assert!(transcript.contains("Nothing to downgrade."));
    assert_eq!(dir.mutation_count(), after_first);
}

#[test]
fn error_taxonomy_displays() {
    let err = Error::Configuration("PERMAUDIT_TOKEN is not set".to_string());
    assert!(err.to_string().starts_with("configuration error"));

    let err = Error::PartialMutation {
        repo: "half".to_string(),
        user: "bob".to_string(),
        cause: "add denied".to_string(),
    };
    let display = err.to_string();
    assert!(display.contains("half"));
    assert!(display.contains("re-add failed"));
}
