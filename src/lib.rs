//! # Permaudit
//!
//! An interactive permission audit and downgrade tool for source-hosting
//! organizations.
//!
//! Permaudit enumerates the collaborators of an organization, reports each
//! one's effective permission level per repository, and offers to downgrade
//! excessive permissions to a minimal read level, optionally skipping
//! archived repositories. A flat-file collaborator log records outside
//! collaborators seen in earlier sessions so newcomers stand out.
//!
//! ## Example
//!
//! ```rust,ignore
//! use permaudit::{AuditOptions, PermissionAuditor, PermissionLevel};
//!
//! let auditor = PermissionAuditor::new(&client);
//! let report = auditor.audit("bob", &repos, &AuditOptions::default())?;
//! for grant in &report.above_target {
//!     println!("{}: {}", grant.repository.name, grant.permission);
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod directory;
pub mod models;
pub mod observability;
pub mod services;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use config::AuditConfig;
pub use directory::DirectoryClient;
pub use models::{
    Collaborator, CollaboratorScope, DowngradeOutcome, DowngradeResult, MembershipClass,
    PermissionGrant, PermissionLevel, Repository,
};
pub use services::{AuditOptions, AuditReport, DowngradeEngine, PermissionAuditor, RosterSnapshot};
pub use session::SessionController;
pub use storage::CollaboratorLog;

/// Error type for permaudit operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Configuration` | Missing/invalid token or organization name at startup |
/// | `UserNotFound` | A login is absent from the session roster |
/// | `RepositoryAccess` | A single repository's permission query or mutation fails |
/// | `PartialMutation` | The remove step succeeded but the re-add step failed |
/// | `OperationFailed` | I/O errors, HTTP transport errors, log file errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration is missing or invalid.
    ///
    /// Raised when:
    /// - The access token is absent or empty
    /// - The organization name is absent or empty
    /// - The config file cannot be read or parsed
    ///
    /// Always fatal; no API call is attempted after this error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A collaborator login was not found in the session roster.
    ///
    /// Recoverable: the session controller reports it and re-prompts.
    #[error("user '{0}' not found in the organization roster")]
    UserNotFound(String),

    /// A single repository's permission query or mutation failed.
    ///
    /// Recovered locally: the repository is skipped and processing
    /// continues for the rest of the batch.
    #[error("repository '{repo}' access failed: {cause}")]
    RepositoryAccess {
        /// The repository that failed.
        repo: String,
        /// The underlying cause.
        cause: String,
    },

    /// A downgrade removed the collaborator but failed to re-add them.
    ///
    /// The user is left with no access to the repository. Surfaced via the
    /// operational log; never silently retried, never auto-rolled-back.
    #[error("partial mutation on '{repo}': removed '{user}' but re-add failed: {cause}")]
    PartialMutation {
        /// The repository where the mutation stopped halfway.
        repo: String,
        /// The collaborator left without access.
        user: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - Collaborator log file I/O fails
    /// - HTTP transport errors occur
    /// - Logging initialization fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for permaudit operations.
pub type Result<T> = std::result::Result<T, Error>;
