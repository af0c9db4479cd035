//! Local persistence.
//!
//! The only thing permaudit persists is the collaborator log: a plain text
//! file of previously seen collaborator logins, one per line.

mod collaborator_log;

pub use collaborator_log::CollaboratorLog;
