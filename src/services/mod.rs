//! Core services: auditing, downgrading, and the session roster snapshot.

mod auditor;
mod downgrade;
mod roster;

pub use auditor::{AuditOptions, AuditReport, PermissionAuditor};
pub use downgrade::DowngradeEngine;
pub use roster::RosterSnapshot;
