//! Configuration display command.

use crate::Result;
use crate::config::AuditConfig;

/// Prints the effective configuration. The token is never printed.
///
/// # Errors
///
/// Currently infallible; kept fallible for signature consistency with the
/// other commands.
pub fn cmd_config_show(config: &AuditConfig) -> Result<()> {
    println!("org               = {}", config.org);
    println!("api_url           = {}", config.api_url);
    println!("token             = <set>");
    println!("collaborator_log  = {}", config.collaborator_log.display());
    match &config.operational_log {
        Some(path) => println!("operational_log   = {}", path.display()),
        None => println!("operational_log   = <stderr>"),
    }
    println!("target            = {}", config.target);
    println!("include_archived  = {}", config.include_archived);
    println!("include_at_target = {}", config.include_at_target);
    println!("scope             = {:?}", config.scope);
    Ok(())
}
