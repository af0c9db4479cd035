//! CLI command implementations.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `audit` | Interactive audit-and-downgrade session |
//! | `roster` | Print the collaborator roster, or only newcomers |
//! | `config` | Show the effective configuration |

mod audit;
mod config;
mod roster;

pub use audit::cmd_audit;
pub use config::cmd_config_show;
pub use roster::cmd_roster;
