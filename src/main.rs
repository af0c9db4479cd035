//! Binary entry point for permaudit.
//!
//! This binary provides the CLI interface for the permission audit tool.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use permaudit::config::AuditConfig;
use permaudit::models::{CollaboratorScope, PermissionLevel};
use permaudit::observability::{self, LogFormat, LoggingConfig};
use permaudit::{Error, cli};
use std::path::PathBuf;
use std::process::ExitCode;

/// Permaudit - interactive permission audit for source-hosting organizations.
#[derive(Parser)]
#[command(name = "permaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Operational log format: plain or json.
    #[arg(long, global = true, default_value = "plain")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run an interactive audit-and-downgrade session.
    Audit {
        /// Target permission level for downgrades.
        #[arg(short, long, default_value = "read")]
        target: String,

        /// Collaborator scope: members, outside, or all.
        #[arg(short, long, default_value = "outside")]
        scope: String,

        /// Include archived repositories in audits and downgrades.
        #[arg(long)]
        include_archived: bool,

        /// Hide grants already at the target level.
        #[arg(long)]
        hide_at_target: bool,
    },

    /// Print the collaborator roster.
    Roster {
        /// Only show collaborators absent from the collaborator log.
        #[arg(long)]
        new_only: bool,

        /// Collaborator scope: members, outside, or all.
        #[arg(short, long, default_value = "outside")]
        scope: String,
    },

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AuditConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&LoggingConfig {
        file: config.operational_log.clone(),
        format: LogFormat::parse(&cli.log_format),
        verbose: cli.verbose,
    }) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: AuditConfig) -> Result<(), Error> {
    match cli.command {
        Commands::Audit {
            target,
            scope,
            include_archived,
            hide_at_target,
        } => {
            let target = parse_target(&target)?;
            let include_archived = include_archived || config.include_archived;
            let mut config = config
                .with_target(target)
                .with_scope(CollaboratorScope::parse(&scope))
                .with_include_archived(include_archived);
            if hide_at_target {
                config.include_at_target = false;
            }
            cli::cmd_audit(&config)
        },

        Commands::Roster { new_only, scope } => {
            let config = config.with_scope(CollaboratorScope::parse(&scope));
            cli::cmd_roster(&config, new_only)
        },

        Commands::Config => cli::cmd_config_show(&config),
    }
}

/// Parses the downgrade target, rejecting `none`.
fn parse_target(s: &str) -> Result<PermissionLevel, Error> {
    match PermissionLevel::parse(s) {
        PermissionLevel::None => Err(Error::Configuration(format!(
            "'{s}' is not a valid downgrade target"
        ))),
        level => Ok(level),
    }
}
