//! Configuration management.
//!
//! Configuration is assembled from three layers, later layers winning:
//! an optional TOML config file, a `.env` file in the working directory
//! (loaded via `dotenvy`), and process environment variables. The access
//! token is only ever read from the environment and is held in a
//! [`SecretString`] so it never appears in debug output.

use crate::models::{CollaboratorScope, PermissionLevel};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the API access token.
pub const ENV_TOKEN: &str = "PERMAUDIT_TOKEN";
/// Environment variable holding the organization name.
pub const ENV_ORG: &str = "PERMAUDIT_ORG";
/// Environment variable holding the collaborator log path.
pub const ENV_COLLABORATOR_LOG: &str = "PERMAUDIT_COLLABORATOR_LOG";
/// Environment variable holding the operational log path.
pub const ENV_OPERATIONAL_LOG: &str = "PERMAUDIT_OPERATIONAL_LOG";

/// Main configuration for permaudit.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Organization name.
    pub org: String,
    /// API access token.
    pub token: SecretString,
    /// API base URL.
    pub api_url: String,
    /// Path to the collaborator log file.
    pub collaborator_log: PathBuf,
    /// Path to the operational log file, if any.
    pub operational_log: Option<PathBuf>,
    /// Target permission level for downgrades.
    pub target: PermissionLevel,
    /// Whether to include archived repositories in audits and downgrades.
    pub include_archived: bool,
    /// Whether to display grants already at the target level.
    pub include_at_target: bool,
    /// Which collaborators a session operates on.
    pub scope: CollaboratorScope,
}

/// Configuration file structure (for TOML parsing).
///
/// The token is deliberately absent: secrets come from the environment only.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Organization name.
    pub org: Option<String>,
    /// API base URL.
    pub api_url: Option<String>,
    /// Collaborator log path.
    pub collaborator_log: Option<String>,
    /// Operational log path.
    pub operational_log: Option<String>,
    /// Target permission level.
    pub target: Option<String>,
    /// Archived-repository inclusion.
    pub include_archived: Option<bool>,
    /// At-target grant display.
    pub include_at_target: Option<bool>,
    /// Collaborator scope: "members", "outside", or "all".
    pub scope: Option<String>,
}

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default collaborator log file name.
pub const DEFAULT_COLLABORATOR_LOG: &str = "collaborators.log";

impl AuditConfig {
    /// Loads configuration from the environment and an optional config file.
    ///
    /// A `.env` file in the working directory is loaded first (missing file
    /// is fine). Explicit environment variables override file values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if the token or organization
    /// is missing or empty, or if the config file cannot be parsed.
    pub fn load(config_path: Option<&std::path::Path>) -> crate::Result<Self> {
        // Missing .env is not an error; only the variables matter.
        let _ = dotenvy::dotenv();

        let file = match config_path {
            Some(path) => Self::read_config_file(path)?,
            None => Self::read_default_config_file()?,
        };

        Self::from_sources(file)
    }

    /// Reads and parses a config file.
    fn read_config_file(path: &std::path::Path) -> crate::Result<ConfigFile> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            crate::Error::Configuration(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Reads the config file from the default location, if one exists.
    ///
    /// Checks the platform config dir first (`~/Library/Application Support`
    /// on macOS), then `~/.config/permaudit/` for Unix compatibility.
    fn read_default_config_file() -> crate::Result<ConfigFile> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(ConfigFile::default());
        };

        let platform_config = base_dirs.config_dir().join("permaudit").join("config.toml");
        if platform_config.exists() {
            return Self::read_config_file(&platform_config);
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("permaudit")
            .join("config.toml");
        if xdg_config.exists() {
            return Self::read_config_file(&xdg_config);
        }

        Ok(ConfigFile::default())
    }

    /// Assembles the final configuration, environment over file.
    fn from_sources(file: ConfigFile) -> crate::Result<Self> {
        let token = env_nonempty(ENV_TOKEN)
            .ok_or_else(|| crate::Error::Configuration(format!("{ENV_TOKEN} is not set")))?;

        let org = env_nonempty(ENV_ORG)
            .or(file.org)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| crate::Error::Configuration(format!("{ENV_ORG} is not set")))?;

        let collaborator_log = env_nonempty(ENV_COLLABORATOR_LOG)
            .or(file.collaborator_log)
            .map_or_else(|| PathBuf::from(DEFAULT_COLLABORATOR_LOG), PathBuf::from);

        let operational_log = env_nonempty(ENV_OPERATIONAL_LOG)
            .or(file.operational_log)
            .map(PathBuf::from);

        Ok(Self {
            org,
            token: SecretString::from(token),
            api_url: file
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            collaborator_log,
            operational_log,
            target: file
                .target
                .as_deref()
                .map_or(PermissionLevel::Read, PermissionLevel::parse),
            include_archived: file.include_archived.unwrap_or(false),
            include_at_target: file.include_at_target.unwrap_or(true),
            scope: file
                .scope
                .as_deref()
                .map_or_else(CollaboratorScope::default, CollaboratorScope::parse),
        })
    }

    /// Sets the downgrade target level.
    #[must_use]
    pub const fn with_target(mut self, target: PermissionLevel) -> Self {
        self.target = target;
        self
    }

    /// Sets the collaborator scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: CollaboratorScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets archived-repository inclusion.
    #[must_use]
    pub const fn with_include_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }
}

/// Reads an environment variable, treating empty/whitespace values as unset.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_parse() {
        let file: ConfigFile = toml::from_str(
            r#"
            org = "acme"
            target = "read"
            include_archived = true
            scope = "all"
            collaborator_log = "/var/lib/permaudit/seen.log"
            "#,
        )
        .expect("valid toml");

        assert_eq!(file.org.as_deref(), Some("acme"));
        assert_eq!(file.target.as_deref(), Some("read"));
        assert_eq!(file.include_archived, Some(true));
        assert_eq!(file.scope.as_deref(), Some("all"));
    }

    #[test]
    fn test_config_file_rejects_bad_toml() {
        let result: std::result::Result<ConfigFile, _> = toml::from_str("org = [");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_from_empty_file() {
        // from_sources requires the token/org env vars, so exercise the
        // file-side defaults directly.
        let file = ConfigFile::default();
        assert!(file.target.is_none());
        assert!(file.include_archived.is_none());
        assert_eq!(
            file.target
                .as_deref()
                .map_or(PermissionLevel::Read, PermissionLevel::parse),
            PermissionLevel::Read
        );
    }
}
