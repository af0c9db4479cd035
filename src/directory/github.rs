//! GitHub REST adapter for the directory client.

use super::DirectoryClient;
use crate::config::AuditConfig;
use crate::models::{Collaborator, MembershipClass, PermissionLevel, Repository};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// Page size for list endpoints.
const PAGE_SIZE: u32 = 100;

/// Request timeout.
const TIMEOUT_MS: u64 = 30_000;

/// Blocking GitHub REST client.
///
/// Deliberately thin: no retry/backoff, no rate-limit handling, no
/// pagination control beyond walking pages until one comes back empty.
pub struct GithubDirectory {
    /// API base URL.
    base_url: String,
    /// Organization name.
    org: String,
    /// Access token.
    token: SecretString,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

/// A user entry in list responses.
#[derive(Debug, Deserialize)]
struct UserEntry {
    login: String,
}

/// A repository entry in list responses.
#[derive(Debug, Deserialize)]
struct RepoEntry {
    name: String,
    #[serde(default)]
    archived: bool,
}

/// The permission lookup response.
#[derive(Debug, Deserialize)]
struct PermissionEntry {
    permission: String,
}

impl GithubDirectory {
    /// Creates a client from configuration.
    #[must_use]
    pub fn new(config: &AuditConfig) -> Self {
        Self::with_base_url(config.api_url.clone(), config.org.clone(), config.token.clone())
    }

    /// Creates a client against an explicit base URL.
    #[must_use]
    pub fn with_base_url(base_url: String, org: String, token: SecretString) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .user_agent(concat!("permaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Failed to build HTTP client: {err}");
                reqwest::blocking::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            org,
            token,
            client,
        }
    }

    /// Issues a GET and decodes the JSON body.
    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| transport_error(path, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::OperationFailed {
                operation: format!("GET {path}"),
                cause: format!("status {status}"),
            });
        }

        response.json().map_err(|e| transport_error(path, &e))
    }

    /// Walks a paginated user-list endpoint to completion.
    fn list_users(&self, path: &str, membership: MembershipClass) -> Result<Vec<Collaborator>> {
        let mut users = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<UserEntry> =
                self.get_json(&format!("{path}?per_page={PAGE_SIZE}&page={page}"))?;
            if batch.is_empty() {
                break;
            }
            let full_page = batch.len() as u32 == PAGE_SIZE;
            users.extend(batch.into_iter().map(|u| Collaborator {
                login: u.login,
                membership,
            }));
            if !full_page {
                break;
            }
            page += 1;
        }
        Ok(users)
    }
}

impl DirectoryClient for GithubDirectory {
    fn organization_members(&self) -> Result<Vec<Collaborator>> {
        self.list_users(&format!("/orgs/{}/members", self.org), MembershipClass::Member)
    }

    fn outside_collaborators(&self) -> Result<Vec<Collaborator>> {
        self.list_users(
            &format!("/orgs/{}/outside_collaborators", self.org),
            MembershipClass::Outside,
        )
    }

    fn repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<RepoEntry> = self.get_json(&format!(
                "/orgs/{}/repos?per_page={PAGE_SIZE}&page={page}",
                self.org
            ))?;
            if batch.is_empty() {
                break;
            }
            let full_page = batch.len() as u32 == PAGE_SIZE;
            repos.extend(batch.into_iter().map(|r| Repository {
                name: r.name,
                archived: r.archived,
            }));
            if !full_page {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    fn collaborator_permission(&self, repo: &str, user: &str) -> Result<PermissionLevel> {
        let path = format!(
            "/repos/{}/{repo}/collaborators/{user}/permission",
            self.org
        );
        let entry: PermissionEntry = self.get_json(&path).map_err(|e| Error::RepositoryAccess {
            repo: repo.to_string(),
            cause: e.to_string(),
        })?;
        Ok(PermissionLevel::parse(&entry.permission))
    }

    fn remove_collaborator(&self, repo: &str, user: &str) -> Result<()> {
        let path = format!("/repos/{}/{repo}/collaborators/{user}", self.org);
        let response = self
            .client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| transport_error(&path, &e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::RepositoryAccess {
                repo: repo.to_string(),
                cause: format!("remove returned status {status}"),
            })
        }
    }

    fn add_collaborator(&self, repo: &str, user: &str, level: PermissionLevel) -> Result<()> {
        let path = format!("/repos/{}/{repo}/collaborators/{user}", self.org);
        let response = self
            .client
            .put(format!("{}{path}", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({ "permission": level.as_wire_str() }))
            .send()
            .map_err(|e| transport_error(&path, &e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::RepositoryAccess {
                repo: repo.to_string(),
                cause: format!("add returned status {status}"),
            })
        }
    }

    fn authenticated_user(&self) -> Result<String> {
        let entry: UserEntry = self.get_json("/user")?;
        Ok(entry.login)
    }
}

/// Converts a transport error without leaking the token.
fn transport_error(path: &str, err: &reqwest::Error) -> Error {
    Error::OperationFailed {
        operation: format!("request {path}"),
        cause: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = GithubDirectory::with_base_url(
            "https://ghe.example.com/api/v3/".to_string(),
            "acme".to_string(),
            SecretString::from("t"),
        );
        assert_eq!(client.base_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_permission_entry_decodes_both_conventions() {
        let entry: PermissionEntry =
            serde_json::from_str(r#"{"permission": "pull", "user": {"login": "bob"}}"#)
                .expect("valid json");
        assert_eq!(PermissionLevel::parse(&entry.permission), PermissionLevel::Read);
    }

    #[test]
    fn test_repo_entry_defaults_archived() {
        let entry: RepoEntry = serde_json::from_str(r#"{"name": "app"}"#).expect("valid json");
        assert!(!entry.archived);
    }
}
