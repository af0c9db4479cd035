//! Flat-file collaborator log.

use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only record of collaborator logins seen in earlier sessions.
///
/// One login per line. The format does not deduplicate; callers check
/// [`CollaboratorLog::contains`] before appending. Each operation opens the
/// file, reads or appends in full, and closes it — no handle is held across
/// calls and no concurrent writers are assumed.
pub struct CollaboratorLog {
    /// Path to the log file.
    path: PathBuf,
}

impl CollaboratorLog {
    /// Creates a log over the given path. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full set of previously seen logins.
    ///
    /// A missing file is an empty log, not an error. Blank lines and
    /// surrounding whitespace are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<HashSet<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => {
                return Err(Error::OperationFailed {
                    operation: "read_collaborator_log".to_string(),
                    cause: format!("{}: {e}", self.path.display()),
                });
            },
        };

        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Returns true if the login is already recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn contains(&self, login: &str) -> Result<bool> {
        Ok(self.load()?.contains(login))
    }

    /// Appends a login as a new line.
    ///
    /// Parent directories are created if needed. The caller is responsible
    /// for checking membership first; this method appends unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, login: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                    operation: "create_log_dir".to_string(),
                    cause: format!("{}: {e}", parent.display()),
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::OperationFailed {
                operation: "open_collaborator_log".to_string(),
                cause: format!("{}: {e}", self.path.display()),
            })?;

        writeln!(file, "{login}").map_err(|e| Error::OperationFailed {
            operation: "append_collaborator_log".to_string(),
            cause: format!("{}: {e}", self.path.display()),
        })
    }
}
