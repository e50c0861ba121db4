//! Workspace - the colcon workspace around the current directory.
//!
//! colcon creates a `log/` directory next to `src/`, `build/` and
//! `install/` on the first build. Its presence is what marks a directory as
//! the workspace root; no other marker file is required.

use std::path::{Path, PathBuf};

use crate::core::errors::WorkspaceError;

/// Directory under the log directory that points at the most recent run.
pub const LATEST_DIR: &str = "latest";

/// Log file, inside [`LATEST_DIR`], whose first line records the invocation.
pub const LATEST_LOG_FILE: &str = "logger_all.log";

/// A located colcon workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace root (parent of the log directory)
    root: PathBuf,

    /// The log directory that was found
    log_dir: PathBuf,
}

impl Workspace {
    /// Locate the workspace enclosing `start` by searching for `log_dir_name`.
    pub fn locate(start: &Path, log_dir_name: &str) -> Result<Self, WorkspaceError> {
        let log_dir = find_log_dir(start, log_dir_name)?;
        Ok(Self::from_log_dir(log_dir))
    }

    /// Build a workspace from a known log directory.
    ///
    /// A log directory without a parent is its own root.
    pub fn from_log_dir(log_dir: PathBuf) -> Self {
        let root = log_dir.parent().unwrap_or(&log_dir).to_path_buf();
        Workspace { root, log_dir }
    }

    /// Get the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the log directory.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the most recent run's log file.
    pub fn latest_log(&self) -> PathBuf {
        self.log_dir.join(LATEST_DIR).join(LATEST_LOG_FILE)
    }
}

/// Find the nearest `log_dir_name` directory at or above `start`.
///
/// `start` itself is checked first, then each ancestor up to and including
/// the filesystem root.
pub fn find_log_dir(start: &Path, log_dir_name: &str) -> Result<PathBuf, WorkspaceError> {
    for dir in start.ancestors() {
        let candidate = dir.join(log_dir_name);
        if candidate.is_dir() {
            tracing::debug!("found log directory {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(WorkspaceError::LogsNotFound {
        start: start.to_path_buf(),
        log_dir: log_dir_name.to_string(),
    })
}
