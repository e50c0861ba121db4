//! Global context for colcon-quick operations.
//!
//! Holds the directory the tool was started from and the configuration
//! layers that can be read before the workspace is known.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, Config, ConfigSources};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Config layers read at startup
    config: ConfigSources,
}

impl GlobalContext {
    /// Create a context for the process's current directory.
    pub fn new(explicit_config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let global = global_config_path();
        let config = ConfigSources::load(global.as_deref(), explicit_config)?;

        Ok(GlobalContext {
            cwd,
            config,
        })
    }

    /// Create a context for an arbitrary directory, with default config.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        GlobalContext {
            cwd: cwd.into(),
            config: ConfigSources::default(),
        }
    }

    /// Replace the config layers.
    pub fn with_config(mut self, config: ConfigSources) -> Self {
        self.config = config;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Config to use before the workspace root is known.
    pub fn bootstrap_config(&self) -> Config {
        self.config.bootstrap()
    }

    /// Config for a located workspace.
    pub fn workspace_config(&self, workspace_root: &Path) -> Config {
        self.config.resolve(workspace_root)
    }
}
