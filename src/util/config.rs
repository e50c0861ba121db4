//! Configuration file support for colcon-quick.
//!
//! Configuration is layered, later layers overriding earlier ones:
//! - Global: `~/.colcon-quick/config.toml` - User-wide defaults
//! - Project: `<workspace>/.colcon-quick.toml` - Workspace-specific overrides
//! - Explicit: `--config <PATH>` or `COLCON_QUICK_CONFIG`
//!
//! The log directory name is needed to find the workspace in the first
//! place, so only the global and explicit layers can change it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::errors::WorkspaceError;

/// File name of the per-workspace config file.
pub const PROJECT_CONFIG_FILE: &str = ".colcon-quick.toml";

/// colcon-quick configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Build tool invocation
    pub build: BuildConfig,

    /// Workspace layout
    pub workspace: WorkspaceConfig,

    /// Package discovery
    pub discovery: DiscoveryConfig,
}

/// Build tool invocation settings.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Build tool executable
    pub tool: String,

    /// Subcommand passed right after the tool
    pub subcommand: String,

    /// Arguments added with `--verbose`
    pub verbose_args: Vec<String>,

    /// Arguments always added before the scope flag
    pub extra_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            tool: "colcon".to_string(),
            subcommand: "build".to_string(),
            verbose_args: vec![
                "--event-handlers".to_string(),
                "console_direct+".to_string(),
            ],
            extra_args: Vec::new(),
        }
    }
}

/// Workspace layout settings.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Name of the log directory that marks the workspace root
    pub log_dir: String,

    /// File name of package descriptors
    pub descriptor: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        WorkspaceConfig {
            log_dir: "log".to_string(),
            descriptor: "package.xml".to_string(),
        }
    }
}

/// Package discovery settings.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Skip directories that contain a `COLCON_IGNORE` marker
    pub respect_ignore_markers: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            respect_ignore_markers: true,
        }
    }
}

/// A config file as written on disk, every key optional so that layers
/// only override what they actually set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialConfig {
    build: PartialBuild,
    workspace: PartialWorkspace,
    discovery: PartialDiscovery,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialBuild {
    tool: Option<String>,
    subcommand: Option<String>,
    verbose_args: Option<Vec<String>>,
    extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialWorkspace {
    log_dir: Option<String>,
    descriptor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialDiscovery {
    respect_ignore_markers: Option<bool>,
}

/// One parsed configuration layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    inner: PartialConfig,
}

impl ConfigLayer {
    /// Parse a layer from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let inner = toml::from_str(contents).context("invalid config")?;
        Ok(ConfigLayer { inner })
    }

    /// Load a layer from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load a layer, falling back to an empty one if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("ignoring config {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Load a layer the user asked for by path. A missing file is an error.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WorkspaceError::ConfigNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        Self::load(path)
    }
}

impl Config {
    /// Apply a layer on top of this config (layer takes precedence).
    pub fn merge(&mut self, layer: &ConfigLayer) {
        let other = &layer.inner;

        if let Some(ref tool) = other.build.tool {
            self.build.tool = tool.clone();
        }
        if let Some(ref subcommand) = other.build.subcommand {
            self.build.subcommand = subcommand.clone();
        }
        if let Some(ref args) = other.build.verbose_args {
            self.build.verbose_args = args.clone();
        }
        if let Some(ref args) = other.build.extra_args {
            self.build.extra_args = args.clone();
        }

        if let Some(ref log_dir) = other.workspace.log_dir {
            self.workspace.log_dir = log_dir.clone();
        }
        if let Some(ref descriptor) = other.workspace.descriptor {
            self.workspace.descriptor = descriptor.clone();
        }

        if let Some(respect) = other.discovery.respect_ignore_markers {
            self.discovery.respect_ignore_markers = respect;
        }
    }

    /// Apply a project layer. The log directory is already fixed at this point.
    pub fn merge_project(&mut self, layer: &ConfigLayer) {
        let log_dir = self.workspace.log_dir.clone();
        self.merge(layer);
        if self.workspace.log_dir != log_dir {
            tracing::debug!(
                "ignoring workspace.log_dir = {:?} from project config",
                self.workspace.log_dir
            );
            self.workspace.log_dir = log_dir;
        }
    }
}

/// The configuration layers known before the workspace has been located.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global: ConfigLayer,
    pub explicit: ConfigLayer,
}

impl ConfigSources {
    /// Read the global layer and, if given, the explicit one.
    pub fn load(global_path: Option<&Path>, explicit_path: Option<&Path>) -> Result<Self> {
        let global = global_path
            .map(ConfigLayer::load_or_default)
            .unwrap_or_default();

        let explicit = match explicit_path {
            Some(path) => ConfigLayer::load_explicit(path)?,
            None => ConfigLayer::default(),
        };

        Ok(ConfigSources { global, explicit })
    }

    /// Config used to locate the workspace: defaults < global < explicit.
    pub fn bootstrap(&self) -> Config {
        let mut config = Config::default();
        config.merge(&self.global);
        config.merge(&self.explicit);
        config
    }

    /// Final config once the workspace root is known:
    /// defaults < global < project < explicit.
    pub fn resolve(&self, workspace_root: &Path) -> Config {
        let mut config = self.bootstrap();
        let project = ConfigLayer::load_or_default(&project_config_path(workspace_root));
        config.merge_project(&project);
        config.merge(&self.explicit);
        config
    }
}

/// Get the global config directory (~/.colcon-quick).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".colcon-quick"))
}

/// Get the global config path (~/.colcon-quick/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<workspace>/.colcon-quick.toml).
pub fn project_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(PROJECT_CONFIG_FILE)
}
