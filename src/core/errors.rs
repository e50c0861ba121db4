//! Workspace error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while locating the workspace or reading its package descriptors.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum WorkspaceError {
    /// No `log/` directory in the start directory or any of its ancestors.
    #[error("no `{log_dir}` directory found in `{}` or any parent directory", start.display())]
    #[diagnostic(
        code(colcon_quick::workspace::logs_not_found),
        help("run `colcon build` once from the workspace root")
    )]
    LogsNotFound { start: PathBuf, log_dir: String },

    /// A descriptor without a usable `<name>` element.
    #[error("invalid package descriptor `{}`: missing or empty <name>", path.display())]
    #[diagnostic(code(colcon_quick::package::invalid_xml))]
    InvalidPackageXml { path: PathBuf },

    /// A descriptor that is not well-formed XML.
    #[error("failed to parse package descriptor `{}`", path.display())]
    #[diagnostic(code(colcon_quick::package::parse))]
    PackageXmlParse {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: `{}`", path.display())]
    #[diagnostic(code(colcon_quick::config::not_found))]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            WorkspaceError::LogsNotFound { start, log_dir } => Diagnostic::error(format!(
                "could not find a colcon workspace above `{}`",
                start.display()
            ))
            .with_context(format!(
                "looked for a `{}` directory here and in every parent directory",
                log_dir
            ))
            .with_suggestion(suggestions::NO_LOGS),

            WorkspaceError::InvalidPackageXml { path } => {
                Diagnostic::error("package descriptor has no package name")
                    .with_location(path)
                    .with_context("expected a non-empty <name> element under <package>")
                    .with_suggestion(suggestions::FIX_DESCRIPTOR)
            }

            WorkspaceError::PackageXmlParse { path, source } => {
                Diagnostic::error("package descriptor is not valid XML")
                    .with_location(path)
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::FIX_DESCRIPTOR)
            }

            WorkspaceError::ConfigNotFound { path } => Diagnostic::error(format!(
                "config file `{}` does not exist",
                path.display()
            ))
            .with_suggestion(suggestions::CONFIG_PATH),

            WorkspaceError::Io { path, source } => Diagnostic::error(format!(
                "could not read `{}`",
                path.display()
            ))
            .with_context(source.to_string()),
        }
    }
}
