//! colcon-quick - pick the colcon packages and build scope for you
//!
//! Finds the enclosing colcon workspace from the current directory, works
//! out which packages live here, and decides whether the last build already
//! covered them (`--packages-select`) or their dependencies still need
//! building (`--packages-up-to`).

pub mod core;
pub mod ops;
pub mod util;

/// Workspace fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use self::core::{package::PackageName, workspace::Workspace, WorkspaceError};
pub use ops::{BuildOptions, BuildPlan, BuildScope};
pub use util::context::GlobalContext;
