//! Core data structures for colcon-quick.
//!
//! - Workspace location (the `log/` directory search)
//! - Package names and `package.xml` descriptors
//! - Error types shared by both

pub mod errors;
pub mod package;
pub mod workspace;

pub use errors::WorkspaceError;
pub use package::{read_package_name, PackageName};
pub use workspace::{find_log_dir, Workspace};
