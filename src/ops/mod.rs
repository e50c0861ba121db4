//! High-level operations.
//!
//! This module contains the implementation of the build command.

pub mod colcon_build;
pub mod discover;
pub mod scope;

pub use colcon_build::{plan, run, BuildCommand, BuildOptions, BuildPlan, Outcome};
pub use discover::{discover_packages, DiscoverOptions};
pub use scope::{decide_scope, BuildScope, ScopeDecision};
