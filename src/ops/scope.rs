//! Build scope selection.
//!
//! colcon can either build exactly the named packages (`--packages-select`)
//! or the named packages plus every dependency they need
//! (`--packages-up-to`). Selecting is only safe when the dependencies are
//! already built, which is approximated by checking that every requested
//! package shows up in the command line recorded by the previous build.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::core::package::PackageName;
use crate::util::fs::read_first_line;

/// Which packages colcon should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildScope {
    /// Only the named packages.
    Select,
    /// The named packages and their dependencies.
    UpTo,
}

impl BuildScope {
    /// The colcon flag for this scope.
    pub fn flag(&self) -> &'static str {
        match self {
            BuildScope::Select => "--packages-select",
            BuildScope::UpTo => "--packages-up-to",
        }
    }
}

impl fmt::Display for BuildScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Outcome of comparing the requested packages with the last build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDecision {
    pub scope: BuildScope,

    /// First package that was not part of the last build, if any.
    pub missing: Option<PackageName>,
}

impl ScopeDecision {
    fn up_to(missing: Option<PackageName>) -> Self {
        ScopeDecision {
            scope: BuildScope::UpTo,
            missing,
        }
    }
}

/// Read the recorded command line of the last build, if there was one.
pub fn read_history(latest_log: &Path) -> Result<Option<String>> {
    read_first_line(latest_log)
}

/// Decide the build scope for `packages` given the last build's record.
///
/// Membership is plain substring containment, so `a` counts as built if
/// the record mentions `abc`. Checking stops at the first miss.
pub fn decide_scope(packages: &[PackageName], history: Option<&str>) -> ScopeDecision {
    let Some(record) = history else {
        tracing::debug!("no previous build recorded");
        return ScopeDecision::up_to(None);
    };

    match packages.iter().find(|p| !record.contains(p.as_str())) {
        Some(missing) => ScopeDecision::up_to(Some(missing.clone())),
        None => ScopeDecision {
            scope: BuildScope::Select,
            missing: None,
        },
    }
}
