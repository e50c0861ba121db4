//! Package discovery.
//!
//! If the current directory is itself a package, that package is the whole
//! set. Otherwise every descriptor below the current directory contributes
//! one package, in walk order.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::core::errors::WorkspaceError;
use crate::core::package::{read_package_name, PackageName};
use crate::util::fs::{is_hidden, relative_path};

/// Marker file that makes colcon skip a directory and everything below it.
pub const IGNORE_MARKER: &str = "COLCON_IGNORE";

/// Options for package discovery.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Descriptor file name
    pub descriptor: String,

    /// Skip directories containing [`IGNORE_MARKER`]
    pub respect_ignore_markers: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        DiscoverOptions {
            descriptor: "package.xml".to_string(),
            respect_ignore_markers: true,
        }
    }
}

/// Discover the packages to build from `cwd`.
///
/// The first unreadable or invalid descriptor aborts discovery.
pub fn discover_packages(
    cwd: &Path,
    opts: &DiscoverOptions,
) -> Result<Vec<PackageName>, WorkspaceError> {
    let local = cwd.join(&opts.descriptor);
    if local.is_file() {
        let name = read_package_name(&local)?;
        tracing::debug!("current directory is package `{}`", name);
        return Ok(vec![name]);
    }

    scan_packages(cwd, opts)
}

/// Recursively collect package names from every descriptor below `root`.
pub fn scan_packages(
    root: &Path,
    opts: &DiscoverOptions,
) -> Result<Vec<PackageName>, WorkspaceError> {
    let walker = WalkDir::new(root)
        .follow_links(true)
        // A directory's own descriptor comes before anything nested in it.
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| keep_entry(entry, opts));

    let mut names = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable path: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.file_name() != opts.descriptor.as_str() {
            continue;
        }

        let name = read_package_name(entry.path())?;
        tracing::debug!(
            "discovered `{}` in {}",
            name,
            relative_path(root, entry.path()).display()
        );
        names.push(name);
    }

    Ok(names)
}

fn keep_entry(entry: &DirEntry, opts: &DiscoverOptions) -> bool {
    // The walk root is always kept, even if it is a dot-directory.
    if entry.depth() == 0 {
        return true;
    }
    if is_hidden(entry.file_name()) {
        return false;
    }
    if opts.respect_ignore_markers
        && entry.file_type().is_dir()
        && entry.path().join(IGNORE_MARKER).exists()
    {
        tracing::debug!("ignoring {}", entry.path().display());
        return false;
    }
    true
}
