//! Test fixtures for colcon-quick unit tests.
//!
//! Lays out throwaway colcon workspaces on disk so the locator, discovery
//! and scope logic can be exercised against real directory trees.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Render a minimal format-3 `package.xml` for `name`.
pub fn package_xml(name: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<?xml-model href="http://download.ros.org/schema/package_format3.xsd" schematypens="http://www.w3.org/2001/XMLSchema"?>
<package format="3">
  <name>{name}</name>
  <version>0.0.1</version>
  <description>Test package {name}</description>
  <maintainer email="dev@example.com">dev</maintainer>
  <license>MIT</license>
  <buildtool_depend>ament_cmake</buildtool_depend>
  <export>
    <build_type>ament_cmake</build_type>
  </export>
</package>
"#
    )
}

/// A temporary colcon workspace.
pub struct WorkspaceFixture {
    tmp: TempDir,
}

impl WorkspaceFixture {
    /// An empty directory with no `log/` yet.
    pub fn bare() -> Self {
        WorkspaceFixture {
            tmp: TempDir::new().unwrap(),
        }
    }

    /// A workspace that has been built at least once (has `log/`).
    pub fn new() -> Self {
        let ws = Self::bare();
        fs::create_dir_all(ws.root().join("log")).unwrap();
        ws
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Absolute path of `rel` inside the workspace.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root().join(rel)
    }

    /// Create a directory inside the workspace.
    pub fn dir(&self, rel: impl AsRef<Path>) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a file inside the workspace, creating parent directories.
    pub fn file(&self, rel: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Add a package named `name` in directory `rel`.
    pub fn package(&self, rel: impl AsRef<Path>, name: &str) -> PathBuf {
        let dir = self.dir(rel);
        fs::write(dir.join("package.xml"), package_xml(name)).unwrap();
        dir
    }

    /// Record `first_line` as the command line of the latest build.
    pub fn last_build(&self, first_line: &str) {
        self.file(
            "log/latest/logger_all.log",
            &format!("{first_line}\n[0.1s] DEBUG:colcon:done\n"),
        );
    }
}
