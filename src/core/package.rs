//! Package names and `package.xml` descriptors.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::core::errors::WorkspaceError;

/// The name of a colcon package. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    /// Create a package name, rejecting empty or blank strings.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == name.len() {
            Some(PackageName(name))
        } else {
            Some(PackageName(trimmed.to_string()))
        }
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageName::new(s).ok_or_else(|| "package name cannot be empty".to_string())
    }
}

/// Read the package name declared by the descriptor at `path`.
pub fn read_package_name(path: &Path) -> Result<PackageName, WorkspaceError> {
    let xml = std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_package_name(&xml, path)
}

/// Extract the text of the `<name>` element directly under the root element.
///
/// `path` is only used for error reporting.
pub fn parse_package_name(xml: &str, path: &Path) -> Result<PackageName, WorkspaceError> {
    let parse_err = |source: quick_xml::Error| WorkspaceError::PackageXmlParse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut in_name = false;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 && e.name().as_ref() == b"name" {
                    in_name = true;
                }
            }
            Event::End(_) => {
                if in_name && depth == 2 {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            // `<name/>` carries no text.
            Event::Empty(e) if depth == 1 && e.name().as_ref() == b"name" => break,
            Event::Text(t) if in_name && depth == 2 => {
                text.push_str(&t.unescape().map_err(parse_err)?);
            }
            Event::CData(c) if in_name && depth == 2 => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    PackageName::new(text).ok_or_else(|| WorkspaceError::InvalidPackageXml {
        path: path.to_path_buf(),
    })
}
