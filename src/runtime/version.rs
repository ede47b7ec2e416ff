//! Interpreter version parsing.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Oldest interpreter the server script supports.
pub const MINIMUM_VERSION: VersionInfo = VersionInfo::new(3, 8);

static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A parsed interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl VersionInfo {
    /// Create a major.minor version.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Whether this version is at least `minimum`, comparing major.minor only.
    pub fn satisfies(&self, minimum: &VersionInfo) -> bool {
        (self.major, self.minor) >= (minimum.major, minimum.minor)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Extract the version from `python --version` output.
///
/// Returns `None` when the text has no `Python X.Y` marker, e.g. the
/// Windows Store stub's "Python was not found" message.
pub fn parse_version(output: &str) -> Option<VersionInfo> {
    let caps = PYTHON_VERSION.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Some(VersionInfo {
        major,
        minor,
        patch,
    })
}
