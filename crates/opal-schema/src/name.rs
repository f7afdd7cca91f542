//! Package identity types.
//!
//! A component is addressed by a namespaced name (`owner/name`) plus a
//! version ref. The version is an opaque tag or branch name, not a semantic
//! version; the wildcard `*` is normalized to the default branch.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Branch used when a version is requested as `*` or omitted entirely.
pub const DEFAULT_BRANCH: &str = "master";

/// Errors raised while validating a component name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name has no `owner/` namespace.
    #[error("invalid component name \"{0}\": expected \"owner/name\"")]
    MissingNamespace(String),
}

/// A validated, namespaced component name in `owner/name` form.
///
/// # Example
///
/// ```
/// use opal_schema::PackageName;
///
/// let name = PackageName::parse("component/dialog").unwrap();
/// assert_eq!(name.as_str(), "component/dialog");
/// assert_eq!(name.slug(), "component-dialog");
///
/// assert!(PackageName::parse("dialog").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    /// Validate and wrap a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError::MissingNamespace`] if the name contains no `/`.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        if raw.contains('/') {
            Ok(Self(raw.to_string()))
        } else {
            Err(NameError::MissingNamespace(raw.to_string()))
        }
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory-safe form of the name, with every `/` replaced by `-`.
    ///
    /// `component/dialog` becomes `component-dialog`. Two names only share a
    /// slug if they literally normalize to the same string.
    pub fn slug(&self) -> String {
        self.0.split('/').collect::<Vec<_>>().join("-")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An opaque version ref: a tag like `1.0.3` or a branch like `master`.
///
/// Construction normalizes the wildcard `*` to [`DEFAULT_BRANCH`] so that the
/// normalized form is the only one that ever reaches URLs or registry keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version(String);

impl Version {
    /// Wrap a version string, normalizing `*` to the default branch.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw == "*" {
            Self(DEFAULT_BRANCH.to_string())
        } else {
            Self(raw)
        }
    }

    /// Return the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// A `name[@version]` pair as given on the command line.
///
/// The name is kept raw here; validation happens when the install request
/// runs, so that a bad name surfaces through the installer's error channel
/// rather than during argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Raw component name, possibly missing its namespace.
    pub name: String,
    /// Requested version, defaulting to the default branch.
    pub version: Version,
}

impl PackageSpec {
    /// Split a raw `name@version` argument. A missing or empty version means
    /// the default branch.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('@') {
            Some((name, version)) if !version.is_empty() => Self {
                name: name.to_string(),
                version: Version::new(version),
            },
            Some((name, _)) => Self {
                name: name.to_string(),
                version: Version::default(),
            },
            None => Self {
                name: raw.to_string(),
                version: Version::default(),
            },
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
