//! Candidate remotes and the URL shapes they serve.
//!
//! A remote is a base URL hosting raw component files. Remotes are tried in
//! list order until one yields a usable manifest; the winner is then fixed
//! for the rest of that package's install so every file comes from the same
//! place.

use std::fmt;

use crate::types::{MANIFEST_FILE, PackageName, Version};

/// Remote used when the caller configures none.
pub const DEFAULT_REMOTE: &str = "https://raw.github.com";

/// An ordered list of candidate remote base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteList(Vec<String>);

impl RemoteList {
    /// Wrap a list of base URLs, falling back to [`DEFAULT_REMOTE`] when the
    /// list is empty.
    pub fn new(remotes: Vec<String>) -> Self {
        if remotes.is_empty() {
            Self::default()
        } else {
            Self(remotes)
        }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no candidates. Never true in practice, since
    /// construction substitutes the default remote.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate candidates in priority order, normalized.
    pub fn iter(&self) -> impl Iterator<Item = Remote> + '_ {
        self.0.iter().map(|base| Remote::new(base))
    }
}

impl Default for RemoteList {
    fn default() -> Self {
        Self(vec![DEFAULT_REMOTE.to_string()])
    }
}

/// A single normalized remote (no trailing slash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote(String);

impl Remote {
    /// Normalize a base URL by stripping trailing slashes.
    pub fn new(base: &str) -> Self {
        Self(base.trim_end_matches('/').to_string())
    }

    /// The normalized base URL.
    pub fn base(&self) -> &str {
        &self.0
    }

    /// URL of the manifest for `name` at `version`.
    pub fn manifest_url(&self, name: &PackageName, version: &Version) -> String {
        format!("{}/{name}/{version}/{MANIFEST_FILE}", self.0)
    }

    /// URL of one of the component's files, preserving its relative path.
    pub fn file_url(&self, name: &PackageName, version: &Version, path: &str) -> String {
        format!("{}/{name}/{version}/{path}", self.0)
    }

    /// Default `repo` value for a manifest that omits one.
    pub fn repo_url(&self, name: &PackageName) -> String {
        format!("{}/{name}", self.0)
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
