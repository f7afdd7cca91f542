//! Domain-specific errors for component installation.
//!
//! Every variant carries its context as plain strings so that outcomes can
//! be cloned into the single-flight registry and handed to duplicate
//! requesters.

use std::path::Path;

use thiserror::Error;

use crate::types::NameError;

/// A fatal installation failure, surfaced after rollback of the package's
/// own partial output (except for [`InstallError::InvalidName`], which is
/// raised before any I/O happens).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The component name has no `owner/` namespace. No network or
    /// filesystem operation was performed.
    #[error("invalid component name \"{name}\": expected \"owner/name\"")]
    InvalidName {
        /// The offending raw name.
        name: String,
    },

    /// Every candidate remote was exhausted, or one failed in a way the
    /// next candidate cannot recover (network failure, server error).
    #[error("no usable remote for \"{name}\": {reason}")]
    ManifestNotFound {
        /// Component whose manifest could not be retrieved.
        name: String,
        /// Description of the final failure.
        reason: String,
    },

    /// A manifest exists but is not valid JSON, either on a remote or
    /// already on disk.
    #[error("invalid manifest in {at}: {message}")]
    ManifestParse {
        /// URL or filesystem path of the offending manifest.
        at: String,
        /// Decoder error text.
        message: String,
    },

    /// A recursive dependency install failed. The message is the child's,
    /// unchanged, so the leaf cause is what callers see.
    #[error("{message}")]
    Dependency {
        /// Name of the dependency that failed.
        name: String,
        /// The child's error text.
        message: String,
    },

    /// A file download failed.
    #[error("failed to download {url}: {reason}")]
    FileTransfer {
        /// Resolved URL of the file.
        url: String,
        /// Transport error text.
        reason: String,
    },

    /// Directory creation, file write, or rollback deletion failed.
    #[error("{path}: {message}")]
    Filesystem {
        /// Path the operation targeted.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },
}

impl InstallError {
    pub(crate) fn fs(path: &Path, err: &std::io::Error) -> Self {
        Self::Filesystem {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(at: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::ManifestParse {
            at: at.into(),
            message: err.to_string(),
        }
    }
}

impl From<NameError> for InstallError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::MissingNamespace(name) => Self::InvalidName { name },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_error_shows_child_message_verbatim() {
        let leaf = InstallError::FileTransfer {
            url: "https://remote/x/y/1.0.0/index.js".to_string(),
            reason: "HTTP 500".to_string(),
        };
        let wrapped = InstallError::Dependency {
            name: "x/y".to_string(),
            message: leaf.to_string(),
        };

        assert_eq!(wrapped.to_string(), leaf.to_string());
    }

    #[test]
    fn test_parse_error_names_its_source() {
        let err = serde_json::from_str::<crate::types::Manifest>("not json").unwrap_err();
        let wrapped = InstallError::parse("https://remote/a/b/master/component.json", &err);
        assert!(
            wrapped
                .to_string()
                .contains("https://remote/a/b/master/component.json")
        );
    }
}
