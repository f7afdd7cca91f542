//! Reporter trait for dependency injection
//!
//! This trait allows the install engine to report progress and status
//! without being coupled to a specific console or GUI implementation.
//! Completion and failure travel through the installer's return value;
//! everything here is informational.

use crate::types::{PackageName, Version};

/// Progress and status notifications emitted while a request tree runs.
pub trait Reporter: Send + Sync {
    /// A package install has started for real (it was not already present).
    fn installing(&self, name: &PackageName, version: &Version);

    /// The package is already installed locally; nothing was done.
    fn exists(&self, name: &PackageName, version: &Version);

    /// A manifest fetch has been issued against a candidate remote.
    fn fetching(&self, url: &str);

    /// A file download has started.
    fn file(&self, name: &PackageName, path: &str, url: &str);

    /// A dependency sub-install has been created.
    fn dependency(&self, parent: &PackageName, name: &str, version: &Version);

    /// The package finished installing, files and dependencies included.
    fn installed(&self, name: &PackageName, version: &Version);

    /// The package install failed and its partial output was rolled back.
    fn failed(&self, name: &PackageName, version: &Version, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn installing(&self, name: &PackageName, version: &Version) {
        (**self).installing(name, version);
    }
    fn exists(&self, name: &PackageName, version: &Version) {
        (**self).exists(name, version);
    }
    fn fetching(&self, url: &str) {
        (**self).fetching(url);
    }
    fn file(&self, name: &PackageName, path: &str, url: &str) {
        (**self).file(name, path, url);
    }
    fn dependency(&self, parent: &PackageName, name: &str, version: &Version) {
        (**self).dependency(parent, name, version);
    }
    fn installed(&self, name: &PackageName, version: &Version) {
        (**self).installed(name, version);
    }
    fn failed(&self, name: &PackageName, version: &Version, reason: &str) {
        (**self).failed(name, version, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
}

/// A no-op reporter for silent operations (e.g., embedding, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn installing(&self, _: &PackageName, _: &Version) {}
    fn exists(&self, _: &PackageName, _: &Version) {}
    fn fetching(&self, _: &str) {}
    fn file(&self, _: &PackageName, _: &str, _: &str) {}
    fn dependency(&self, _: &PackageName, _: &str, _: &Version) {}
    fn installed(&self, _: &PackageName, _: &Version) {}
    fn failed(&self, _: &PackageName, _: &Version, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
}
