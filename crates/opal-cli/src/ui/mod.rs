//! Console reporter for install progress.

use opal_core::Reporter;
use opal_core::types::{PackageName, Version};

/// Prints install progress in the classic right-aligned verb style.
#[derive(Debug)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a reporter; `quiet` suppresses everything but errors.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn installing(&self, name: &PackageName, version: &Version) {
        if !self.quiet {
            println!("   install : {name}@{version}");
        }
    }

    fn exists(&self, name: &PackageName, version: &Version) {
        if !self.quiet {
            println!("    exists : {name}@{version}");
        }
    }

    fn fetching(&self, url: &str) {
        tracing::debug!("fetching {url}");
    }

    fn file(&self, name: &PackageName, path: &str, _url: &str) {
        if !self.quiet {
            println!("     fetch : {name}:{path}");
        }
    }

    fn dependency(&self, _parent: &PackageName, name: &str, version: &Version) {
        if !self.quiet {
            println!("       dep : {name}@{version}");
        }
    }

    fn installed(&self, name: &PackageName, version: &Version) {
        if !self.quiet {
            println!("  complete : {name}@{version}");
        }
    }

    fn failed(&self, name: &PackageName, version: &Version, reason: &str) {
        eprintln!("     error : {name}@{version}: {reason}");
    }

    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn warning(&self, msg: &str) {
        eprintln!("   warning : {msg}");
    }

    fn error(&self, msg: &str) {
        eprintln!("     error : {msg}");
    }
}
