//! opal-core - the component installation engine.
//!
//! Given a `name@version` identity, the engine resolves a manifest from an
//! ordered list of candidate remotes, downloads the files it references, and
//! recursively installs its declared dependencies. Failures roll the
//! package's partial output back off disk before surfacing.
//!
//! # Architecture
//!
//! - [`install::Installer`] owns the shared request context (transport,
//!   single-flight registry, reporter) and mints [`install::InstallRequest`]s.
//! - [`io::transport::Transport`] performs HTTP GETs, decompressing by the
//!   response's declared content encoding.
//! - [`batch::Batch`] runs independent async tasks under an optional
//!   concurrency cap with all-must-run semantics.
//! - [`io::sink::Sink`] memoizes directory creation and handles rollback.
//! - [`registry::Registry`] deduplicates concurrent requests for the same
//!   identity, handing duplicates the real outcome of the first.

pub mod batch;
pub mod error;
pub mod install;
pub mod io;
pub mod registry;
pub mod remotes;
pub mod reporter;
pub mod types;

pub use error::InstallError;
pub use install::{InstallOptions, InstallRequest, Installed, Installer};
pub use io::transport::{BasicAuth, Transport, TransportError};
pub use reporter::{NullReporter, Reporter};

/// User Agent string for outgoing requests
pub const USER_AGENT: &str = concat!("opal-core/", env!("CARGO_PKG_VERSION"));
