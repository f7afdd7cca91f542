//! opal - a component package installer
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Installs web components from raw-file remotes into a local `components/`
//! directory. Given `owner/name[@version]` specs (or the dependency map of
//! the project's own `component.json`), each root is installed concurrently
//! and independently: one root failing does not abort its siblings.

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "opal")]
#[command(version = env!("OPAL_VERSION"), about = "opal - install web components from raw-file remotes")]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install components, or this project's declared dependencies
    Install {
        /// Component spec(s): owner/name or owner/name@version.
        /// With no specs, installs the dependencies of ./component.json
        packages: Vec<String>,
        /// Destination directory for installed components
        #[arg(short, long, default_value = "components")]
        out: PathBuf,
        /// Reinstall components that are already present
        #[arg(short, long)]
        force: bool,
        /// Candidate remote base URL, repeatable, tried in order
        #[arg(short, long = "remote")]
        remotes: Vec<String>,
        /// Proxy URL applied to all outgoing requests
        #[arg(long)]
        proxy: Option<String>,
        /// Maximum concurrent file downloads per component (0 = unbounded)
        #[arg(short, long, default_value_t = 0)]
        concurrency: usize,
        /// Also install development dependencies from ./component.json
        #[arg(short, long)]
        dev: bool,
    },
}
