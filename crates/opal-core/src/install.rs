//! The package installer: one request per `name@version` identity.
//!
//! An install walks a fixed sequence: validate the name, join the
//! single-flight registry, check for an existing local manifest, resolve a
//! manifest across the candidate remotes, then fan out three concurrent
//! siblings (dependency sub-installs, the manifest write, file downloads).
//! Any sibling failure rolls the package's whole directory back off disk
//! before the error surfaces.
//!
//! # Implementation Note: Completion is a value, not an event
//!
//! Sub-installs run concurrently with their siblings, so completion is
//! observed by awaiting [`InstallRequest::run`], which resolves to a
//! discriminated [`Installed`] outcome. Progress (a file download starting,
//! a dependency being discovered) goes through the injected [`Reporter`]
//! and never through the return channel.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use crate::batch::Batch;
use crate::error::InstallError;
use crate::io::sink::Sink;
use crate::io::transport::{BasicAuth, Transport, TransportError};
use crate::registry::{Flight, Registry};
use crate::remotes::{Remote, RemoteList};
use crate::reporter::Reporter;
use crate::types::{MANIFEST_FILE, Manifest, PackageName, Version};

/// How an install request concluded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installed {
    /// The package was fetched and written in full.
    Fresh,
    /// A local manifest already existed and `force` was not set; nothing
    /// was fetched or written.
    AlreadyInstalled,
    /// An identical request was already in flight in this run; this one
    /// awaited the first's success instead of repeating the work.
    Deduplicated,
}

/// Outcome recorded in the single-flight registry for duplicate requesters.
pub type Outcome = Result<Installed, InstallError>;

/// Configuration for an install request tree.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Destination root; each package lands in `dest/{slug}`.
    pub dest: PathBuf,
    /// Candidate remote base URLs, tried in order.
    pub remotes: RemoteList,
    /// Reinstall even when a local manifest already exists.
    pub force: bool,
    /// Optional proxy URL applied to all outgoing requests.
    pub proxy: Option<String>,
    /// Opaque per-host credentials attached to outgoing requests.
    pub auth: HashMap<String, BasicAuth>,
    /// Cap on concurrent file downloads per package. Zero is unbounded.
    /// Dependency sub-installs do not inherit the cap.
    pub concurrency: usize,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            dest: PathBuf::from("components"),
            remotes: RemoteList::default(),
            force: false,
            proxy: None,
            auth: HashMap::new(),
            concurrency: 0,
        }
    }
}

/// State shared by every request in one install tree.
struct Context {
    dest: PathBuf,
    remotes: RemoteList,
    force: bool,
    transport: Transport,
    registry: Registry<Outcome>,
    reporter: Arc<dyn Reporter>,
}

/// Entry point: owns the shared context and mints install requests.
///
/// Roots created from the same installer share the transport connection
/// pool and the single-flight registry, so overlapping dependency trees
/// are fetched once.
pub struct Installer {
    ctx: Arc<Context>,
    concurrency: usize,
}

impl Installer {
    /// Build an installer from options, wiring the reporter into every
    /// request it will mint.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the HTTP client cannot be built,
    /// for example because the proxy URL is malformed.
    pub fn new(
        options: InstallOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, TransportError> {
        let transport = Transport::new(options.proxy.as_deref(), options.auth)?;
        Ok(Self {
            concurrency: options.concurrency,
            ctx: Arc::new(Context {
                dest: options.dest,
                remotes: options.remotes,
                force: options.force,
                transport,
                registry: Registry::new(),
                reporter,
            }),
        })
    }

    /// Create a request for one package identity. The request is inert
    /// until [`InstallRequest::run`] is awaited.
    pub fn request(&self, name: impl Into<String>, version: Version) -> InstallRequest {
        InstallRequest {
            name: name.into(),
            version,
            concurrency: self.concurrency,
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl fmt::Debug for Installer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installer")
            .field("dest", &self.ctx.dest)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

/// One installation attempt for a single `name@version` identity.
pub struct InstallRequest {
    name: String,
    version: Version,
    concurrency: usize,
    ctx: Arc<Context>,
}

impl InstallRequest {
    /// The raw (not yet validated) component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The requested version ref.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Run the installation to completion.
    ///
    /// Returns boxed so dependency sub-installs can recurse through the
    /// same entry point.
    ///
    /// # Errors
    ///
    /// Any [`InstallError`]; every variant except
    /// [`InstallError::InvalidName`] has already rolled back this package's
    /// partial output when it surfaces.
    pub fn run(self) -> BoxFuture<'static, Result<Installed, InstallError>> {
        async move {
            // Validation happens before any I/O, registry included.
            let name = PackageName::parse(&self.name)?;
            let key = format!("{name}@{}", self.version);
            debug!("installing {key}");

            match self.ctx.registry.join(&key).await {
                Flight::Leader(token) => {
                    let outcome = self.perform(&name).await;
                    token.publish(outcome.clone());
                    outcome
                }
                Flight::Follower(waiter) => {
                    debug!("{key} already in flight, awaiting its outcome");
                    match waiter.wait().await {
                        Some(Ok(_)) => Ok(Installed::Deduplicated),
                        Some(Err(err)) => Err(err),
                        None => Err(InstallError::Dependency {
                            name: self.name.clone(),
                            message: format!("concurrent install of {key} was abandoned"),
                        }),
                    }
                }
            }
        }
        .boxed()
    }

    /// The leader path: existence check, manifest resolution, fan-out.
    async fn perform(&self, name: &PackageName) -> Result<Installed, InstallError> {
        let dir = self.ctx.dest.join(name.slug());
        let manifest_path = dir.join(MANIFEST_FILE);

        match tokio::fs::read_to_string(&manifest_path).await {
            Ok(text) => {
                // An existing manifest that no longer parses is surfaced,
                // not silently treated as "not installed".
                Manifest::from_json(&text)
                    .map_err(|err| InstallError::parse(manifest_path.display().to_string(), &err))?;
                if !self.ctx.force {
                    debug!("{name}@{} already installed", self.version);
                    self.ctx.reporter.exists(name, &self.version);
                    return Ok(Installed::AlreadyInstalled);
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(InstallError::fs(&manifest_path, &err)),
        }

        self.ctx.reporter.installing(name, &self.version);
        let sink = Sink::new();

        match self.fetch_and_populate(name, &dir, &sink).await {
            Ok(()) => {
                self.ctx.reporter.installed(name, &self.version);
                Ok(Installed::Fresh)
            }
            Err(err) => {
                self.ctx
                    .reporter
                    .failed(name, &self.version, &err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch_and_populate(
        &self,
        name: &PackageName,
        dir: &Path,
        sink: &Sink,
    ) -> Result<(), InstallError> {
        let (remote, manifest) = self.resolve_manifest(name, dir, sink).await?;
        match self.populate(name, &remote, manifest, dir, sink).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.rollback(dir, sink).await;
                Err(err)
            }
        }
    }

    /// Try each candidate remote in order until one yields a manifest.
    ///
    /// Client-range statuses (400-499) advance to the next candidate; any
    /// other failure, including a manifest that does not parse, is fatal.
    /// Each failed attempt destroys whatever partial destination exists.
    async fn resolve_manifest(
        &self,
        name: &PackageName,
        dir: &Path,
        sink: &Sink,
    ) -> Result<(Remote, Manifest), InstallError> {
        for remote in self.ctx.remotes.iter() {
            let url = remote.manifest_url(name, &self.version);
            debug!("fetching {url}");
            self.ctx.reporter.fetching(&url);

            match self.ctx.transport.get_text(&url).await {
                Ok(body) => {
                    debug!("got {url}");
                    return match Manifest::from_json(&body) {
                        Ok(manifest) => Ok((remote, manifest)),
                        Err(err) => {
                            self.rollback(dir, sink).await;
                            Err(InstallError::parse(url, &err))
                        }
                    };
                }
                Err(err) => {
                    self.rollback(dir, sink).await;
                    if err.is_client_error() {
                        debug!("{url} answered {err}, trying next remote");
                        continue;
                    }
                    return Err(InstallError::ManifestNotFound {
                        name: name.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(InstallError::ManifestNotFound {
            name: name.to_string(),
            reason: format!(
                "all {} candidate remotes answered in the client error range",
                self.ctx.remotes.len()
            ),
        })
    }

    /// Fan out the three concurrent siblings: dependency sub-installs, the
    /// manifest write, and the file downloads.
    async fn populate(
        &self,
        name: &PackageName,
        remote: &Remote,
        mut manifest: Manifest,
        dir: &Path,
        sink: &Sink,
    ) -> Result<(), InstallError> {
        let files: Vec<String> = manifest.files().into_iter().map(str::to_string).collect();
        manifest.ensure_repo(&remote.repo_url(name));

        let manifest_path = dir.join(MANIFEST_FILE);
        let rendered = manifest
            .to_json_pretty()
            .map_err(|err| InstallError::parse(manifest_path.display().to_string(), &err))?;

        let mut batch = Batch::new();

        if let Some(deps) = manifest.dependencies.clone() {
            batch.push(self.install_dependencies(name, deps));
        }

        batch.push(async move {
            sink.ensure_dir(dir).await?;
            sink.write(&manifest_path, rendered.as_bytes()).await
        });

        batch.push(async move {
            sink.ensure_dir(dir).await?;
            self.fetch_files(name, remote, &files, dir, sink).await
        });

        batch.run().await
    }

    /// Install each declared dependency as an independent sibling request
    /// sharing this tree's destination, remotes, force flag, and transport.
    async fn install_dependencies(
        &self,
        parent: &PackageName,
        deps: BTreeMap<String, String>,
    ) -> Result<(), InstallError> {
        let mut batch = Batch::new();
        for (dep_name, dep_version) in deps {
            let version = Version::new(dep_version);
            debug!("dep {dep_name}@{version}");
            self.ctx.reporter.dependency(parent, &dep_name, &version);

            let child = InstallRequest {
                name: dep_name.clone(),
                version,
                concurrency: 0,
                ctx: Arc::clone(&self.ctx),
            };
            batch.push(async move {
                child
                    .run()
                    .await
                    .map(|_| ())
                    .map_err(|err| InstallError::Dependency {
                        name: dep_name,
                        message: err.to_string(),
                    })
            });
        }
        batch.run().await
    }

    /// Download every file in the expanded list, bounded by the request's
    /// concurrency cap.
    async fn fetch_files(
        &self,
        name: &PackageName,
        remote: &Remote,
        files: &[String],
        dir: &Path,
        sink: &Sink,
    ) -> Result<(), InstallError> {
        let mut batch = Batch::with_concurrency(self.concurrency);
        for file in files {
            batch.push(self.fetch_file(name, remote, file, dir, sink));
        }
        batch.run().await
    }

    async fn fetch_file(
        &self,
        name: &PackageName,
        remote: &Remote,
        file: &str,
        dir: &Path,
        sink: &Sink,
    ) -> Result<(), InstallError> {
        let url = remote.file_url(name, &self.version, file);
        debug!("fetching {url}");
        self.ctx.reporter.file(name, file, &url);

        let dest = dir.join(file);
        if let Some(parent) = dest.parent() {
            sink.ensure_dir(parent).await?;
        }
        self.ctx
            .transport
            .download(&url, &dest)
            .await
            .map_err(|err| InstallError::FileTransfer {
                url,
                reason: err.to_string(),
            })
    }

    /// Best-effort destruction of the package directory. A rollback failure
    /// is reported through the error channel in addition to, never instead
    /// of, the error that triggered it.
    async fn rollback(&self, dir: &Path, sink: &Sink) {
        debug!("rolling back {}", dir.display());
        if let Err(err) = sink.destroy(dir).await {
            self.ctx.reporter.error(&format!("rollback failed: {err}"));
        }
    }
}

impl fmt::Debug for InstallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallRequest")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}
