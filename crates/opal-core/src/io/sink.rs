//! Filesystem sink: memoized directory creation, writes, and rollback.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::error::InstallError;

/// Destination-side filesystem operations for one install request.
///
/// Directory creation is memoized per sink so concurrent file downloads do
/// not issue redundant `create_dir_all` calls for shared parents.
#[derive(Debug, Default)]
pub struct Sink {
    created: Mutex<HashSet<PathBuf>>,
}

impl Sink {
    /// Create a sink with an empty directory memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `dir` and any missing parents, unless this sink already did.
    pub async fn ensure_dir(&self, dir: &Path) -> Result<(), InstallError> {
        {
            let created = self.created.lock().await;
            if created.contains(dir) {
                return Ok(());
            }
        }
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|err| InstallError::fs(dir, &err))?;
        self.created.lock().await.insert(dir.to_path_buf());
        Ok(())
    }

    /// Write `contents` to `path`, creating parent directories first and
    /// overwriting any existing file.
    pub async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), InstallError> {
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent).await?;
        }
        tracing::debug!("write {}", path.display());
        tokio::fs::write(path, contents)
            .await
            .map_err(|err| InstallError::fs(path, &err))
    }

    /// Recursively delete `root`, forgetting the directory memo.
    ///
    /// A missing tree counts as success; rollback of work that never
    /// happened is a no-op.
    pub async fn destroy(&self, root: &Path) -> Result<(), InstallError> {
        self.created.lock().await.clear();
        match tokio::fs::remove_dir_all(root).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InstallError::fs(root, &err)),
        }
    }
}
