//! Exclusive access to a working directory

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use toybox_application::{ConfigurationSource, ResourceProvider, ToyError};
use tracing::debug;

/// Name of the lock file created inside a leased directory
pub const LOCK_FILE: &str = ".toybox.lock";

/// Leases a directory to one run at a time.
///
/// Acquisition creates a lock file inside the directory and fails when it
/// already exists; release removes it.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// A directory leased by [`DirectoryProvider`]
#[derive(Debug)]
pub struct DirectoryLease {
    root: PathBuf,
    lock: PathBuf,
}

impl DirectoryLease {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl ResourceProvider for DirectoryProvider {
    type Resource = DirectoryLease;

    fn name(&self) -> &str {
        "directory"
    }

    async fn acquire(&self, _source: &dyn ConfigurationSource) -> Result<DirectoryLease, ToyError> {
        let metadata = tokio::fs::metadata(&self.root).await.map_err(|e| {
            ToyError::msg(format!("{} is not accessible: {e}", self.root.display()))
        })?;
        if !metadata.is_dir() {
            return Err(ToyError::msg(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let lock = self.root.join(LOCK_FILE);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock)
            .await
        {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(ToyError::msg(format!(
                    "{} is locked by another run",
                    self.root.display()
                )));
            }
            Err(e) => return Err(e.into()),
        }

        debug!(root = %self.root.display(), "Leased directory");
        Ok(DirectoryLease {
            root: self.root.clone(),
            lock,
        })
    }

    async fn release(&self, lease: DirectoryLease) -> Result<(), ToyError> {
        tokio::fs::remove_file(&lease.lock).await?;
        debug!(root = %lease.root.display(), "Released directory");
        Ok(())
    }
}
