//! core::lock
//!
//! Per-container advisory lock.
//!
//! # Architecture
//!
//! The hosts metadata record is a plain file with no locking of its own,
//! so two rename invocations against the same container from independent
//! processes would race on its read-modify-write. The container lock
//! serializes the rename critical section across processes.
//!
//! # Storage
//!
//! - `<data_root>/locks/<namespace>/<container-id>.lock` - lock file with
//!   an OS-level exclusive lock
//!
//! The lock file lives outside the `etchosts` tree: taking a lock must
//! never create a hosts record directory.
//!
//! # Invariants
//!
//! - Lock is held for the whole rename critical section
//! - Lock is automatically released on drop (RAII pattern)
//! - Lock acquisition is non-blocking (fails fast if locked)

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::StorePaths;
use crate::core::types::{ContainerId, Namespace};

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("container is locked by another cask process")]
    AlreadyLocked,

    /// Failed to create the lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on one container.
///
/// Released automatically when dropped, even if the operation panics.
///
/// # Example
///
/// ```ignore
/// let _lock = ContainerLock::acquire(&paths, &ns, &id)?;
/// // ... mutate labels and the hosts record ...
/// // lock released on drop
/// ```
#[derive(Debug)]
pub struct ContainerLock {
    /// Path to the lock file.
    path: PathBuf,
    /// Open handle holding the lock while Some.
    file: Option<File>,
}

impl ContainerLock {
    /// Attempt to acquire the lock for one container.
    ///
    /// Uses OS-level file locking via `fs2`, which works across
    /// processes. Non-blocking: if another process holds the lock this
    /// returns [`LockError::AlreadyLocked`] immediately.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(
        paths: &StorePaths,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<Self, LockError> {
        let locks_dir = paths.locks_dir(ns);
        fs::create_dir_all(&locks_dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", locks_dir.display(), e))
        })?;

        let path = paths.lock_path(ns, id);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ContainerLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
