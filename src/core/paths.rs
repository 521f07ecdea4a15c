//! core::paths
//!
//! Centralized path routing for the local data store.
//!
//! # Architecture
//!
//! All local storage locations are routed through a single helper so the
//! hosts metadata layout is computed in exactly one place. No code outside
//! this module may join store paths by hand.
//!
//! # Storage Layout
//!
//! All Cask data lives under the configured data root:
//! - `etchosts/<namespace>/<container-id>/meta.json` - hosts metadata record
//! - `locks/<namespace>/<container-id>.lock` - per-container advisory lock
//!
//! # Example
//!
//! ```
//! use caskwork::core::paths::StorePaths;
//! use caskwork::core::types::{ContainerId, Namespace};
//! use std::path::PathBuf;
//!
//! let paths = StorePaths::new(PathBuf::from("/var/lib/cask")).unwrap();
//! let ns = Namespace::new("default").unwrap();
//! let id = ContainerId::new("8a9f2c").unwrap();
//!
//! assert_eq!(
//!     paths.meta_path(&ns, &id),
//!     PathBuf::from("/var/lib/cask/etchosts/default/8a9f2c/meta.json")
//! );
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{ContainerId, Namespace};

/// Directory under the data root holding hosts metadata records.
pub const HOSTS_DIR_BASENAME: &str = "etchosts";

/// File name of a container's hosts metadata record.
pub const META_JSON: &str = "meta.json";

/// Directory under the data root holding per-container lock files.
pub const LOCKS_DIR_BASENAME: &str = "locks";

/// Errors from store path construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The configured data root is empty.
    #[error("data root cannot be empty")]
    EmptyDataRoot,
}

/// Centralized path routing for the local data store.
///
/// # Invariants
///
/// - The data root is non-empty (validated at construction)
/// - Namespace and container id are validated types, so every derived
///   path is a fixed-depth descendant of the data root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    data_root: PathBuf,
}

impl StorePaths {
    /// Create a new StorePaths rooted at `data_root`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyDataRoot`] if the root is empty. An empty
    /// root is a configuration error and must fail fast rather than derive
    /// paths relative to the working directory.
    pub fn new(data_root: PathBuf) -> Result<Self, PathError> {
        if data_root.as_os_str().is_empty() {
            return Err(PathError::EmptyDataRoot);
        }
        Ok(Self { data_root })
    }

    /// Get the data root as a Path reference.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Get the root directory for hosts metadata records.
    pub fn hosts_dir(&self) -> PathBuf {
        self.data_root.join(HOSTS_DIR_BASENAME)
    }

    /// Get the directory holding one container's hosts metadata.
    ///
    /// This is `<data_root>/etchosts/<namespace>/<container-id>/`.
    pub fn container_hosts_dir(&self, ns: &Namespace, id: &ContainerId) -> PathBuf {
        self.hosts_dir().join(ns.as_str()).join(id.as_str())
    }

    /// Get the path to a container's hosts metadata record.
    ///
    /// This is `<data_root>/etchosts/<namespace>/<container-id>/meta.json`.
    pub fn meta_path(&self, ns: &Namespace, id: &ContainerId) -> PathBuf {
        self.container_hosts_dir(ns, id).join(META_JSON)
    }

    /// Get the directory holding per-container lock files for a namespace.
    pub fn locks_dir(&self, ns: &Namespace) -> PathBuf {
        self.data_root.join(LOCKS_DIR_BASENAME).join(ns.as_str())
    }

    /// Get the path to a container's lock file.
    ///
    /// This is `<data_root>/locks/<namespace>/<container-id>.lock`. The
    /// lock file is deliberately outside the `etchosts` tree so acquiring
    /// a lock never creates a hosts record directory.
    pub fn lock_path(&self, ns: &Namespace, id: &ContainerId) -> PathBuf {
        self.locks_dir(ns).join(format!("{}.lock", id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> StorePaths {
        StorePaths::new(PathBuf::from("/var/lib/cask")).unwrap()
    }

    fn ns() -> Namespace {
        Namespace::new("default").unwrap()
    }

    fn id() -> ContainerId {
        ContainerId::new("8a9f2c4e1b0d").unwrap()
    }

    #[test]
    fn empty_data_root_is_rejected() {
        assert_eq!(
            StorePaths::new(PathBuf::new()),
            Err(PathError::EmptyDataRoot)
        );
    }

    #[test]
    fn hosts_dir_layout() {
        assert_eq!(paths().hosts_dir(), PathBuf::from("/var/lib/cask/etchosts"));
    }

    #[test]
    fn meta_path_layout() {
        assert_eq!(
            paths().meta_path(&ns(), &id()),
            PathBuf::from("/var/lib/cask/etchosts/default/8a9f2c4e1b0d/meta.json")
        );
    }

    #[test]
    fn lock_path_layout() {
        assert_eq!(
            paths().lock_path(&ns(), &id()),
            PathBuf::from("/var/lib/cask/locks/default/8a9f2c4e1b0d.lock")
        );
    }

    #[test]
    fn lock_path_is_outside_hosts_tree() {
        let lock = paths().lock_path(&ns(), &id());
        assert!(!lock.starts_with(paths().hosts_dir()));
    }

    #[test]
    fn data_root_accessor() {
        assert_eq!(paths().data_root(), Path::new("/var/lib/cask"));
    }
}
