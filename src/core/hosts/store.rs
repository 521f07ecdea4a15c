//! core::hosts::store
//!
//! File-backed storage for hosts metadata records.
//!
//! # Architecture
//!
//! One JSON file per container, routed through [`StorePaths`]. The store
//! exposes exactly the operations the rename coordinator needs: existence
//! check, read, and overwrite of an existing record. There is no create
//! operation - a write against a container that never had a record fails
//! rather than silently enabling host-record management.
//!
//! # Example
//!
//! ```ignore
//! let store = HostsStore::new(paths);
//! if let Some(mut meta) = store.read(&ns, &id)? {
//!     meta.name = new_name.to_string();
//!     store.write(&ns, &id, &meta)?;
//! }
//! ```

use std::io::ErrorKind;

use thiserror::Error;

use super::schema::HostsMeta;
use crate::core::paths::StorePaths;
use crate::core::types::{ContainerId, Namespace};

/// Errors from hosts metadata storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the container (write path only; a missing
    /// record on read is `Ok(None)`).
    #[error("no hosts metadata record for container: {0}")]
    NoRecord(String),

    /// The record exists but is not valid JSON.
    #[error("failed to parse hosts metadata: {0}")]
    ParseError(String),

    /// The record could not be serialized.
    #[error("failed to serialize hosts metadata: {0}")]
    SerializeError(String),

    /// Filesystem failure.
    #[error("hosts metadata i/o error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Hosts metadata store over one data root.
#[derive(Debug, Clone)]
pub struct HostsStore {
    paths: StorePaths,
}

impl HostsStore {
    /// Create a store routed through the given paths.
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Get the path helper this store routes through.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Check whether a container has a hosts metadata record.
    pub fn exists(&self, ns: &Namespace, id: &ContainerId) -> bool {
        self.paths.meta_path(ns, id).is_file()
    }

    /// Read a container's record.
    ///
    /// Returns `Ok(None)` when the container has no record - host-record
    /// management is optional and absence is not an error.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ParseError`] if the record is malformed JSON
    /// - [`StoreError::IoError`] for filesystem failures other than
    ///   a missing file
    pub fn read(&self, ns: &Namespace, id: &ContainerId) -> Result<Option<HostsMeta>, StoreError> {
        let path = self.paths.meta_path(ns, id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::IoError(err)),
        };
        let meta = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::ParseError(format!("{}: {e}", path.display())))?;
        Ok(Some(meta))
    }

    /// Overwrite a container's existing record.
    ///
    /// The record's directory must already exist; this store never creates
    /// it. Writing the same content twice is a no-op in effect, which is
    /// what makes record updates retry-safe.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NoRecord`] if the container has no record
    /// - [`StoreError::SerializeError`] if the record cannot be serialized
    /// - [`StoreError::IoError`] for filesystem failures
    pub fn write(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        meta: &HostsMeta,
    ) -> Result<(), StoreError> {
        let path = self.paths.meta_path(ns, id);
        if !path.is_file() {
            return Err(StoreError::NoRecord(id.to_string()));
        }
        let json = serde_json::to_vec(meta).map_err(|e| StoreError::SerializeError(e.to_string()))?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
