//! core::rename
//!
//! Rename coordination across the label store and the hosts store.
//!
//! # Architecture
//!
//! A rename must leave two independent stores agreeing on the container's
//! name: the runtime's label set (authoritative once committed) and the
//! optional hosts metadata record. There is no transaction spanning both,
//! so the coordinator orders the steps to keep the failure window safe:
//!
//! 1. Acquire the per-container lock
//! 2. Load the current label set
//! 3. Check the target name is not carried by another container
//! 4. If a hosts record exists: load it, set its name, persist it
//! 5. Set the name label and commit the label set
//!
//! The record update precedes the label commit: on partial failure the
//! authoritative label (read by every other command) has not advanced.
//! Every step is idempotent, so re-running a failed rename with the same
//! arguments converges.
//!
//! # Invariants
//!
//! - After success, the name label and any hosts record agree
//! - A container without a hosts record never gains one here
//! - On failure before step 5, the authoritative name is unchanged

use thiserror::Error;

use crate::core::hosts::{HostsStore, StoreError};
use crate::core::lock::{ContainerLock, LockError};
use crate::core::types::{ContainerId, Namespace};
use crate::runtime::{Runtime, RuntimeError, NAME_LABEL};

/// Errors from rename coordination.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The target name is empty.
    #[error("new name cannot be empty")]
    EmptyName,

    /// Another container in the namespace already carries the target name.
    #[error("name {name:?} is already used by container {other}")]
    NameConflict {
        /// The requested name
        name: String,
        /// The container already carrying it
        other: ContainerId,
    },

    /// The per-container lock could not be acquired.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Label load or commit failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Hosts record load or persist failed.
    #[error(transparent)]
    Hosts(#[from] StoreError),
}

/// What a completed rename did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    /// The name the container carried before, if any.
    pub previous: Option<String>,
    /// True when the target name equals the current name. The rename
    /// still runs to completion (it is idempotent); callers surface this
    /// as a warning, not an error.
    pub same_name: bool,
}

/// Coordinates renames across the label store and the hosts store.
///
/// # Example
///
/// ```
/// use caskwork::core::hosts::HostsStore;
/// use caskwork::core::paths::StorePaths;
/// use caskwork::core::rename::RenameCoordinator;
/// use caskwork::core::types::Namespace;
/// use caskwork::runtime::MockRuntime;
///
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let ns = Namespace::new("default").unwrap();
/// let runtime = MockRuntime::new();
/// let id = runtime.add_container(&ns, "web");
///
/// let paths = StorePaths::new(dir.path().to_path_buf()).unwrap();
/// let coordinator = RenameCoordinator::new(&runtime, HostsStore::new(paths), ns);
/// let outcome = coordinator.rename(&id, "api").await.unwrap();
/// assert_eq!(outcome.previous.as_deref(), Some("web"));
/// # });
/// ```
pub struct RenameCoordinator<'a> {
    runtime: &'a dyn Runtime,
    hosts: HostsStore,
    namespace: Namespace,
}

impl<'a> RenameCoordinator<'a> {
    /// Create a coordinator over the given runtime and hosts store.
    pub fn new(runtime: &'a dyn Runtime, hosts: HostsStore, namespace: Namespace) -> Self {
        Self {
            runtime,
            hosts,
            namespace,
        }
    }

    /// Rename one container.
    ///
    /// See the module documentation for step ordering and failure
    /// behavior. Renaming to the current name is not an error; the
    /// outcome's `same_name` flag tells the caller to warn.
    ///
    /// # Errors
    ///
    /// - [`RenameError::NameConflict`] when another container already
    ///   carries the target name
    /// - [`RenameError::Runtime`] when label load or commit fails
    /// - [`RenameError::Hosts`] when the record update fails (the label
    ///   has not been touched at that point)
    /// - [`RenameError::Lock`] when another rename holds the container
    pub async fn rename(
        &self,
        id: &ContainerId,
        new_name: &str,
    ) -> Result<RenameOutcome, RenameError> {
        if new_name.is_empty() {
            return Err(RenameError::EmptyName);
        }

        let _lock = ContainerLock::acquire(self.hosts.paths(), &self.namespace, id)?;

        let mut labels = self.runtime.labels(&self.namespace, id).await?;
        let previous = labels.get(NAME_LABEL).cloned();
        let same_name = previous.as_deref() == Some(new_name);

        self.check_conflict(id, new_name).await?;

        // Hosts record update, only where a record already exists. The
        // record must never be created as a side effect of rename.
        if let Some(mut meta) = self.hosts.read(&self.namespace, id)? {
            meta.name = new_name.to_string();
            self.hosts.write(&self.namespace, id, &meta)?;
        }

        labels.insert(NAME_LABEL.to_string(), new_name.to_string());
        self.runtime
            .set_labels(&self.namespace, id, labels)
            .await?;

        Ok(RenameOutcome {
            previous,
            same_name,
        })
    }

    /// Fail when another container in the namespace already carries
    /// `new_name` as its name label.
    async fn check_conflict(&self, id: &ContainerId, new_name: &str) -> Result<(), RenameError> {
        let containers = self.runtime.list_containers(&self.namespace).await?;
        for container in containers {
            if &container.id != id && container.name() == Some(new_name) {
                return Err(RenameError::NameConflict {
                    name: new_name.to_string(),
                    other: container.id,
                });
            }
        }
        Ok(())
    }
}
