//! runtime::mock
//!
//! Mock runtime implementation for deterministic testing.
//!
//! # Design
//!
//! The mock runtime keeps containers in memory and allows configuring
//! failure scenarios. Container IDs are derived deterministically (a hex
//! digest, like real runtimes hand out) so tests can exercise prefix
//! matching without fixture files.
//!
//! # Example
//!
//! ```
//! use caskwork::core::types::Namespace;
//! use caskwork::runtime::{MockRuntime, Runtime};
//!
//! # tokio_test::block_on(async {
//! let ns = Namespace::new("default").unwrap();
//! let runtime = MockRuntime::new();
//! let id = runtime.add_container(&ns, "web");
//!
//! let containers = runtime.list_containers(&ns).await.unwrap();
//! assert_eq!(containers.len(), 1);
//! assert_eq!(containers[0].id, id);
//! assert_eq!(containers[0].name(), Some("web"));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::traits::{
    ContainerDetail, ContainerSummary, ProcessStatus, Runtime, RuntimeError, NAME_LABEL,
};
use crate::core::types::{ContainerId, Namespace};

/// Mock runtime for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRuntime {
    inner: Arc<Mutex<MockRuntimeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockRuntimeInner {
    /// Containers keyed by namespace.
    containers: HashMap<String, Vec<MockContainer>>,
    /// Counter feeding deterministic id derivation.
    created: u64,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded mutations for verification.
    operations: Vec<MockOperation>,
}

/// A container held by the mock.
#[derive(Debug, Clone)]
struct MockContainer {
    id: ContainerId,
    labels: HashMap<String, String>,
    image: String,
    status: ProcessStatus,
    pid: Option<u32>,
    created_at: DateTime<Utc>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_containers with the given error.
    ListContainers(RuntimeError),
    /// Fail labels with the given error.
    Labels(RuntimeError),
    /// Fail set_labels with the given error.
    SetLabels(RuntimeError),
    /// Fail inspect with the given error.
    Inspect(RuntimeError),
    /// Fail stop_task with the given error.
    StopTask(RuntimeError),
    /// Fail start_task with the given error.
    StartTask(RuntimeError),
}

/// Recorded mutation for test verification.
#[derive(Debug, Clone)]
pub enum MockOperation {
    SetLabels {
        namespace: String,
        id: ContainerId,
        labels: HashMap<String, String>,
    },
    StopTask {
        id: ContainerId,
        timeout: Duration,
    },
    StartTask {
        id: ContainerId,
    },
}

impl MockRuntime {
    /// Create a new empty mock runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running container with the given display name.
    ///
    /// The id is a deterministic 64-character hex digest derived from the
    /// name and an insertion counter.
    pub fn add_container(&self, ns: &Namespace, name: &str) -> ContainerId {
        self.add_container_with_status(ns, name, ProcessStatus::Running)
    }

    /// Add a container with an explicit task status.
    pub fn add_container_with_status(
        &self,
        ns: &Namespace,
        name: &str,
        status: ProcessStatus,
    ) -> ContainerId {
        let mut inner = self.inner.lock().unwrap();
        inner.created += 1;
        let digest = Sha256::digest(format!("{}/{}/{}", ns, name, inner.created).as_bytes());
        let id = ContainerId::new(hex::encode(digest)).expect("hex digest is a valid id");
        let mut labels = HashMap::new();
        labels.insert(NAME_LABEL.to_string(), name.to_string());
        let pid = match status {
            ProcessStatus::Running | ProcessStatus::Paused => Some(4000 + inner.created as u32),
            _ => None,
        };
        inner
            .containers
            .entry(ns.as_str().to_string())
            .or_default()
            .push(MockContainer {
                id: id.clone(),
                labels,
                image: "docker.io/library/alpine:latest".to_string(),
                status,
                pid,
                created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
                    .expect("valid epoch"),
            });
        id
    }

    /// Add a container with an explicit id and no name label.
    ///
    /// Useful for exercising containers that predate name management.
    pub fn add_unnamed_container(&self, ns: &Namespace, id: &ContainerId) {
        let mut inner = self.inner.lock().unwrap();
        inner.created += 1;
        let created = inner.created;
        inner
            .containers
            .entry(ns.as_str().to_string())
            .or_default()
            .push(MockContainer {
                id: id.clone(),
                labels: HashMap::new(),
                image: "docker.io/library/alpine:latest".to_string(),
                status: ProcessStatus::Running,
                pid: Some(4000 + created as u32),
                created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
                    .expect("valid epoch"),
            });
    }

    /// Configure the failing operation. The failure applies to every
    /// matching call until cleared.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Clear a configured failure.
    pub fn clear_fail_on(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Get the recorded mutations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    fn find(
        inner: &MockRuntimeInner,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<MockContainer, RuntimeError> {
        inner
            .containers
            .get(ns.as_str())
            .and_then(|list| list.iter().find(|c| &c.id == id))
            .cloned()
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.to_string()))
    }
}

#[async_trait]
impl Runtime for MockRuntime {
    async fn list_containers(
        &self,
        ns: &Namespace,
    ) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::ListContainers(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner
            .containers
            .get(ns.as_str())
            .map(|list| {
                list.iter()
                    .map(|c| ContainerSummary {
                        id: c.id.clone(),
                        labels: c.labels.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Labels(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(Self::find(&inner, ns, id)?.labels)
    }

    async fn set_labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        labels: HashMap<String, String>,
    ) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::SetLabels(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let container = inner
            .containers
            .get_mut(ns.as_str())
            .and_then(|list| list.iter_mut().find(|c| &c.id == id))
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.to_string()))?;
        container.labels = labels.clone();
        inner.operations.push(MockOperation::SetLabels {
            namespace: ns.as_str().to_string(),
            id: id.clone(),
            labels,
        });
        Ok(())
    }

    async fn inspect(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ContainerDetail, RuntimeError> {
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Inspect(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let c = Self::find(&inner, ns, id)?;
        Ok(ContainerDetail {
            id: c.id,
            labels: c.labels,
            image: c.image,
            status: c.status,
            pid: c.pid,
            created_at: c.created_at,
        })
    }

    async fn task_status(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ProcessStatus, RuntimeError> {
        let inner = self.inner.lock().unwrap();
        Ok(Self::find(&inner, ns, id)?.status)
    }

    async fn stop_task(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::StopTask(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let container = inner
            .containers
            .get_mut(ns.as_str())
            .and_then(|list| list.iter_mut().find(|c| &c.id == id))
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.to_string()))?;
        container.status = ProcessStatus::Stopped;
        container.pid = None;
        inner.operations.push(MockOperation::StopTask {
            id: id.clone(),
            timeout,
        });
        Ok(())
    }

    async fn start_task(&self, ns: &Namespace, id: &ContainerId) -> Result<(), RuntimeError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::StartTask(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let created = inner.created;
        let container = inner
            .containers
            .get_mut(ns.as_str())
            .and_then(|list| list.iter_mut().find(|c| &c.id == id))
            .ok_or_else(|| RuntimeError::ContainerNotFound(id.to_string()))?;
        container.status = ProcessStatus::Running;
        container.pid = Some(5000 + created as u32);
        inner.operations.push(MockOperation::StartTask { id: id.clone() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Namespace {
        Namespace::new("default").unwrap()
    }

    #[tokio::test]
    async fn ids_are_deterministic_hex_digests() {
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn containers_are_scoped_by_namespace() {
        let runtime = MockRuntime::new();
        runtime.add_container(&ns(), "web");
        let other = Namespace::new("other").unwrap();
        assert!(runtime.list_containers(&other).await.unwrap().is_empty());
        assert_eq!(runtime.list_containers(&ns()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_labels_replaces_and_records() {
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");

        let mut labels = HashMap::new();
        labels.insert(NAME_LABEL.to_string(), "api".to_string());
        runtime.set_labels(&ns(), &id, labels).await.unwrap();

        let read = runtime.labels(&ns(), &id).await.unwrap();
        assert_eq!(read.get(NAME_LABEL).map(String::as_str), Some("api"));
        assert_eq!(runtime.operations().len(), 1);
    }

    #[tokio::test]
    async fn unknown_container_is_not_found() {
        let runtime = MockRuntime::new();
        let id = ContainerId::new("beef").unwrap();
        let err = runtime.labels(&ns(), &id).await.unwrap_err();
        assert!(matches!(err, RuntimeError::ContainerNotFound(_)));
    }

    #[tokio::test]
    async fn fail_on_inspect() {
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        runtime.fail_on(FailOn::Inspect(RuntimeError::NetworkError(
            "bridge down".into(),
        )));
        let err = runtime.inspect(&ns(), &id).await.unwrap_err();
        assert!(matches!(err, RuntimeError::NetworkError(_)));
    }

    #[tokio::test]
    async fn stop_then_start_round_trips_status() {
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");

        runtime
            .stop_task(&ns(), &id, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(
            runtime.task_status(&ns(), &id).await.unwrap(),
            ProcessStatus::Stopped
        );

        runtime.start_task(&ns(), &id).await.unwrap();
        assert_eq!(
            runtime.task_status(&ns(), &id).await.unwrap(),
            ProcessStatus::Running
        );
    }
}
