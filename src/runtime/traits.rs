//! runtime::traits
//!
//! Runtime trait definition and the types that cross its boundary.
//!
//! # Design
//!
//! The `Runtime` trait is async because runtime operations involve network
//! I/O. All methods return `Result` so callers can distinguish transport
//! failures from missing containers.
//!
//! The trait is deliberately narrow: it covers exactly the operations the
//! resolver, the rename coordinator, and the container commands need.
//! Container creation, image handling, and process supervision are not
//! part of this interface.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{ContainerId, Namespace};

/// Well-known label key carrying a container's display name.
///
/// Once a rename commits, this label is the authoritative source for the
/// container's name.
pub const NAME_LABEL: &str = "cask/name";

/// Errors from runtime operations.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// The container does not exist in the runtime.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// The runtime bridge returned an error response.
    #[error("runtime error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the bridge
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The bridge response could not be decoded.
    #[error("invalid runtime response: {0}")]
    Decode(String),
}

/// Status of a container's task process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Created,
    Running,
    Paused,
    Stopped,
    Unknown,
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessStatus::Created => "created",
            ProcessStatus::Running => "running",
            ProcessStatus::Paused => "paused",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A container as enumerated by the runtime.
///
/// Summaries carry the label set so reference resolution can match on
/// names without a second round-trip per container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    /// Runtime-assigned container id.
    pub id: ContainerId,
    /// Full label set.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerSummary {
    /// The container's display name, if the name label is set.
    pub fn name(&self) -> Option<&str> {
        self.labels.get(NAME_LABEL).map(String::as_str)
    }
}

/// Native detail representation of a container.
///
/// This is the single internal representation that inspection variants
/// are derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDetail {
    /// Runtime-assigned container id.
    pub id: ContainerId,
    /// Full label set.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Image reference the container was created from.
    pub image: String,
    /// Task process status.
    pub status: ProcessStatus,
    /// Task pid, when a task exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ContainerDetail {
    /// The container's display name, if the name label is set.
    pub fn name(&self) -> Option<&str> {
        self.labels.get(NAME_LABEL).map(String::as_str)
    }
}

/// Interface to the container runtime.
///
/// Implementations: [`crate::runtime::HttpRuntime`] for the containerd
/// bridge, [`crate::runtime::MockRuntime`] for tests.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Enumerate all containers in a namespace.
    async fn list_containers(
        &self,
        ns: &Namespace,
    ) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// Get a container's full label set.
    async fn labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<HashMap<String, String>, RuntimeError>;

    /// Replace a container's full label set.
    async fn set_labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        labels: HashMap<String, String>,
    ) -> Result<(), RuntimeError>;

    /// Load the native detail representation of a container.
    async fn inspect(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ContainerDetail, RuntimeError>;

    /// Get the status of a container's task.
    async fn task_status(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ProcessStatus, RuntimeError>;

    /// Stop a container's task, waiting up to `timeout` before killing it.
    async fn stop_task(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), RuntimeError>;

    /// Start a container's task.
    async fn start_task(&self, ns: &Namespace, id: &ContainerId) -> Result<(), RuntimeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_name_reads_name_label() {
        let mut labels = HashMap::new();
        labels.insert(NAME_LABEL.to_string(), "web".to_string());
        let summary = ContainerSummary {
            id: ContainerId::new("abc123").unwrap(),
            labels,
        };
        assert_eq!(summary.name(), Some("web"));
    }

    #[test]
    fn summary_name_is_none_without_label() {
        let summary = ContainerSummary {
            id: ContainerId::new("abc123").unwrap(),
            labels: HashMap::new(),
        };
        assert_eq!(summary.name(), None);
    }

    #[test]
    fn process_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let back: ProcessStatus = serde_json::from_str("\"stopped\"").unwrap();
        assert_eq!(back, ProcessStatus::Stopped);
    }

    #[test]
    fn runtime_error_display() {
        let err = RuntimeError::ContainerNotFound("abc".into());
        assert!(err.to_string().contains("abc"));

        let err = RuntimeError::ApiError {
            status: 500,
            message: "boom".into(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }
}
