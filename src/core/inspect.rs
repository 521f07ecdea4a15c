//! core::inspect
//!
//! Inspection modes and the docker-compat transform.
//!
//! # Architecture
//!
//! Inspection has one internal representation - the runtime's native
//! [`ContainerDetail`] - and an explicit mode enumeration selecting the
//! output variant. The docker-compatible shape is produced by a pure
//! transform from the native detail; formatting (pretty array vs JSON
//! lines) is a separate concern layered on top in the CLI and never
//! interleaved with resolution.
//!
//! Each per-container lookup is bounded by a fixed timeout so one slow
//! container cannot stall a whole batch; expiry fails that single
//! reference only.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::core::batch::FoundHandler;
use crate::core::types::Namespace;
use crate::core::walker::Found;
use crate::runtime::{ContainerDetail, ProcessStatus, Runtime, RuntimeError};

/// Bound on each per-container lookup.
pub const INSPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from inspection.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The per-container lookup exceeded [`INSPECT_TIMEOUT`].
    #[error("inspect timed out after {0:?}")]
    Timeout(Duration),

    /// The runtime lookup failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Which output shape inspection produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectMode {
    /// The runtime's native detail representation.
    Native,
    /// Docker-compatible shape.
    DockerCompat,
}

impl FromStr for InspectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(InspectMode::Native),
            "dockercompat" => Ok(InspectMode::DockerCompat),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

/// One inspection result, shaped per the selected mode.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InspectEntry {
    Native(ContainerDetail),
    DockerCompat(DockerCompatContainer),
}

/// Docker-compatible container shape.
///
/// A pure projection of [`ContainerDetail`]; nothing here touches the
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DockerCompatContainer {
    pub id: String,
    pub created: DateTime<Utc>,
    /// Docker names carry a leading slash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub image: String,
    pub state: DockerCompatState,
    pub labels: std::collections::HashMap<String, String>,
}

/// Docker-compatible state block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DockerCompatState {
    pub status: String,
    pub running: bool,
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

impl DockerCompatContainer {
    /// Project the native detail into the docker-compatible shape.
    pub fn from_native(detail: &ContainerDetail) -> Self {
        Self {
            id: detail.id.to_string(),
            created: detail.created_at,
            name: detail.name().map(|name| format!("/{name}")),
            image: detail.image.clone(),
            state: DockerCompatState {
                status: detail.status.to_string(),
                running: detail.status == ProcessStatus::Running,
                paused: detail.status == ProcessStatus::Paused,
                pid: detail.pid,
            },
            labels: detail.labels.clone(),
        }
    }
}

/// Batch handler that loads container detail and shapes it per the mode.
pub struct ContainerInspector<'a> {
    runtime: &'a dyn Runtime,
    namespace: Namespace,
    mode: InspectMode,
    timeout: Duration,
}

impl<'a> ContainerInspector<'a> {
    /// Create an inspector with the default per-container timeout.
    pub fn new(runtime: &'a dyn Runtime, namespace: Namespace, mode: InspectMode) -> Self {
        Self::with_timeout(runtime, namespace, mode, INSPECT_TIMEOUT)
    }

    /// Create an inspector with an explicit per-container timeout.
    pub fn with_timeout(
        runtime: &'a dyn Runtime,
        namespace: Namespace,
        mode: InspectMode,
        timeout: Duration,
    ) -> Self {
        Self {
            runtime,
            namespace,
            mode,
            timeout,
        }
    }
}

#[async_trait]
impl FoundHandler for ContainerInspector<'_> {
    type Output = InspectEntry;
    type Error = InspectError;

    async fn handle(&mut self, found: &Found) -> Result<InspectEntry, InspectError> {
        let detail = tokio::time::timeout(
            self.timeout,
            self.runtime.inspect(&self.namespace, &found.container.id),
        )
        .await
        .map_err(|_| InspectError::Timeout(self.timeout))??;

        Ok(match self.mode {
            InspectMode::Native => InspectEntry::Native(detail),
            InspectMode::DockerCompat => {
                InspectEntry::DockerCompat(DockerCompatContainer::from_native(&detail))
            }
        })
    }
}
