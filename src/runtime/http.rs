//! runtime::http
//!
//! Runtime implementation over the containerd HTTP bridge.
//!
//! # Design
//!
//! The bridge exposes a small REST surface per namespace:
//!
//! - `GET  /v1/{ns}/containers` - enumerate containers (id + labels)
//! - `GET  /v1/{ns}/containers/{id}` - native container detail
//! - `GET  /v1/{ns}/containers/{id}/labels` - label set
//! - `PUT  /v1/{ns}/containers/{id}/labels` - replace label set
//! - `GET  /v1/{ns}/containers/{id}/task` - task status
//! - `POST /v1/{ns}/containers/{id}/task/stop?timeout=SECS` - stop task
//! - `POST /v1/{ns}/containers/{id}/task/start` - start task
//!
//! # Error Handling
//!
//! HTTP 404 maps to [`RuntimeError::ContainerNotFound`]; other non-success
//! statuses map to [`RuntimeError::ApiError`] carrying the response body.
//! Transport failures map to [`RuntimeError::NetworkError`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{ContainerDetail, ContainerSummary, ProcessStatus, Runtime, RuntimeError};
use crate::core::types::{ContainerId, Namespace};

/// User-Agent header value for bridge requests.
const USER_AGENT_VALUE: &str = "cask-cli";

/// Runtime implementation talking to the containerd HTTP bridge.
///
/// # Example
///
/// ```ignore
/// use caskwork::runtime::{HttpRuntime, Runtime};
///
/// let runtime = HttpRuntime::new("http://127.0.0.1:10350");
/// let containers = runtime.list_containers(&ns).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpRuntime {
    client: Client,
    base_url: String,
}

/// Task status response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaskStatusBody {
    status: ProcessStatus,
}

impl HttpRuntime {
    /// Create a new HTTP runtime for the given bridge address.
    ///
    /// A trailing slash on the address is tolerated.
    pub fn new(address: impl Into<String>) -> Self {
        let mut base_url = address.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }

    /// Get the configured bridge address.
    pub fn address(&self) -> &str {
        &self.base_url
    }

    fn container_url(&self, ns: &Namespace, id: &ContainerId) -> String {
        format!("{}/v1/{}/containers/{}", self.base_url, ns, id)
    }

    /// Check a response status, mapping failures to typed errors.
    async fn check(response: Response, id: Option<&ContainerId>) -> Result<Response, RuntimeError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(RuntimeError::ContainerNotFound(id.to_string()));
            }
        }
        let message = response.text().await.unwrap_or_default();
        Err(RuntimeError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        id: Option<&ContainerId>,
    ) -> Result<T, RuntimeError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::NetworkError(e.to_string()))?;
        let response = Self::check(response, id).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RuntimeError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Runtime for HttpRuntime {
    async fn list_containers(
        &self,
        ns: &Namespace,
    ) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let url = format!("{}/v1/{}/containers", self.base_url, ns);
        self.get_json(url, None).await
    }

    async fn labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        let url = format!("{}/labels", self.container_url(ns, id));
        self.get_json(url, Some(id)).await
    }

    async fn set_labels(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        labels: HashMap<String, String>,
    ) -> Result<(), RuntimeError> {
        let url = format!("{}/labels", self.container_url(ns, id));
        let response = self
            .client
            .put(&url)
            .json(&labels)
            .send()
            .await
            .map_err(|e| RuntimeError::NetworkError(e.to_string()))?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    async fn inspect(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ContainerDetail, RuntimeError> {
        self.get_json(self.container_url(ns, id), Some(id)).await
    }

    async fn task_status(
        &self,
        ns: &Namespace,
        id: &ContainerId,
    ) -> Result<ProcessStatus, RuntimeError> {
        let url = format!("{}/task", self.container_url(ns, id));
        let body: TaskStatusBody = self.get_json(url, Some(id)).await?;
        Ok(body.status)
    }

    async fn stop_task(
        &self,
        ns: &Namespace,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), RuntimeError> {
        let url = format!(
            "{}/task/stop?timeout={}",
            self.container_url(ns, id),
            timeout.as_secs()
        );
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::NetworkError(e.to_string()))?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    async fn start_task(&self, ns: &Namespace, id: &ContainerId) -> Result<(), RuntimeError> {
        let url = format!("{}/task/start", self.container_url(ns, id));
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::NetworkError(e.to_string()))?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Full bridge round-trips are covered in tests/http_runtime.rs with
    // wiremock. These unit tests cover URL construction only.

    #[test]
    fn trailing_slash_is_trimmed() {
        let runtime = HttpRuntime::new("http://127.0.0.1:10350/");
        assert_eq!(runtime.address(), "http://127.0.0.1:10350");
    }

    #[test]
    fn container_url_layout() {
        let runtime = HttpRuntime::new("http://127.0.0.1:10350");
        let ns = Namespace::new("default").unwrap();
        let id = ContainerId::new("abc123").unwrap();
        assert_eq!(
            runtime.container_url(&ns, &id),
            "http://127.0.0.1:10350/v1/default/containers/abc123"
        );
    }
}
