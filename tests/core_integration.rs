//! Integration tests for the batch executor and rename coordinator.
//!
//! These tests exercise the public API against the mock runtime and real
//! hosts metadata files created with tempfile.

use tempfile::TempDir;

use caskwork::core::batch::{BatchError, BatchExecutor, MatchPolicy};
use caskwork::core::hosts::HostsStore;
use caskwork::core::inspect::{ContainerInspector, InspectEntry, InspectMode};
use caskwork::core::paths::StorePaths;
use caskwork::core::rename::{RenameCoordinator, RenameError};
use caskwork::core::types::{ContainerId, Namespace};
use caskwork::core::walker::ContainerWalker;
use caskwork::runtime::{MockRuntime, Runtime, RuntimeError, NAME_LABEL};

// =============================================================================
// Test Helpers
// =============================================================================

fn ns() -> Namespace {
    Namespace::new("default").unwrap()
}

fn hosts_store(dir: &TempDir) -> HostsStore {
    HostsStore::new(StorePaths::new(dir.path().to_path_buf()).unwrap())
}

/// Seed a hosts record for a container, standing in for the component
/// that enables host-record management at container creation.
fn seed_record(store: &HostsStore, id: &ContainerId, json: &str) {
    let path = store.paths().meta_path(&ns(), id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, json).unwrap();
}

fn refs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Batch Inspect
// =============================================================================

mod batch_inspect {
    use super::*;

    #[tokio::test]
    async fn bogus_reference_reports_one_failure_and_both_successes() {
        let runtime = MockRuntime::new();
        let a = runtime.add_container(&ns(), "existing1");
        let b = runtime.add_container(&ns(), "existing2");

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut inspector = ContainerInspector::new(&runtime, ns(), InspectMode::Native);
        let report = executor
            .run(
                &refs(&["existing1", "bogus", "existing2"]),
                MatchPolicy::All,
                &mut inspector,
            )
            .await;

        // Output entries for existing1 and existing2, in that order
        let ids: Vec<String> = report
            .outputs
            .iter()
            .map(|entry| match entry {
                InspectEntry::Native(detail) => detail.id.to_string(),
                InspectEntry::DockerCompat(compat) => compat.id.clone(),
            })
            .collect();
        assert_eq!(ids, vec![a.to_string(), b.to_string()]);

        // Exactly one failure, for "bogus"
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].reference, "bogus");
        let summary = report.error_summary().unwrap();
        assert!(summary.starts_with("1 errors:"));
        assert!(summary.contains("no such object: bogus"));
    }

    #[tokio::test]
    async fn dockercompat_entries_carry_docker_shape() {
        let runtime = MockRuntime::new();
        runtime.add_container(&ns(), "web");

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut inspector = ContainerInspector::new(&runtime, ns(), InspectMode::DockerCompat);
        let report = executor
            .run(&refs(&["web"]), MatchPolicy::All, &mut inspector)
            .await;

        assert!(report.is_ok());
        let value = serde_json::to_value(&report.outputs).unwrap();
        assert_eq!(value[0]["Name"], "/web");
        assert_eq!(value[0]["State"]["Status"], "running");
    }

    #[tokio::test]
    async fn runtime_failure_during_inspect_is_per_reference() {
        let runtime = MockRuntime::new();
        runtime.add_container(&ns(), "web");
        runtime.fail_on(caskwork::runtime::mock::FailOn::Inspect(
            RuntimeError::NetworkError("bridge down".into()),
        ));

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut inspector = ContainerInspector::new(&runtime, ns(), InspectMode::Native);
        let report = executor
            .run(&refs(&["web"]), MatchPolicy::All, &mut inspector)
            .await;

        assert!(report.outputs.is_empty());
        assert!(matches!(
            report.failures[0].error,
            BatchError::Handler(_)
        ));
    }
}

// =============================================================================
// Rename Through The Batch Executor
// =============================================================================

mod batch_rename {
    use super::*;
    use async_trait::async_trait;
    use caskwork::core::batch::FoundHandler;
    use caskwork::core::walker::Found;

    /// The rename command's handler, reconstructed for integration
    /// testing: coordinator applied per resolved match.
    struct Renamer<'a> {
        coordinator: RenameCoordinator<'a>,
        new_name: String,
    }

    #[async_trait]
    impl FoundHandler for Renamer<'_> {
        type Output = String;
        type Error = RenameError;

        async fn handle(&mut self, found: &Found) -> Result<String, RenameError> {
            self.coordinator
                .rename(&found.container.id, &self.new_name)
                .await?;
            Ok(found.reference.clone())
        }
    }

    #[tokio::test]
    async fn rename_by_prefix_converges_both_stores() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);
        seed_record(&store, &id, r#"{"Name":"web","Hostname":"web.internal"}"#);

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut handler = Renamer {
            coordinator: RenameCoordinator::new(&runtime, store.clone(), ns()),
            new_name: "frontend".to_string(),
        };
        let report = executor
            .run(
                &refs(&[&id.as_str()[..16]]),
                MatchPolicy::ExactlyOne,
                &mut handler,
            )
            .await;

        assert!(report.is_ok(), "{:?}", report.failures);

        let labels = runtime.labels(&ns(), &id).await.unwrap();
        assert_eq!(labels.get(NAME_LABEL).map(String::as_str), Some("frontend"));
        let meta = store.read(&ns(), &id).unwrap().unwrap();
        assert_eq!(meta.name, "frontend");
        assert_eq!(meta.extra["Hostname"], "web.internal");
    }

    #[tokio::test]
    async fn rename_of_missing_reference_mutates_nothing() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut handler = Renamer {
            coordinator: RenameCoordinator::new(&runtime, store, ns()),
            new_name: "frontend".to_string(),
        };
        let report = executor
            .run(&refs(&["missingx"]), MatchPolicy::ExactlyOne, &mut handler)
            .await;

        assert!(matches!(
            report.failures[0].error,
            BatchError::NotFound(_)
        ));
        assert!(runtime.operations().is_empty());
    }

    #[tokio::test]
    async fn rename_of_shared_name_requires_unique_match() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        runtime.add_container(&ns(), "web");
        runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut handler = Renamer {
            coordinator: RenameCoordinator::new(&runtime, store, ns()),
            new_name: "frontend".to_string(),
        };
        let report = executor
            .run(&refs(&["web"]), MatchPolicy::ExactlyOne, &mut handler)
            .await;

        assert!(matches!(
            report.failures[0].error,
            BatchError::NotUnique { count: 2, .. }
        ));
        assert!(runtime.operations().is_empty());
    }
}

// =============================================================================
// Hosts Record Lifecycle Around Rename
// =============================================================================

mod record_lifecycle {
    use super::*;

    #[tokio::test]
    async fn record_absent_before_means_absent_after() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);

        let coordinator = RenameCoordinator::new(&runtime, store.clone(), ns());
        coordinator.rename(&id, "frontend").await.unwrap();

        assert!(!store.exists(&ns(), &id));
        // The etchosts tree was never materialized for this container
        assert!(!store
            .paths()
            .container_hosts_dir(&ns(), &id)
            .exists());
    }

    #[tokio::test]
    async fn lock_file_location_is_outside_record_tree() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);

        let coordinator = RenameCoordinator::new(&runtime, store.clone(), ns());
        coordinator.rename(&id, "frontend").await.unwrap();

        let lock = store.paths().lock_path(&ns(), &id);
        assert!(lock.exists());
        assert!(!lock.starts_with(store.paths().hosts_dir()));
    }

    #[tokio::test]
    async fn interrupted_rename_converges_on_retry() {
        // The record update precedes the label commit, so a failure in
        // between leaves the record ahead of the authoritative label.
        // Re-running the same rename closes the gap.
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);
        seed_record(&store, &id, r#"{"Name":"web"}"#);

        runtime.fail_on(caskwork::runtime::mock::FailOn::SetLabels(
            RuntimeError::NetworkError("bridge restarting".into()),
        ));
        let coordinator = RenameCoordinator::new(&runtime, store.clone(), ns());
        let err = coordinator.rename(&id, "frontend").await.unwrap_err();
        assert!(matches!(err, RenameError::Runtime(_)));

        // Record advanced, authoritative label did not
        assert_eq!(store.read(&ns(), &id).unwrap().unwrap().name, "frontend");
        let labels = runtime.labels(&ns(), &id).await.unwrap();
        assert_eq!(labels.get(NAME_LABEL).map(String::as_str), Some("web"));

        // Retry with the same arguments converges both stores
        runtime.clear_fail_on();
        coordinator.rename(&id, "frontend").await.unwrap();
        let labels = runtime.labels(&ns(), &id).await.unwrap();
        assert_eq!(labels.get(NAME_LABEL).map(String::as_str), Some("frontend"));
        assert_eq!(store.read(&ns(), &id).unwrap().unwrap().name, "frontend");
    }

    #[tokio::test]
    async fn rerunning_a_rename_converges() {
        let dir = TempDir::new().unwrap();
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");
        let store = hosts_store(&dir);
        seed_record(&store, &id, r#"{"Name":"web"}"#);

        let coordinator = RenameCoordinator::new(&runtime, store.clone(), ns());
        coordinator.rename(&id, "frontend").await.unwrap();
        let second = coordinator.rename(&id, "frontend").await.unwrap();
        assert!(second.same_name);

        let labels = runtime.labels(&ns(), &id).await.unwrap();
        assert_eq!(labels.get(NAME_LABEL).map(String::as_str), Some("frontend"));
        assert_eq!(store.read(&ns(), &id).unwrap().unwrap().name, "frontend");
    }
}

// =============================================================================
// Restart Composition
// =============================================================================

mod restart_composition {
    use super::*;
    use async_trait::async_trait;
    use caskwork::core::batch::FoundHandler;
    use caskwork::core::walker::Found;
    use caskwork::runtime::ProcessStatus;
    use std::time::Duration;

    struct Restarter<'a> {
        runtime: &'a MockRuntime,
        grace: Duration,
    }

    #[async_trait]
    impl FoundHandler for Restarter<'_> {
        type Output = String;
        type Error = RuntimeError;

        async fn handle(&mut self, found: &Found) -> Result<String, RuntimeError> {
            self.runtime
                .stop_task(&ns(), &found.container.id, self.grace)
                .await?;
            self.runtime.start_task(&ns(), &found.container.id).await?;
            Ok(found.reference.clone())
        }
    }

    #[tokio::test]
    async fn restart_stops_then_starts_each_match() {
        let runtime = MockRuntime::new();
        let id = runtime.add_container(&ns(), "web");

        let executor = BatchExecutor::new(ContainerWalker::new(&runtime, ns()));
        let mut handler = Restarter {
            runtime: &runtime,
            grace: Duration::from_secs(10),
        };
        let report = executor
            .run(&refs(&["web"]), MatchPolicy::All, &mut handler)
            .await;

        assert!(report.is_ok());
        assert_eq!(
            runtime.task_status(&ns(), &id).await.unwrap(),
            ProcessStatus::Running
        );
        // stop recorded before start
        let ops = runtime.operations();
        assert_eq!(ops.len(), 2);
    }
}
