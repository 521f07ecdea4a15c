//! core
//!
//! Reference resolution, batch execution, and rename coordination.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ContainerId, Namespace
//! - [`config`] - Configuration resolution (file, environment, flags)
//! - [`paths`] - Centralized path routing for the local data store
//! - [`walker`] - Reference resolution with disambiguation rules
//! - [`batch`] - Batch execution over multiple references
//! - [`hosts`] - Hosts metadata schema and storage
//! - [`lock`] - Per-container advisory locking
//! - [`rename`] - Rename coordination across the label and hosts stores
//! - [`inspect`] - Inspection modes and the docker-compat transform
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Components return errors; only the CLI layer prints
//! - Configuration is an explicit value, never ambient state

pub mod batch;
pub mod config;
pub mod hosts;
pub mod inspect;
pub mod lock;
pub mod paths;
pub mod rename;
pub mod types;
pub mod walker;
