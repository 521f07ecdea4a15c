//! core::hosts
//!
//! Hosts metadata schema and storage.
//!
//! # Architecture
//!
//! Containers with host-record management enabled carry an auxiliary,
//! file-persisted metadata record outside the runtime's own store, used
//! to regenerate host-name records. The record lives at
//! `<data_root>/etchosts/<namespace>/<container-id>/meta.json`.
//!
//! Not every container has such a record; absence is normal, never an
//! error. This module only reads and updates existing records - record
//! creation and deletion belong to the component that enables
//! host-record management for a container.

pub mod schema;
pub mod store;

pub use schema::HostsMeta;
pub use store::{HostsStore, StoreError};
