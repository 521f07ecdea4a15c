//! runtime
//!
//! Single interface for all container runtime operations.
//!
//! # Architecture
//!
//! The [`Runtime`] trait is the only doorway to the container runtime.
//! No other module talks to the runtime bridge directly. This ensures:
//!
//! - Consistent error handling across all runtime operations
//! - Strong type guarantees at the boundary
//! - Deterministic testing via the mock implementation
//!
//! # Modules
//!
//! - `traits`: Core `Runtime` trait, data types, and error taxonomy
//! - [`http`]: HTTP bridge implementation using reqwest
//! - [`mock`]: In-memory implementation for deterministic testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpRuntime;
pub use mock::MockRuntime;
pub use traits::{
    ContainerDetail, ContainerSummary, ProcessStatus, Runtime, RuntimeError, NAME_LABEL,
};
