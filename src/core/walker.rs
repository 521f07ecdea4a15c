//! core::walker
//!
//! Reference resolution with disambiguation rules.
//!
//! # Architecture
//!
//! A reference is whatever the user typed to identify a container: a full
//! id, an id prefix, or a display name. The walker turns one reference
//! into zero, one, or many concrete containers using a fixed precedence,
//! evaluated in order with the first non-empty result winning:
//!
//! 1. Exact full-id match (at most one possible)
//! 2. Unambiguous id-prefix match; a prefix matching two or more ids is
//!    an error rather than a guess
//! 3. Exact name match; names are not unique, so every container carrying
//!    the name is returned
//!
//! Zero matches across all three steps is not an error here - callers
//! decide whether "not found" is fatal for their operation.
//!
//! The walker is read-only: it never mutates any store, and its only I/O
//! is the container enumeration delegated to the runtime.

use thiserror::Error;

use crate::core::types::Namespace;
use crate::runtime::{ContainerSummary, Runtime, RuntimeError};

/// Errors from reference resolution.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The reference is empty.
    #[error("reference cannot be empty")]
    EmptyReference,

    /// The reference is an id prefix of more than one container.
    #[error("ambiguous reference {reference:?}: matches {count} container ids")]
    AmbiguousPrefix {
        /// The reference as typed by the user
        reference: String,
        /// How many ids the prefix matched
        count: usize,
    },

    /// Container enumeration failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// A resolved match: the reference as typed plus the container it named.
#[derive(Debug, Clone)]
pub struct Found {
    /// The reference as typed by the user.
    pub reference: String,
    /// The matched container.
    pub container: ContainerSummary,
}

/// Resolves user references against the containers of one namespace.
///
/// # Example
///
/// ```
/// use caskwork::core::types::Namespace;
/// use caskwork::core::walker::ContainerWalker;
/// use caskwork::runtime::MockRuntime;
///
/// # tokio_test::block_on(async {
/// let ns = Namespace::new("default").unwrap();
/// let runtime = MockRuntime::new();
/// let id = runtime.add_container(&ns, "web");
///
/// let walker = ContainerWalker::new(&runtime, ns);
/// let found = walker.walk("web").await.unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].container.id, id);
/// # });
/// ```
pub struct ContainerWalker<'a> {
    runtime: &'a dyn Runtime,
    namespace: Namespace,
}

impl<'a> ContainerWalker<'a> {
    /// Create a walker over the given runtime and namespace.
    pub fn new(runtime: &'a dyn Runtime, namespace: Namespace) -> Self {
        Self { runtime, namespace }
    }

    /// Get the namespace this walker resolves within.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Resolve a reference to its matching containers.
    ///
    /// Returns an empty vector when nothing matches; see the module
    /// documentation for the precedence rules.
    ///
    /// # Errors
    ///
    /// - [`WalkError::EmptyReference`] for an empty reference
    /// - [`WalkError::AmbiguousPrefix`] when an id prefix matches more
    ///   than one container
    /// - [`WalkError::Runtime`] when enumeration fails
    pub async fn walk(&self, reference: &str) -> Result<Vec<Found>, WalkError> {
        if reference.is_empty() {
            return Err(WalkError::EmptyReference);
        }

        let containers = self.runtime.list_containers(&self.namespace).await?;

        // 1. Exact full-id match.
        if let Some(container) = containers.iter().find(|c| c.id.as_str() == reference) {
            return Ok(vec![Found {
                reference: reference.to_string(),
                container: container.clone(),
            }]);
        }

        // 2. Id-prefix match, unique or error.
        let prefixed: Vec<&ContainerSummary> = containers
            .iter()
            .filter(|c| c.id.as_str().starts_with(reference))
            .collect();
        match prefixed.len() {
            0 => {}
            1 => {
                return Ok(vec![Found {
                    reference: reference.to_string(),
                    container: prefixed[0].clone(),
                }]);
            }
            count => {
                return Err(WalkError::AmbiguousPrefix {
                    reference: reference.to_string(),
                    count,
                });
            }
        }

        // 3. Exact name match; all carriers are returned.
        Ok(containers
            .iter()
            .filter(|c| c.name() == Some(reference))
            .map(|c| Found {
                reference: reference.to_string(),
                container: c.clone(),
            })
            .collect())
    }
}
