//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ContainerId`] - Validated runtime-assigned container identifier
//! - [`Namespace`] - Validated namespace scoping all container lookups
//!
//! # Validation
//!
//! These types enforce validity at construction time. Both values become
//! path components of the hosts metadata path, so anything path-hostile
//! (separators, traversal sequences, control characters) is rejected
//! before it can reach the filesystem.
//!
//! # Examples
//!
//! ```
//! use caskwork::core::types::{ContainerId, Namespace};
//!
//! // Valid constructions
//! let id = ContainerId::new("8a9f2c4e1b0d").unwrap();
//! let ns = Namespace::new("default").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(ContainerId::new("").is_err());
//! assert!(ContainerId::new("../escape").is_err());
//! assert!(Namespace::new("a/b").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid container id: {0}")]
    InvalidContainerId(String),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
}

/// A validated container identifier.
///
/// Container IDs are assigned by the runtime and are opaque to Cask.
/// In practice they are lowercase hex digests; validation only requires
/// ASCII alphanumeric content so the ID is safe to embed in store paths:
/// - Cannot be empty
/// - Only ASCII letters and digits
/// - At most 128 characters
///
/// # Example
///
/// ```
/// use caskwork::core::types::ContainerId;
///
/// let id = ContainerId::new("8a9f2c4e1b0d").unwrap();
/// assert_eq!(id.as_str(), "8a9f2c4e1b0d");
///
/// assert!(ContainerId::new("").is_err());
/// assert!(ContainerId::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    /// Create a new validated container id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidContainerId` if the id is empty, overlong,
    /// or contains anything other than ASCII letters and digits.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidContainerId(
                "container id cannot be empty".into(),
            ));
        }
        if id.len() > 128 {
            return Err(TypeError::InvalidContainerId(
                "container id exceeds 128 characters".into(),
            ));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TypeError::InvalidContainerId(format!(
                "container id must be ASCII alphanumeric: {id:?}"
            )));
        }
        Ok(())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the truncated form used for display (first `len` characters).
    pub fn short(&self, len: usize) -> &str {
        &self.0[..self.0.len().min(len)]
    }
}

impl TryFrom<String> for ContainerId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated namespace.
///
/// Namespaces partition container identity; references never cross them.
/// A namespace is also a path component of the hosts metadata path:
/// - Cannot be empty
/// - Only ASCII letters, digits, `-`, `_`, and `.`
/// - Cannot be `.` or `..`
///
/// # Example
///
/// ```
/// use caskwork::core::types::Namespace;
///
/// let ns = Namespace::new("default").unwrap();
/// assert_eq!(ns.as_str(), "default");
///
/// assert!(Namespace::new("").is_err());
/// assert!(Namespace::new("..").is_err());
/// assert!(Namespace::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Create a new validated namespace.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNamespace` if the name is empty, a
    /// traversal component, or contains characters outside
    /// `[A-Za-z0-9._-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidNamespace(
                "namespace cannot be empty".into(),
            ));
        }
        if name == "." || name == ".." {
            return Err(TypeError::InvalidNamespace(format!(
                "namespace cannot be {name:?}"
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(TypeError::InvalidNamespace(format!(
                "namespace must match [A-Za-z0-9._-]: {name:?}"
            )));
        }
        Ok(())
    }

    /// Get the namespace as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Namespace {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
