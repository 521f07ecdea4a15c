//! core::hosts::schema
//!
//! Hosts metadata record schema.
//!
//! # Schema Design
//!
//! The record is JSON with one field this tool owns (`Name`) and an open
//! set of fields owned by the host-record generator. Unknown fields are
//! captured and written back verbatim, so rewriting a record to change
//! the name never strips what another component stored there.
//!
//! # Example
//!
//! ```
//! use caskwork::core::hosts::schema::HostsMeta;
//!
//! let json = r#"{"Name":"web","Hostname":"web.internal"}"#;
//! let mut meta: HostsMeta = serde_json::from_str(json).unwrap();
//! assert_eq!(meta.name, "web");
//!
//! meta.name = "api".to_string();
//! let out = serde_json::to_value(&meta).unwrap();
//! assert_eq!(out["Name"], "api");
//! assert_eq!(out["Hostname"], "web.internal");
//! ```

use serde::{Deserialize, Serialize};

/// A container's hosts metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostsMeta {
    /// The container's display name.
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Fields owned by other components, preserved on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HostsMeta {
    /// Create a record carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}
