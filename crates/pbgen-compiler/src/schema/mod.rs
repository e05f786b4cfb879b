//! Collection schema documents.
//!
//! This module owns everything between the raw bytes of an exported schema
//! and the IR:
//!
//! 1. Raw collection and field types as they appear on disk
//! 2. Dialect detection over the raw bytes
//! 3. The loader that validates, detects, and runs the field processors

pub mod dialect;
pub mod loader;

pub use dialect::{detect, DetectError, SchemaDialect};
pub use loader::{SchemaLoader, UnknownDialectPolicy, SUPERUSERS_COLLECTION};

use serde::Deserialize;

/// One field as declared in a schema document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFieldSchema {
    /// Field key (e.g. "title").
    #[serde(default)]
    pub name: String,

    /// Field kind tag (e.g. "text", "relation").
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Whether a value is required.
    #[serde(default)]
    pub required: bool,

    /// Managed by the server.
    #[serde(default)]
    pub system: bool,

    /// Never returned by the API.
    #[serde(default)]
    pub hidden: bool,
}

impl RawFieldSchema {
    /// Creates a plain, visible field.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            required,
            system: false,
            hidden: false,
        }
    }
}

/// One collection as declared in a schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCollectionSchema {
    /// Collection id assigned by the server.
    #[serde(default)]
    pub id: Option<String>,

    /// Collection name (e.g. "posts").
    #[serde(default)]
    pub name: String,

    /// Collection type ("base", "auth", "view").
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Built-in collection.
    #[serde(default)]
    pub system: bool,

    /// Field list in the current layout.
    #[serde(default)]
    fields: Option<Vec<RawFieldSchema>>,

    /// Field list in the legacy layout.
    #[serde(default)]
    schema: Option<Vec<RawFieldSchema>>,

    /// Document dialect, stamped by the loader after detection.
    #[serde(skip)]
    pub dialect: SchemaDialect,
}

impl RawCollectionSchema {
    /// Declared fields in order, whichever key held them.
    pub fn fields(&self) -> &[RawFieldSchema] {
        self.fields
            .as_deref()
            .or(self.schema.as_deref())
            .unwrap_or(&[])
    }
}
