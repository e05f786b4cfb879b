//! Collection intermediate representation.

use std::collections::BTreeSet;
use serde::Serialize;

use super::ProcessedField;
use crate::schema::SchemaDialect;

/// IR for one collection, consumed by a renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionIR {
    /// Collection name as stored remotely (e.g. "posts").
    pub name: String,

    /// PascalCase struct identifier (e.g. "Posts").
    pub struct_name: String,

    /// Collection id from the export, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    /// Fields in declaration order, deduplicated.
    pub fields: Vec<ProcessedField>,

    /// Dialect the fields were processed with.
    pub dialect: SchemaDialect,

    /// `created`/`updated` come from the shared `Timestamps` capability.
    pub uses_shared_timestamps: bool,

    /// Runtime items the generated module imports.
    pub imports: BTreeSet<String>,
}

impl CollectionIR {
    /// Looks up a field by its wire key.
    pub fn field(&self, key: &str) -> Option<&ProcessedField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether the schema declared an `id` field.
    pub fn has_id_field(&self) -> bool {
        self.field("id").is_some()
    }
}
