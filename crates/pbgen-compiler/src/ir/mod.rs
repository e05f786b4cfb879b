//! Intermediate representation produced by the schema loader.
//!
//! The IR is independent of any output language. Renderers consume it to
//! produce source text; it can also be dumped as JSON for inspection.

mod collection;
mod field;

pub use collection::CollectionIR;
pub use field::{Accessor, ProcessedField, TargetType};

use std::path::PathBuf;
use serde::Serialize;

use crate::diagnostic::Warning;
use crate::schema::SchemaDialect;

/// The complete IR for one schema document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIR {
    /// Schema file the IR was built from.
    pub source: PathBuf,

    /// Dialect reported by the detector (may be `Unknown`).
    pub detected_dialect: SchemaDialect,

    /// Dialect actually used after the unknown-dialect policy.
    pub dialect: SchemaDialect,

    /// One entry per generated collection, in document order.
    pub collections: Vec<CollectionIR>,

    /// Non-fatal findings collected while processing fields.
    pub warnings: Vec<Warning>,
}

impl SchemaIR {
    /// Total number of processed fields across all collections.
    pub fn field_count(&self) -> usize {
        self.collections.iter().map(|c| c.fields.len()).sum()
    }
}
