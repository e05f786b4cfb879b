//! Field rules for the legacy schema layout (`"schema"`).

use std::collections::BTreeSet;

use super::FieldProcessor;
use crate::diagnostic::CompilerError;
use crate::ir::ProcessedField;
use crate::schema::{RawFieldSchema, SchemaDialect};

/// Processor for documents that list fields under `"schema"`.
///
/// Legacy records always carry `created` and `updated`, but the layout never
/// declares them. Generated models get them from the embedded `Timestamps`
/// capability, so explicit declarations are dropped here.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyProcessor;

impl FieldProcessor for LegacyProcessor {
    fn dialect(&self) -> SchemaDialect {
        SchemaDialect::Legacy
    }

    fn uses_shared_timestamps(&self) -> bool {
        true
    }

    fn required_imports(&self) -> BTreeSet<&'static str> {
        BTreeSet::from(["HasTimestamps", "Timestamps"])
    }

    fn timestamp_field(
        &self,
        _field: &RawFieldSchema,
    ) -> Result<Option<ProcessedField>, CompilerError> {
        Ok(None)
    }
}
