//! Field rules for the current schema layout (`"fields"`).

use std::collections::BTreeSet;

use super::{timestamp, FieldProcessor};
use crate::diagnostic::CompilerError;
use crate::ir::ProcessedField;
use crate::schema::{RawFieldSchema, SchemaDialect};

/// Processor for documents that list fields under `"fields"`.
///
/// `created` and `updated` are declared explicitly in this layout and are
/// generated as plain `DateTime` fields, whatever their `required` flag says.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestProcessor;

impl FieldProcessor for LatestProcessor {
    fn dialect(&self) -> SchemaDialect {
        SchemaDialect::Latest
    }

    fn uses_shared_timestamps(&self) -> bool {
        false
    }

    fn required_imports(&self) -> BTreeSet<&'static str> {
        BTreeSet::new()
    }

    fn timestamp_field(
        &self,
        field: &RawFieldSchema,
    ) -> Result<Option<ProcessedField>, CompilerError> {
        timestamp(field).map(Some)
    }
}
