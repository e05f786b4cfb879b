//! Dialect-specific field processors.
//!
//! Each dialect turns a collection's raw field list into processed fields.
//! The walk itself is shared (skip rules, deduplication, naming, ordering);
//! the dialects differ only in how they treat the `created` and `updated`
//! timestamps:
//!
//! - **Latest**: emits them as ordinary `DateTime` fields
//! - **Legacy**: folds them into the shared `Timestamps` capability

mod latest;
mod legacy;

pub use latest::LatestProcessor;
pub use legacy::LegacyProcessor;

use std::collections::{BTreeSet, HashSet};

use crate::diagnostic::{CompilerError, Warning};
use crate::ir::{Accessor, ProcessedField, TargetType};
use crate::mapping::{map_type, to_canonical_identifier};
use crate::schema::{RawFieldSchema, SchemaDialect};

/// Fields with server-managed semantics.
pub const SYSTEM_FIELDS: &[&str] = &["id", "created", "updated", "collectionId", "collectionName"];

/// System fields that are still generated when declared, even if flagged.
const CONVENTIONAL_FIELDS: &[&str] = &["id", "created", "updated"];

/// Timestamp fields handled by the dialect rule.
const TIMESTAMP_FIELDS: &[&str] = &["created", "updated"];

/// Output of processing one collection's fields.
#[derive(Debug, Clone, Default)]
pub struct ProcessedFields {
    /// Fields in declaration order, deduplicated.
    pub fields: Vec<ProcessedField>,
    /// Non-fatal findings (lossy fallbacks, renamed identifiers).
    pub warnings: Vec<Warning>,
}

/// Trait for dialect field processors.
pub trait FieldProcessor {
    /// Returns the dialect this processor implements.
    fn dialect(&self) -> SchemaDialect;

    /// Whether `created`/`updated` come from the shared `Timestamps` capability.
    fn uses_shared_timestamps(&self) -> bool;

    /// Runtime items every model of this dialect imports.
    fn required_imports(&self) -> BTreeSet<&'static str>;

    /// Dialect rule for a `created`/`updated` declaration.
    ///
    /// Returns `None` when the timestamp is not emitted as a field.
    fn timestamp_field(
        &self,
        field: &RawFieldSchema,
    ) -> Result<Option<ProcessedField>, CompilerError>;

    /// Whether `name` is a server-managed field. Case-sensitive.
    fn is_system_field(&self, name: &str) -> bool {
        SYSTEM_FIELDS.contains(&name)
    }

    /// Processes a collection's fields in declaration order.
    ///
    /// Fails only for a required field whose kind cannot be mapped. Optional
    /// fields of unknown kind degrade to `Option<String>` with a warning.
    fn process_fields(
        &self,
        fields: &[RawFieldSchema],
        collection: &str,
    ) -> Result<ProcessedFields, CompilerError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut identifiers: HashSet<String> = HashSet::new();
        let mut out = ProcessedFields::default();

        for field in fields {
            // First occurrence wins, later duplicates are dropped silently.
            if !seen.insert(field.name.as_str()) {
                continue;
            }

            let conventional = CONVENTIONAL_FIELDS.contains(&field.name.as_str());
            if (field.hidden || field.system) && !conventional {
                if field.hidden && field.required && !field.system {
                    out.warnings.push(Warning::SkippedHiddenRequired {
                        collection: collection.to_string(),
                        field: field.name.clone(),
                    });
                }
                continue;
            }

            let processed = if TIMESTAMP_FIELDS.contains(&field.name.as_str()) {
                match self
                    .timestamp_field(field)
                    .map_err(|e| e.in_collection(collection))?
                {
                    Some(processed) => processed,
                    None => continue,
                }
            } else {
                map_field(field, collection, &mut out.warnings)?
            };

            out.fields.push(claim_identifier(
                processed,
                collection,
                &mut identifiers,
                &mut out.warnings,
            ));
        }

        Ok(out)
    }
}

/// Creates a processor for the given dialect.
///
/// `Unknown` uses the latest rules; loaders apply their policy before this.
pub fn create_processor(dialect: SchemaDialect) -> Box<dyn FieldProcessor> {
    match dialect {
        SchemaDialect::Legacy => Box::new(LegacyProcessor),
        SchemaDialect::Latest | SchemaDialect::Unknown => Box::new(LatestProcessor),
    }
}

/// Maps an ordinary field through the type mapper and the normalizer.
fn map_field(
    field: &RawFieldSchema,
    collection: &str,
    warnings: &mut Vec<Warning>,
) -> Result<ProcessedField, CompilerError> {
    let mapping = map_type(&field.kind, field.required);

    if mapping.fallback {
        if field.required {
            return Err(CompilerError::FieldProcessing {
                path: Default::default(),
                collection: collection.to_string(),
                field: field.name.clone(),
                kind: field.kind.clone(),
            });
        }
        warnings.push(Warning::LossyFallback {
            collection: collection.to_string(),
            field: field.name.clone(),
            field_type: field.kind.clone(),
        });
    }

    Ok(ProcessedField {
        identifier: to_canonical_identifier(&field.name)
            .map_err(|e| e.in_collection(collection))?,
        key: field.name.clone(),
        type_name: mapping.type_name(),
        base_type: mapping.base_type().to_string(),
        is_pointer: mapping.is_pointer,
        accessor: mapping.accessor,
        target: mapping.target,
    })
}

/// Builds a non-optional `DateTime` field for a timestamp declaration.
pub(crate) fn timestamp(field: &RawFieldSchema) -> Result<ProcessedField, CompilerError> {
    let target = TargetType::DateTime;
    Ok(ProcessedField {
        identifier: to_canonical_identifier(&field.name)?,
        key: field.name.clone(),
        type_name: target.rust_type().to_string(),
        base_type: target.rust_type().to_string(),
        is_pointer: false,
        accessor: Accessor::Timestamp,
        target,
    })
}

/// Keeps identifiers unique within a collection by suffixing a counter.
fn claim_identifier(
    mut field: ProcessedField,
    collection: &str,
    taken: &mut HashSet<String>,
    warnings: &mut Vec<Warning>,
) -> ProcessedField {
    if taken.insert(field.identifier.clone()) {
        return field;
    }

    let mut n = 2;
    let identifier = loop {
        let candidate = format!("{}{}", field.identifier, n);
        if taken.insert(candidate.clone()) {
            break candidate;
        }
        n += 1;
    };

    warnings.push(Warning::IdentifierCollision {
        collection: collection.to_string(),
        field: field.key.clone(),
        identifier: identifier.clone(),
    });
    field.identifier = identifier;
    field
}
