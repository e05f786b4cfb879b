//! Structure validation for schema documents.
//!
//! Runs after JSON parsing and before dialect detection. Checks the things
//! every later stage relies on: at least one collection, and collection
//! names that are present, unique, and usable as identifiers.

use std::collections::HashSet;
use std::path::Path;

use crate::diagnostic::CompilerError;
use crate::schema::RawCollectionSchema;

/// Validates the collection list of a schema document.
pub fn validate_collections(
    path: &Path,
    collections: &[RawCollectionSchema],
) -> Result<(), CompilerError> {
    if collections.is_empty() {
        return Err(invalid(path, "no collections found"));
    }

    let mut seen = HashSet::new();
    for (index, collection) in collections.iter().enumerate() {
        validate_collection_name(path, index, &collection.name)?;

        if !seen.insert(collection.name.as_str()) {
            return Err(invalid(
                path,
                format!("collection '{}' is declared more than once", collection.name),
            ));
        }
    }

    Ok(())
}

/// Collection names are non-empty and limited to `[A-Za-z0-9_]`.
fn validate_collection_name(path: &Path, index: usize, name: &str) -> Result<(), CompilerError> {
    if name.is_empty() {
        return Err(invalid(path, format!("collection #{} has no name", index)));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            path,
            format!(
                "collection name '{}' may only contain letters, digits and underscores",
                name
            ),
        ));
    }

    Ok(())
}

fn invalid(path: &Path, message: impl Into<String>) -> CompilerError {
    CompilerError::SchemaValidate {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
