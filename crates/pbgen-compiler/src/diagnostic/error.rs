//! Compiler error types.
#![allow(unused_assignments)]

use std::path::{Path, PathBuf};
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during compilation.
///
/// Every variant names the schema file it came from and carries a `help`
/// hint, so a failure can be fixed without reading the compiler source.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // Load Errors
    // =========================================================================
    #[error("No schema path was given")]
    #[diagnostic(
        code(pbgen::load::invalid_path),
        help("Pass the path of a collections export, e.g. `pbgen generate --schema pb_schema.json`")
    )]
    InvalidPath {
        path: PathBuf,
    },

    #[error("Schema file not found: {}", path.display())]
    #[diagnostic(
        code(pbgen::load::not_found),
        help("Export the collections from the admin UI (Settings > Export collections) and point --schema at the saved file")
    )]
    SchemaLoad {
        path: PathBuf,
    },

    #[error("Failed to read schema file '{}': {message}", path.display())]
    #[diagnostic(
        code(pbgen::load::read_failed),
        help("Check that the path is a regular file and that it is readable by the current user")
    )]
    FileRead {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Schema Errors
    // =========================================================================
    #[error("Invalid schema '{}': {message}", path.display())]
    #[diagnostic(
        code(pbgen::schema::invalid),
        help("The schema must be a JSON array with at least one collection object, each with a non-empty \"name\"")
    )]
    SchemaValidate {
        path: PathBuf,
        message: String,
    },

    #[error("Malformed schema JSON in '{}' at line {line}, column {column}: {message}", path.display())]
    #[diagnostic(
        code(pbgen::schema::parse_failed),
        help("Re-export the collections or run the file through a JSON validator; hand edits often leave trailing commas")
    )]
    SchemaParse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error(
        "Schema '{}' mixes dialects: collection #{fields_index} lists its fields under \"fields\" but collection #{schema_index} uses \"schema\"",
        path.display()
    )]
    #[diagnostic(
        code(pbgen::schema::mixed_dialect),
        help("Use a single export: rename every \"schema\" key to \"fields\" (v0.23+ layout) or every \"fields\" key to \"schema\" (legacy layout)")
    )]
    MixedDialect {
        path: PathBuf,
        fields_index: usize,
        schema_index: usize,
    },

    #[error("Could not tell which schema dialect '{}' uses", path.display())]
    #[diagnostic(
        code(pbgen::schema::unknown_dialect),
        help("No collection has a \"fields\" or \"schema\" key. Add the field list or rerun with --unknown-dialect latest")
    )]
    UnknownDialect {
        path: PathBuf,
    },

    // =========================================================================
    // Field Errors
    // =========================================================================
    #[error("Field '{field}' in collection '{collection}' has unsupported type '{kind}'")]
    #[diagnostic(
        code(pbgen::field::unmappable_type),
        help("Required fields must use a known type (text, editor, longtext, url, email, select, bool, number, date, relation, file, json). Make the field optional to fall back to a string")
    )]
    FieldProcessing {
        path: PathBuf,
        collection: String,
        field: String,
        kind: String,
    },

    #[error("Cannot derive an identifier from an empty name (collection '{collection}')")]
    #[diagnostic(
        code(pbgen::field::invalid_name),
        help("Every collection and field needs a non-empty \"name\"")
    )]
    InvalidName {
        path: PathBuf,
        collection: String,
    },

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error("Failed to write '{}': {message}", path.display())]
    #[diagnostic(code(pbgen::io::write_failed))]
    IoError {
        path: PathBuf,
        message: String,
    },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attaches the schema file to errors raised below the loader.
    pub fn in_file(mut self, file: &Path) -> Self {
        match &mut self {
            Self::FieldProcessing { path, .. } | Self::InvalidName { path, .. } => {
                if path.as_os_str().is_empty() {
                    *path = file.to_path_buf();
                }
            }
            _ => {}
        }
        self
    }

    /// Attaches the collection name to an identifier error.
    pub fn in_collection(mut self, name: &str) -> Self {
        if let Self::InvalidName { collection, .. } = &mut self {
            if collection.is_empty() {
                *collection = name.to_string();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_load_error_has_help() {
        let errors = [
            CompilerError::InvalidPath {
                path: PathBuf::new(),
            },
            CompilerError::SchemaLoad {
                path: "missing.json".into(),
            },
            CompilerError::FileRead {
                path: "a.json".into(),
                message: "denied".into(),
            },
            CompilerError::SchemaValidate {
                path: "a.json".into(),
                message: "empty".into(),
            },
            CompilerError::SchemaParse {
                path: "a.json".into(),
                line: 1,
                column: 2,
                message: "eof".into(),
            },
            CompilerError::MixedDialect {
                path: "a.json".into(),
                fields_index: 0,
                schema_index: 1,
            },
            CompilerError::UnknownDialect {
                path: "a.json".into(),
            },
        ];

        for err in &errors {
            assert!(err.help().is_some(), "missing help for {err}");
        }
    }

    #[test]
    fn test_in_file_fills_context_once() {
        let err = CompilerError::FieldProcessing {
            path: PathBuf::new(),
            collection: "posts".into(),
            field: "geo".into(),
            kind: "geoPoint".into(),
        }
        .in_file(Path::new("first.json"))
        .in_file(Path::new("second.json"));

        match err {
            CompilerError::FieldProcessing { path, .. } => {
                assert_eq!(path, PathBuf::from("first.json"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_in_collection() {
        let err = CompilerError::InvalidName {
            path: PathBuf::new(),
            collection: String::new(),
        }
        .in_collection("posts");

        assert_eq!(
            err.to_string(),
            "Cannot derive an identifier from an empty name (collection 'posts')"
        );
    }
}
