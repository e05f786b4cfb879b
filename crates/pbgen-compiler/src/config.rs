//! Compiler configuration.

use std::path::PathBuf;

use crate::codegen::DEFAULT_RUNTIME_CRATE;
use crate::schema::{UnknownDialectPolicy, SUPERUSERS_COLLECTION};

/// Configuration for the pbgen compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Exported collections schema (JSON).
    pub schema_path: PathBuf,

    /// Directory to write generated Rust code.
    pub out_dir: PathBuf,

    /// Path of the runtime crate in generated `use` statements.
    pub runtime_crate: String,

    /// What to do when the schema uses neither dialect's field-list key.
    pub unknown_dialect: UnknownDialectPolicy,

    /// Collection that never gets a generated model.
    pub superusers_collection: String,

    /// Render but do not write anything.
    pub dry_run: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("pb_schema.json"),
            out_dir: PathBuf::from("src/models"),
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            unknown_dialect: UnknownDialectPolicy::default(),
            superusers_collection: SUPERUSERS_COLLECTION.to_string(),
            dry_run: false,
        }
    }
}
