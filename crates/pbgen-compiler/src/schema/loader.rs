//! Schema loading: read, validate, detect, and build the IR.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::dialect::{detect, DetectError, SchemaDialect};
use super::RawCollectionSchema;
use crate::diagnostic::CompilerError;
use crate::ir::{CollectionIR, SchemaIR};
use crate::mapping::{to_canonical_identifier, to_struct_name};
use crate::processor::create_processor;
use crate::validate;

/// Built-in collection that never gets a generated model.
pub const SUPERUSERS_COLLECTION: &str = "_superusers";

/// What to do when a document uses neither field-list key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownDialectPolicy {
    /// Process the document with the current dialect's rules.
    #[default]
    AssumeLatest,
    /// Refuse to compile.
    Fail,
}

impl FromStr for UnknownDialectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" | "assume-latest" => Ok(UnknownDialectPolicy::AssumeLatest),
            "fail" | "error" => Ok(UnknownDialectPolicy::Fail),
            _ => Err(format!("expected 'latest' or 'fail', got '{}'", s)),
        }
    }
}

/// Reads schema documents and turns them into IR.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    unknown_policy: UnknownDialectPolicy,
    superusers_collection: String,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self {
            unknown_policy: UnknownDialectPolicy::default(),
            superusers_collection: SUPERUSERS_COLLECTION.to_string(),
        }
    }
}

impl SchemaLoader {
    /// Creates a loader with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for documents of unknown dialect.
    pub fn with_unknown_policy(mut self, policy: UnknownDialectPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Sets the name of the collection that is never generated.
    pub fn with_superusers_collection(mut self, name: impl Into<String>) -> Self {
        self.superusers_collection = name.into();
        self
    }

    /// Loads a schema file from disk.
    pub fn load(&self, path: &Path) -> Result<SchemaIR, CompilerError> {
        if path.as_os_str().is_empty() {
            return Err(CompilerError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        if !path.exists() {
            return Err(CompilerError::SchemaLoad {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|e| CompilerError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.load_bytes(path, &bytes)
    }

    /// Builds the IR from schema bytes already in memory.
    ///
    /// `path` is only used to label errors and the IR.
    pub fn load_bytes(&self, path: &Path, bytes: &[u8]) -> Result<SchemaIR, CompilerError> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(CompilerError::SchemaValidate {
                path: path.to_path_buf(),
                message: "file is empty".to_string(),
            });
        }

        let mut collections: Vec<RawCollectionSchema> =
            serde_json::from_slice(bytes).map_err(|e| CompilerError::SchemaParse {
                path: path.to_path_buf(),
                line: e.line(),
                column: e.column(),
                message: e.to_string(),
            })?;

        validate::validate_collections(path, &collections)?;

        let detected = detect(bytes).map_err(|e| match e {
            DetectError::MixedDialect {
                fields_index,
                schema_index,
            } => CompilerError::MixedDialect {
                path: path.to_path_buf(),
                fields_index,
                schema_index,
            },
            DetectError::Parse { offset, reason } => CompilerError::SchemaParse {
                path: path.to_path_buf(),
                line: 0,
                column: offset,
                message: reason.to_string(),
            },
        })?;

        let dialect = match (detected, self.unknown_policy) {
            (SchemaDialect::Unknown, UnknownDialectPolicy::Fail) => {
                return Err(CompilerError::UnknownDialect {
                    path: path.to_path_buf(),
                });
            }
            (SchemaDialect::Unknown, UnknownDialectPolicy::AssumeLatest) => SchemaDialect::Latest,
            (known, _) => known,
        };
        info!(
            path = %path.display(),
            %detected,
            %dialect,
            collections = collections.len(),
            "loaded schema"
        );

        for collection in &mut collections {
            collection.dialect = dialect;
        }

        let processor = create_processor(dialect);
        let mut ir = SchemaIR {
            source: path.to_path_buf(),
            detected_dialect: detected,
            dialect,
            collections: Vec::new(),
            warnings: Vec::new(),
        };

        let mut struct_names: HashMap<String, &str> = HashMap::new();

        for collection in &collections {
            if collection.name == self.superusers_collection {
                debug!(collection = %collection.name, "skipping superusers collection");
                continue;
            }

            let processed = processor
                .process_fields(collection.fields(), &collection.name)
                .map_err(|e| e.in_file(path))?;

            let struct_name = to_canonical_identifier(&collection.name)
                .map(|identifier| to_struct_name(&identifier))
                .map_err(|e| e.in_collection(&collection.name).in_file(path))?;
            if let Some(other) = struct_names.insert(struct_name.clone(), &collection.name) {
                return Err(CompilerError::SchemaValidate {
                    path: path.to_path_buf(),
                    message: format!(
                        "collections '{}' and '{}' both generate the struct {}",
                        other, collection.name, struct_name
                    ),
                });
            }

            let mut imports: BTreeSet<String> = processor
                .required_imports()
                .into_iter()
                .map(str::to_string)
                .collect();
            imports.extend(
                processed
                    .fields
                    .iter()
                    .filter_map(|f| f.target.import())
                    .map(str::to_string),
            );

            debug!(
                collection = %collection.name,
                fields = processed.fields.len(),
                warnings = processed.warnings.len(),
                "processed collection"
            );

            ir.warnings.extend(processed.warnings);
            ir.collections.push(CollectionIR {
                name: collection.name.clone(),
                struct_name,
                collection_id: collection.id.clone(),
                fields: processed.fields,
                dialect: collection.dialect,
                uses_shared_timestamps: processor.uses_shared_timestamps(),
                imports,
            });
        }

        Ok(ir)
    }
}
