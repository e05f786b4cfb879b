//! # pbgen Compiler
//!
//! This crate compiles an exported collections schema into typed Rust models
//! for the `pbgen_runtime` crate. It understands both export layouts of the
//! store (legacy `"schema"` and current `"fields"`).
//!
//! ## Architecture
//!
//! ```text
//! Schema JSON (bytes)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Detector   │  Legacy / Latest / Unknown
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Loader    │  Validate, stamp dialect
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Processor   │  Type mapping, naming, dedup
//! │ (per dialect)│
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │      IR      │  + warnings side channel
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Renderer   │  IR → Rust modules
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pbgen_compiler::{Compiler, CompilerConfig};
//!
//! let config = CompilerConfig {
//!     schema_path: "pb_schema.json".into(),
//!     out_dir: "src/models".into(),
//!     ..Default::default()
//! };
//!
//! let result = Compiler::new(config).compile()?;
//! for warning in &result.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

pub mod config;
pub mod codegen;
pub mod diagnostic;
pub mod ir;
pub mod mapping;
pub mod processor;
pub mod schema;
pub mod validate;

use std::path::PathBuf;
use tracing::{info, warn};

pub use codegen::{GeneratedCode, Renderer, RustRenderer};
pub use config::CompilerConfig;
pub use diagnostic::{CompilerError, Warning};
pub use ir::SchemaIR;
pub use schema::{SchemaDialect, SchemaLoader, UnknownDialectPolicy};

/// The main compiler struct that orchestrates the compilation pipeline.
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a new compiler with the given configuration.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles the schema with the built-in Rust renderer.
    ///
    /// This runs the full pipeline:
    /// 1. Load and validate the schema file
    /// 2. Detect the dialect and process every collection into IR
    /// 3. Render the IR
    /// 4. Write output files (skipped for a dry run)
    pub fn compile(&self) -> Result<CompileResult, CompilerError> {
        let renderer = RustRenderer::new(self.config.runtime_crate.clone());
        self.compile_with(&renderer)
    }

    /// Compiles the schema with a custom renderer.
    pub fn compile_with(&self, renderer: &dyn Renderer) -> Result<CompileResult, CompilerError> {
        let ir = self.check()?;
        let generated = renderer.render(&ir)?;
        let files = if self.config.dry_run {
            generated
                .files
                .iter()
                .map(|(filename, _)| self.config.out_dir.join(filename))
                .collect()
        } else {
            self.write_output(&generated)?
        };

        info!(
            collections = ir.collections.len(),
            files = files.len(),
            out_dir = %self.config.out_dir.display(),
            dry_run = self.config.dry_run,
            "generated models"
        );

        Ok(CompileResult {
            dialect: ir.dialect,
            collections: ir.collections.len(),
            fields: ir.field_count(),
            files,
            warnings: ir.warnings,
        })
    }

    /// Loads the schema and builds the IR without generating code.
    ///
    /// Collected warnings are logged and returned inside the IR.
    pub fn check(&self) -> Result<SchemaIR, CompilerError> {
        let ir = self.loader().load(&self.config.schema_path)?;
        for warning in &ir.warnings {
            warn!(collection = warning.collection(), "{}", warning);
        }
        Ok(ir)
    }

    fn loader(&self) -> SchemaLoader {
        SchemaLoader::new()
            .with_unknown_policy(self.config.unknown_dialect)
            .with_superusers_collection(self.config.superusers_collection.clone())
    }

    /// Writes generated code to the output directory.
    fn write_output(&self, generated: &GeneratedCode) -> Result<Vec<PathBuf>, CompilerError> {
        std::fs::create_dir_all(&self.config.out_dir).map_err(|e| CompilerError::IoError {
            path: self.config.out_dir.clone(),
            message: e.to_string(),
        })?;

        let mut written = Vec::with_capacity(generated.files.len());
        for (filename, content) in &generated.files {
            let path = self.config.out_dir.join(filename);
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| CompilerError::IoError {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }
            std::fs::write(&path, content).map_err(|e| CompilerError::io(&path, e.to_string()))?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// Dialect the schema was compiled with.
    pub dialect: SchemaDialect,
    /// Number of collections with a generated model.
    pub collections: usize,
    /// Total number of generated fields.
    pub fields: usize,
    /// Output files in render order (not written on a dry run).
    pub files: Vec<PathBuf>,
    /// Non-fatal findings.
    pub warnings: Vec<Warning>,
}
