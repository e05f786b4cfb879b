//! Rust code generation from schema IR.
//!
//! The renderer is a seam: anything implementing [`Renderer`] can turn a
//! [`SchemaIR`] into files. [`RustRenderer`] is the built-in one and emits
//! one module per collection plus a `mod.rs` that re-exports every model:
//! - Models (struct, setters, `Model` impl for the runtime)
//! - Module index (`mod.rs`)

mod model;
mod module;

use crate::diagnostic::CompilerError;
use crate::ir::SchemaIR;
use crate::mapping::to_module_name;

/// Default path of the runtime crate in generated `use` statements.
pub const DEFAULT_RUNTIME_CRATE: &str = "pbgen_runtime";

/// Generated source files.
#[derive(Debug, Default)]
pub struct GeneratedCode {
    /// Map of filename to content.
    pub files: Vec<(String, String)>,
}

/// Turns schema IR into source files.
pub trait Renderer {
    /// Renders every collection of the IR.
    fn render(&self, ir: &SchemaIR) -> Result<GeneratedCode, CompilerError>;
}

/// Renders models for the `pbgen_runtime` crate.
#[derive(Debug, Clone)]
pub struct RustRenderer {
    runtime_crate: String,
}

impl Default for RustRenderer {
    fn default() -> Self {
        Self {
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

impl RustRenderer {
    /// Creates a renderer that imports from `runtime_crate` (e.g. `crate::runtime`).
    pub fn new(runtime_crate: impl Into<String>) -> Self {
        Self {
            runtime_crate: runtime_crate.into(),
        }
    }
}

impl Renderer for RustRenderer {
    fn render(&self, ir: &SchemaIR) -> Result<GeneratedCode, CompilerError> {
        let source = ir
            .source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| ir.source.display().to_string());

        let mut files = Vec::new();
        let mut modules = Vec::new();

        for collection in &ir.collections {
            let module_name = to_module_name(&collection.struct_name);
            let code = model::generate_model(collection, &self.runtime_crate, &source);
            files.push((format!("{}.rs", module_name), code));
            modules.push((module_name, collection.struct_name.clone()));
        }

        files.push((
            "mod.rs".to_string(),
            module::generate_module_index(&modules, &source),
        ));

        Ok(GeneratedCode { files })
    }
}
