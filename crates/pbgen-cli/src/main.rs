//! pbgen CLI.
//!
//! Generates typed Rust models from an exported collections schema.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pbgen_compiler::codegen::DEFAULT_RUNTIME_CRATE;
use pbgen_compiler::schema::SUPERUSERS_COLLECTION;
use pbgen_compiler::{Compiler, CompilerConfig, SchemaIR, UnknownDialectPolicy};

mod ui;

#[derive(Parser)]
#[command(name = "pbgen")]
#[command(version)]
#[command(about = "Generate typed Rust models from a collections schema export")]
struct Cli {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model sources from a schema export
    Generate {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output directory for generated modules
        #[arg(short, long, default_value = "src/models")]
        output: PathBuf,

        /// Path of the runtime crate in generated `use` statements
        #[arg(long, default_value = DEFAULT_RUNTIME_CRATE)]
        runtime_crate: String,

        /// Render everything but write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a schema export without generating code
    Check {
        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Print the intermediate representation as JSON
    Inspect {
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

/// Options shared by every command that reads a schema.
#[derive(Args)]
struct SchemaArgs {
    /// Exported collections schema (JSON)
    #[arg(short, long, default_value = "pb_schema.json")]
    schema: PathBuf,

    /// How to treat a schema that uses neither "fields" nor "schema" (latest, fail)
    #[arg(long, default_value = "latest")]
    unknown_dialect: UnknownDialectPolicy,

    /// Collection that never gets a model
    #[arg(long, default_value = SUPERUSERS_COLLECTION)]
    superusers: String,
}

impl SchemaArgs {
    fn into_config(self) -> CompilerConfig {
        CompilerConfig {
            schema_path: self.schema,
            unknown_dialect: self.unknown_dialect,
            superusers_collection: self.superusers,
            ..Default::default()
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Generate {
            schema,
            output,
            runtime_crate,
            dry_run,
        } => {
            let config = CompilerConfig {
                out_dir: output,
                runtime_crate,
                dry_run,
                ..schema.into_config()
            };
            generate(config)
        }
        Commands::Check { schema } => check(schema.into_config()),
        Commands::Inspect { schema } => inspect(schema.into_config()),
    }
}

fn generate(config: CompilerConfig) -> miette::Result<()> {
    ui::header(env!("CARGO_PKG_VERSION"));
    let start = Instant::now();
    let dry_run = config.dry_run;
    debug!(
        schema = %config.schema_path.display(),
        out_dir = %config.out_dir.display(),
        runtime_crate = %config.runtime_crate,
        "generating"
    );

    let result = Compiler::new(config).compile().inspect_err(|_| ui::failure_header())?;

    for warning in &result.warnings {
        ui::warning(&warning.to_string());
    }
    if !result.warnings.is_empty() {
        println!();
    }

    ui::success(&format!(
        "{} {} {} ({} schema)",
        ui::count(result.collections, "model", "models"),
        ui::symbols::DOT,
        ui::count(result.fields, "field", "fields"),
        result.dialect
    ));
    for (i, file) in result.files.iter().enumerate() {
        ui::file_line(&file.display().to_string(), i + 1 == result.files.len());
    }
    println!();

    if dry_run {
        ui::dim("Dry run: nothing was written.");
    }
    ui::timing("Done", start.elapsed().as_millis());
    Ok(())
}

fn check(config: CompilerConfig) -> miette::Result<()> {
    let ir = Compiler::new(config).check().inspect_err(|_| ui::failure_header())?;
    print_summary(&ir);
    Ok(())
}

fn inspect(config: CompilerConfig) -> miette::Result<()> {
    let ir = Compiler::new(config).check()?;
    let json = serde_json::to_string_pretty(&ir)
        .map_err(|e| miette::miette!("failed to serialize IR: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn print_summary(ir: &SchemaIR) {
    for collection in &ir.collections {
        ui::collection_line(&collection.name, collection.fields.len(), collection.dialect.as_str());
    }
    println!();

    for warning in &ir.warnings {
        ui::warning(&warning.to_string());
    }

    ui::success(&format!(
        "Looking good. {} {} {}.",
        ui::count(ir.collections.len(), "collection", "collections"),
        ui::symbols::DOT,
        ui::count(ir.warnings.len(), "warning", "warnings")
    ));
    if ir.detected_dialect != ir.dialect {
        ui::info(&format!(
            "No field list key found; treated as {} schema.",
            ir.dialect
        ));
    }
}
