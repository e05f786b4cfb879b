use std::fs;
use std::path::{Path, PathBuf};

use pbgen_compiler::{Compiler, CompilerConfig, CompilerError, SchemaDialect, SchemaLoader, Warning};

const POSTS_SCHEMA: &str = r#"[
    {
        "id": "pbc_1125843985",
        "name": "posts",
        "type": "base",
        "system": false,
        "fields": [
            {"name": "id", "type": "text", "required": true, "system": true},
            {"name": "title", "type": "text", "required": true},
            {"name": "content", "type": "editor", "required": false},
            {"name": "location", "type": "geoPoint", "required": false},
            {"name": "created", "type": "autodate", "system": true},
            {"name": "updated", "type": "autodate", "system": true}
        ]
    },
    {
        "id": "pbc_3142635823",
        "name": "_superusers",
        "type": "auth",
        "system": true,
        "fields": [
            {"name": "email", "type": "email", "required": true}
        ]
    }
]"#;

fn write_schema(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("pb_schema.json");
    fs::write(&path, content).unwrap();
    path
}

fn config(dir: &Path, schema_path: PathBuf) -> CompilerConfig {
    CompilerConfig {
        schema_path,
        out_dir: dir.join("models"),
        ..Default::default()
    }
}

#[test]
fn compile_writes_models() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), POSTS_SCHEMA);

    let result = Compiler::new(config(dir.path(), schema)).compile().unwrap();

    assert_eq!(result.dialect, SchemaDialect::Latest);
    assert_eq!(result.collections, 1);
    assert_eq!(result.fields, 6);
    assert_eq!(result.files.len(), 2);
    assert!(matches!(
        result.warnings.as_slice(),
        [Warning::LossyFallback { field, .. }] if field == "location"
    ));

    let posts = fs::read_to_string(dir.path().join("models/posts.rs")).unwrap();
    assert!(posts.contains("pub struct Posts {"));
    assert!(posts.contains("pub location: Option<String>,"));
    assert!(posts.contains("pub const COLLECTION_ID: &'static str = \"pbc_1125843985\";"));

    let index = fs::read_to_string(dir.path().join("models/mod.rs")).unwrap();
    assert!(index.contains("pub mod posts;"));
    assert!(!index.contains("superusers"));
}

#[test]
fn compile_legacy_schema() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        r#"[{"id": "abc", "name": "notes", "schema": [
            {"name": "body", "type": "text", "required": true},
            {"name": "pinned", "type": "bool", "required": false}
        ]}]"#,
    );

    let result = Compiler::new(config(dir.path(), schema)).compile().unwrap();
    assert_eq!(result.dialect, SchemaDialect::Legacy);

    let notes = fs::read_to_string(dir.path().join("models/notes.rs")).unwrap();
    assert!(notes.contains("pub timestamps: Timestamps,"));
    assert!(notes.contains("impl HasTimestamps for Notes {"));
    assert!(notes.contains("pub pinned: Option<bool>,"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), POSTS_SCHEMA);

    let mut config = config(dir.path(), schema);
    config.dry_run = true;
    let result = Compiler::new(config).compile().unwrap();

    assert_eq!(result.files.len(), 2);
    assert!(!dir.path().join("models").exists());
}

#[test]
fn empty_file_fails_validation() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "  \n");

    let err = SchemaLoader::new().load(&schema).unwrap_err();
    assert!(matches!(err, CompilerError::SchemaValidate { path, .. } if path == schema));
}

#[test]
fn empty_array_fails_validation() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "[]");

    let err = SchemaLoader::new().load(&schema).unwrap_err();
    assert!(matches!(err, CompilerError::SchemaValidate { .. }));
}

#[test]
fn missing_file_fails_to_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = SchemaLoader::new()
        .load(&dir.path().join("nope.json"))
        .unwrap_err();
    assert!(matches!(err, CompilerError::SchemaLoad { .. }));
}

#[test]
fn malformed_json_fails_to_parse() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "[{\"name\": \"posts\",\n \"fields\": [}]");

    let err = SchemaLoader::new().load(&schema).unwrap_err();
    match err {
        CompilerError::SchemaParse { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_path_is_invalid() {
    let err = SchemaLoader::new().load(Path::new("")).unwrap_err();
    assert!(matches!(err, CompilerError::InvalidPath { .. }));
}

#[test]
fn check_does_not_write() {
    let dir = tempfile::TempDir::new().unwrap();
    let schema = write_schema(dir.path(), POSTS_SCHEMA);

    let ir = Compiler::new(config(dir.path(), schema)).check().unwrap();
    assert_eq!(ir.collections.len(), 1);
    assert_eq!(ir.warnings.len(), 1);
    assert!(!dir.path().join("models").exists());
}
