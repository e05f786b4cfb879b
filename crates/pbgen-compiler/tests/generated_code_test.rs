//! Generated models must be valid Rust: every file parses, every module the
//! index declares has a file, and no struct declares a field or method twice.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use pbgen_compiler::{GeneratedCode, Renderer, RustRenderer, SchemaLoader};
use syn::ext::IdentExt;
use syn::{Fields, ImplItem, Item, UseTree};

const LATEST_SCHEMA: &str = r#"[
    {"id": "pbc_1", "name": "posts", "fields": [
        {"name": "id", "type": "text", "required": true, "system": true},
        {"name": "title", "type": "text", "required": true},
        {"name": "body", "type": "longtext"},
        {"name": "summary", "type": "editor"},
        {"name": "site", "type": "url"},
        {"name": "contact", "type": "email"},
        {"name": "type", "type": "select", "required": true},
        {"name": "secret", "type": "password"},
        {"name": "published", "type": "bool"},
        {"name": "views", "type": "number", "required": true},
        {"name": "tags", "type": "relation"},
        {"name": "cover", "type": "file"},
        {"name": "meta", "type": "json"},
        {"name": "timestamps", "type": "json"},
        {"name": "self", "type": "text"},
        {"name": "location", "type": "geoPoint"},
        {"name": "created", "type": "autodate", "system": true},
        {"name": "updated", "type": "autodate", "system": true}
    ]},
    {"name": "match", "fields": [{"name": "_id", "type": "text", "required": true}]},
    {"name": "mod", "fields": [{"name": "Id", "type": "number"}, {"name": "user_name", "type": "text"}, {"name": "userName", "type": "text"}]},
    {"name": "record", "fields": [{"name": "id", "type": "text"}, {"name": "_id", "type": "text"}]},
    {"name": "self", "fields": []}
]"#;

const LEGACY_SCHEMA: &str = r#"[
    {"name": "type", "schema": [
        {"name": "id", "type": "text", "required": true},
        {"name": "created", "type": "date"},
        {"name": "ID", "type": "text"},
        {"name": "timestamps", "type": "text"}
    ]},
    {"name": "users", "schema": [{"name": "name", "type": "text", "required": true}]}
]"#;

fn render(json: &str) -> GeneratedCode {
    let ir = SchemaLoader::new()
        .load_bytes(Path::new("pb_schema.json"), json.as_bytes())
        .unwrap();
    RustRenderer::default().render(&ir).unwrap()
}

fn parse_all(generated: &GeneratedCode) -> HashMap<String, syn::File> {
    generated
        .files
        .iter()
        .map(|(name, code)| {
            let file = syn::parse_file(code)
                .unwrap_or_else(|e| panic!("{name} does not parse: {e}\n{code}"));
            (name.clone(), file)
        })
        .collect()
}

fn assert_unique(names: impl IntoIterator<Item = String>, context: &str) {
    let mut seen = HashSet::new();
    for name in names {
        assert!(seen.insert(name.clone()), "{context} declares `{name}` twice");
    }
}

fn used_names(tree: &UseTree, out: &mut Vec<String>) {
    match tree {
        UseTree::Path(path) => used_names(&path.tree, out),
        UseTree::Name(name) => out.push(name.ident.to_string()),
        UseTree::Rename(rename) => out.push(rename.rename.to_string()),
        UseTree::Group(group) => group.items.iter().for_each(|item| used_names(item, out)),
        UseTree::Glob(_) => {}
    }
}

/// Checks one model file and returns the structs it defines.
fn check_model(name: &str, file: &syn::File) -> Vec<String> {
    let mut imported = Vec::new();
    let mut structs = Vec::new();

    for item in &file.items {
        match item {
            Item::Use(item) => used_names(&item.tree, &mut imported),
            Item::Struct(item) => {
                let Fields::Named(fields) = &item.fields else {
                    panic!("{name}: expected named fields");
                };
                let field_names = fields
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .map(|ident| ident.unraw().to_string());
                assert_unique(field_names, &format!("{name}: struct {}", item.ident));
                structs.push(item.ident.to_string());
            }
            Item::Impl(item) if item.trait_.is_none() => {
                let members = item.items.iter().filter_map(|member| match member {
                    ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
                    ImplItem::Const(c) => Some(c.ident.to_string()),
                    _ => None,
                });
                assert_unique(members, &format!("{name}: inherent impl"));
            }
            _ => {}
        }
    }

    for struct_name in &structs {
        assert!(
            !imported.contains(struct_name),
            "{name}: struct {struct_name} shadows an import"
        );
    }
    structs
}

fn check_generated(generated: &GeneratedCode) {
    let files = parse_all(generated);
    assert_unique(generated.files.iter().map(|(n, _)| n.clone()), "output");

    let mut defined = HashMap::new();
    for (name, file) in &files {
        if name != "mod.rs" {
            defined.insert(name.trim_end_matches(".rs").to_string(), check_model(name, file));
        }
    }

    let index = &files["mod.rs"];
    let mut declared = Vec::new();
    for item in &index.items {
        match item {
            Item::Mod(module) => {
                let module = module.ident.to_string();
                assert!(defined.contains_key(&module), "no file for `pub mod {module};`");
                declared.push(module);
            }
            Item::Use(item) => {
                let UseTree::Path(path) = &item.tree else {
                    panic!("unexpected re-export shape");
                };
                let module = path.ident.to_string();
                let mut names = Vec::new();
                used_names(&path.tree, &mut names);
                for name in names {
                    assert!(
                        defined[&module].contains(&name),
                        "{module} does not define {name}"
                    );
                }
            }
            _ => {}
        }
    }

    assert_eq!(declared.len(), defined.len());
    assert_unique(declared, "mod.rs");
}

#[test]
fn latest_models_are_valid_rust() {
    let generated = render(LATEST_SCHEMA);
    check_generated(&generated);

    let names: Vec<_> = generated.files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["posts.rs", "match_.rs", "mod_.rs", "record_model.rs", "self_model.rs", "mod.rs"]
    );
}

#[test]
fn legacy_models_are_valid_rust() {
    let generated = render(LEGACY_SCHEMA);
    check_generated(&generated);

    let (_, index) = generated.files.last().unwrap();
    assert!(index.contains("pub mod type_;"));
    assert!(index.contains("pub use type_::Type;"));
}

#[test]
fn id_like_fields_keep_model_id_unique() {
    let generated = render(LATEST_SCHEMA);
    let files = parse_all(&generated);

    for module in ["match_.rs", "mod_.rs"] {
        let Some(Item::Struct(item)) = files[module]
            .items
            .iter()
            .find(|item| matches!(item, Item::Struct(_)))
        else {
            panic!("{module}: no struct");
        };
        let fields: Vec<_> = item
            .fields
            .iter()
            .filter_map(|f| f.ident.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(fields.iter().filter(|f| *f == "id").count(), 1, "{module}: {fields:?}");
        assert!(fields.contains(&"id_".to_string()), "{module}: {fields:?}");
    }
}
