//! Module index generation.

/// Generates the `mod.rs` that declares and re-exports every model.
///
/// `modules` holds `(module_name, struct_name)` pairs in output order.
pub fn generate_module_index(modules: &[(String, String)], source: &str) -> String {
    let mut code = format!("//! Generated by pbgen from `{}`. Do not edit.\n\n", source);

    for (module, _) in modules {
        code.push_str(&format!("pub mod {};\n", module));
    }

    if !modules.is_empty() {
        code.push('\n');
    }

    for (module, struct_name) in modules {
        code.push_str(&format!("pub use {}::{};\n", module, struct_name));
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let code = generate_module_index(&[], "pb_schema.json");
        assert_eq!(code, "//! Generated by pbgen from `pb_schema.json`. Do not edit.\n\n");
    }

    #[test]
    fn test_declarations_before_reexports() {
        let modules = vec![
            ("posts".to_string(), "Posts".to_string()),
            ("users".to_string(), "Users".to_string()),
        ];
        let code = generate_module_index(&modules, "schema.json");
        let decl = code.find("pub mod users;").unwrap();
        let reexport = code.find("pub use posts::Posts;").unwrap();
        assert!(decl < reexport);
    }
}
