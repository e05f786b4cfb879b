//! Model struct generation.
//!
//! Generates Rust directly without templates. Each collection becomes a
//! struct with one public field per processed field, a setter per field,
//! and a `Model` impl that converts to and from the runtime's `Record`.

use std::collections::BTreeSet;

use crate::ir::{Accessor, CollectionIR, ProcessedField, TargetType};
use crate::mapping::{escape_keyword, to_snake_case};

/// Struct fields the generator adds itself.
const RESERVED_FIELD_NAMES: &[&str] = &["meta", "timestamps"];

/// Generates the module for one collection.
pub fn generate_model(collection: &CollectionIR, runtime: &str, source: &str) -> String {
    let name = &collection.struct_name;
    let mut code = format!("//! Generated by pbgen from `{}`. Do not edit.\n\n", source);

    // Imports
    let mut imports: BTreeSet<&str> = ["Model", "Record", "RecordMeta"].into_iter().collect();
    imports.extend(collection.imports.iter().map(String::as_str));
    code.push_str(&format!(
        "use {}::{{{}}};\n\n",
        runtime,
        imports.into_iter().collect::<Vec<_>>().join(", ")
    ));

    code.push_str(&generate_struct(collection));
    code.push_str(&generate_inherent_impl(collection));
    code.push_str(&generate_model_impl(collection));

    if collection.uses_shared_timestamps {
        code.push_str(&format!(
            r#"
impl HasTimestamps for {name} {{
    fn timestamps(&self) -> &Timestamps {{
        &self.timestamps
    }}
}}
"#
        ));
    }

    code.push_str(&format!("\nconst _: () = {}::assert_model::<{}>();\n", runtime, name));
    code
}

/// Generates the struct definition.
fn generate_struct(collection: &CollectionIR) -> String {
    let mut code = format!(
        "/// Record of the `{}` collection.\n#[derive(Debug, Clone, Default, PartialEq)]\npub struct {} {{\n",
        collection.name, collection.struct_name
    );

    code.push_str("    pub meta: RecordMeta,\n");
    if !collection.has_id_field() {
        code.push_str("    pub id: String,\n");
    }
    if collection.uses_shared_timestamps {
        code.push_str("    pub timestamps: Timestamps,\n");
    }
    for field in &collection.fields {
        code.push_str(&format!("    pub {}: {},\n", field_name(field), field.type_name));
    }

    code.push_str("}\n");
    code
}

/// Generates constants and setters.
fn generate_inherent_impl(collection: &CollectionIR) -> String {
    let mut code = format!("\nimpl {} {{\n", collection.struct_name);

    code.push_str(&format!(
        "    /// Collection name.\n    pub const COLLECTION_NAME: &'static str = {:?};\n",
        collection.name
    ));
    if let Some(id) = &collection.collection_id {
        code.push_str(&format!(
            "    /// Collection id.\n    pub const COLLECTION_ID: &'static str = {:?};\n",
            id
        ));
    }

    for field in &collection.fields {
        code.push('\n');
        code.push_str(&generate_setter(field));
    }

    code.push_str("}\n");
    code
}

/// Generates the setter for one field. `Option` fields take the unwrapped value.
fn generate_setter(field: &ProcessedField) -> String {
    let (param, value) = match field.target {
        TargetType::Text => ("impl Into<String>", "value.into()"),
        _ => (field.base_type.as_str(), "value"),
    };
    let value = if field.accessor == Accessor::Optional {
        format!("Some({})", value)
    } else {
        value.to_string()
    };

    format!(
        "    pub fn set_{}(&mut self, value: {}) {{\n        self.{} = {};\n    }}\n",
        setter_suffix(field),
        param,
        field_name(field),
        value
    )
}

/// Generates the `Model` implementation.
fn generate_model_impl(collection: &CollectionIR) -> String {
    let mut from_record = vec!["            meta: RecordMeta::from_record(record),".to_string()];
    let mut to_record = vec!["        self.meta.write_to(&mut record);".to_string()];

    if !collection.has_id_field() {
        from_record.push("            id: record.get_string(\"id\"),".to_string());
        to_record.push("        record.set(\"id\", self.id.clone());".to_string());
    }
    if collection.uses_shared_timestamps {
        from_record.push("            timestamps: Timestamps::from_record(record),".to_string());
        to_record.push("        self.timestamps.write_to(&mut record);".to_string());
    }

    for field in &collection.fields {
        let name = field_name(field);
        from_record.push(format!(
            "            {}: record.{}({:?}),",
            name,
            field.getter(),
            field.key
        ));
        to_record.push(write_field(field, &name));
    }

    let (id_get, id_set) = match collection.field("id") {
        Some(field) if field.accessor == Accessor::Optional => {
            let name = field_name(field);
            (
                format!("self.{}.as_deref().unwrap_or_default()", name),
                format!("self.{} = Some(id.to_string());", name),
            )
        }
        other => {
            let name = other.map(field_name).unwrap_or_else(|| "id".to_string());
            (format!("&self.{}", name), format!("self.{} = id.to_string();", name))
        }
    };

    format!(
        r#"
impl Model for {name} {{
    fn from_record(record: &Record) -> Self {{
        Self {{
{from_record}
        }}
    }}

    fn to_record(&self) -> Record {{
        let mut record = Record::new();
{to_record}
        record
    }}

    fn id(&self) -> &str {{
        {id_get}
    }}

    fn set_id(&mut self, id: &str) {{
        {id_set}
    }}

    fn collection_id(&self) -> &str {{
        &self.meta.collection_id
    }}

    fn collection_name(&self) -> &str {{
        &self.meta.collection_name
    }}

    fn set_collection(&mut self, id: &str, name: &str) {{
        self.meta.collection_id = id.to_string();
        self.meta.collection_name = name.to_string();
    }}
}}
"#,
        name = collection.struct_name,
        from_record = from_record.join("\n"),
        to_record = to_record.join("\n"),
        id_get = id_get,
        id_set = id_set,
    )
}

/// Writes one field into the record. `None` values are left out.
fn write_field(field: &ProcessedField, name: &str) -> String {
    let key = format!("{:?}", field.key);
    match (field.accessor, field.target) {
        (Accessor::Optional, _) => format!(
            "        if let Some(value) = &self.{} {{\n            record.set({}, value.clone());\n        }}",
            name, key
        ),
        (_, TargetType::Bool | TargetType::Number | TargetType::DateTime) => {
            format!("        record.set({}, self.{});", key, name)
        }
        _ => format!("        record.set({}, self.{}.clone());", key, name),
    }
}

/// Snake-case struct field name, escaped for keywords and generator fields.
fn field_name(field: &ProcessedField) -> String {
    escape_keyword(&setter_suffix(field))
}

/// Only the field declared under the key `id` may be called `id`; anything
/// else normalizing to it (`_id`, `Id`) would clash with the model's id.
fn setter_suffix(field: &ProcessedField) -> String {
    let snake = to_snake_case(&field.identifier);
    if RESERVED_FIELD_NAMES.contains(&snake.as_str()) || (snake == "id" && field.key != "id") {
        format!("{}_", snake)
    } else {
        snake
    }
}
